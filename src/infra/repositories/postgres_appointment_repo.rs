use crate::domain::{models::appointment::Appointment, ports::AppointmentRepository};
use crate::error::AppError;
use crate::infra::repositories::map_unique_violation;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::{DateTime, Utc};

pub struct PostgresAppointmentRepo {
    pool: PgPool,
}

impl PostgresAppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for PostgresAppointmentRepo {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            r#"INSERT INTO appointments (
                id, owner_id, appointment_type_id, start_datetime, end_datetime,
                blocked_from, blocked_until, status, attendee_name, attendee_email,
                attendee_phone, attendee_company, notes, cancellation_reason,
                confirmation_token, booked_via, deleted_at, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING *"#
        )
            .bind(&appointment.id)
            .bind(&appointment.owner_id)
            .bind(&appointment.appointment_type_id)
            .bind(appointment.start_datetime)
            .bind(appointment.end_datetime)
            .bind(appointment.blocked_from)
            .bind(appointment.blocked_until)
            .bind(appointment.status)
            .bind(&appointment.attendee_name)
            .bind(&appointment.attendee_email)
            .bind(&appointment.attendee_phone)
            .bind(&appointment.attendee_company)
            .bind(&appointment.notes)
            .bind(&appointment.cancellation_reason)
            .bind(&appointment.confirmation_token)
            .bind(&appointment.booked_via)
            .bind(appointment.deleted_at)
            .bind(appointment.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "Time slot was just booked by someone else"))
    }

    async fn find_by_id(&self, owner_id: &str, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE owner_id = $1 AND id = $2 AND deleted_at IS NULL"
        )
            .bind(owner_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE confirmation_token = $1 AND deleted_at IS NULL"
        )
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE owner_id = $1 AND deleted_at IS NULL ORDER BY start_datetime ASC"
        )
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_blocking(&self, owner_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            r#"SELECT * FROM appointments
               WHERE owner_id = $1 AND deleted_at IS NULL AND status != 'cancelled'
                 AND blocked_from < $2 AND blocked_until > $3"#
        )
            .bind(owner_id)
            .bind(end)
            .bind(start)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            r#"UPDATE appointments SET
                status = $1, notes = $2, cancellation_reason = $3, deleted_at = $4
               WHERE id = $5 AND owner_id = $6
               RETURNING *"#
        )
            .bind(appointment.status)
            .bind(&appointment.notes)
            .bind(&appointment.cancellation_reason)
            .bind(appointment.deleted_at)
            .bind(&appointment.id)
            .bind(&appointment.owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
