use crate::domain::{models::appointment::Appointment, ports::AppointmentRepository};
use crate::error::AppError;
use crate::infra::repositories::map_unique_violation;
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::{DateTime, Utc};

pub struct SqliteAppointmentRepo {
    pool: SqlitePool,
}

impl SqliteAppointmentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepo {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>(
            r#"INSERT INTO appointments (
                id, owner_id, appointment_type_id, start_datetime, end_datetime,
                blocked_from, blocked_until, status, attendee_name, attendee_email,
                attendee_phone, attendee_company, notes, cancellation_reason,
                confirmation_token, booked_via, deleted_at, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
            "SELECT * FROM appointments WHERE owner_id = ? AND id = ? AND deleted_at IS NULL"
        )
            .bind(owner_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE confirmation_token = ? AND deleted_at IS NULL"
        )
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE owner_id = ? AND deleted_at IS NULL ORDER BY start_datetime ASC"
        )
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_blocking(&self, owner_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            r#"SELECT * FROM appointments
               WHERE owner_id = ? AND deleted_at IS NULL AND status != 'cancelled'
                 AND blocked_from < ? AND blocked_until > ?"#
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
                status = ?, notes = ?, cancellation_reason = ?, deleted_at = ?
               WHERE id = ? AND owner_id = ?
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
