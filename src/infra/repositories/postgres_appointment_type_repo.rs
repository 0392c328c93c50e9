use crate::domain::{models::appointment_type::AppointmentType, ports::AppointmentTypeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresAppointmentTypeRepo {
    pool: PgPool,
}

impl PostgresAppointmentTypeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentTypeRepository for PostgresAppointmentTypeRepo {
    async fn create(&self, appointment_type: &AppointmentType) -> Result<AppointmentType, AppError> {
        sqlx::query_as::<_, AppointmentType>(
            r#"INSERT INTO appointment_types (
                id, owner_id, name, duration_minutes, buffer_before_minutes, buffer_after_minutes,
                price_cents, is_active, max_per_day, require_phone, require_company, sort_order, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *"#
        )
            .bind(&appointment_type.id)
            .bind(&appointment_type.owner_id)
            .bind(&appointment_type.name)
            .bind(appointment_type.duration_minutes)
            .bind(appointment_type.buffer_before_minutes)
            .bind(appointment_type.buffer_after_minutes)
            .bind(appointment_type.price_cents)
            .bind(appointment_type.is_active)
            .bind(appointment_type.max_per_day)
            .bind(appointment_type.require_phone)
            .bind(appointment_type.require_company)
            .bind(appointment_type.sort_order)
            .bind(appointment_type.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, owner_id: &str, id: &str) -> Result<Option<AppointmentType>, AppError> {
        sqlx::query_as::<_, AppointmentType>(
            "SELECT * FROM appointment_types WHERE owner_id = $1 AND id = $2"
        )
            .bind(owner_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<AppointmentType>, AppError> {
        sqlx::query_as::<_, AppointmentType>(
            "SELECT * FROM appointment_types WHERE owner_id = $1 ORDER BY sort_order ASC, name ASC"
        )
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active(&self, owner_id: &str) -> Result<Vec<AppointmentType>, AppError> {
        sqlx::query_as::<_, AppointmentType>(
            "SELECT * FROM appointment_types WHERE owner_id = $1 AND is_active = TRUE ORDER BY sort_order ASC, name ASC"
        )
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, appointment_type: &AppointmentType) -> Result<AppointmentType, AppError> {
        sqlx::query_as::<_, AppointmentType>(
            r#"UPDATE appointment_types SET
                name = $1, duration_minutes = $2, buffer_before_minutes = $3, buffer_after_minutes = $4,
                price_cents = $5, is_active = $6, max_per_day = $7, require_phone = $8, require_company = $9,
                sort_order = $10
               WHERE id = $11 AND owner_id = $12
               RETURNING *"#
        )
            .bind(&appointment_type.name)
            .bind(appointment_type.duration_minutes)
            .bind(appointment_type.buffer_before_minutes)
            .bind(appointment_type.buffer_after_minutes)
            .bind(appointment_type.price_cents)
            .bind(appointment_type.is_active)
            .bind(appointment_type.max_per_day)
            .bind(appointment_type.require_phone)
            .bind(appointment_type.require_company)
            .bind(appointment_type.sort_order)
            .bind(&appointment_type.id)
            .bind(&appointment_type.owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
