use crate::domain::{models::appointment_type::AppointmentType, ports::AppointmentTypeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteAppointmentTypeRepo {
    pool: SqlitePool,
}

impl SqliteAppointmentTypeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentTypeRepository for SqliteAppointmentTypeRepo {
    async fn create(&self, appointment_type: &AppointmentType) -> Result<AppointmentType, AppError> {
        sqlx::query_as::<_, AppointmentType>(
            r#"INSERT INTO appointment_types (
                id, owner_id, name, duration_minutes, buffer_before_minutes, buffer_after_minutes,
                price_cents, is_active, max_per_day, require_phone, require_company, sort_order, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
            "SELECT * FROM appointment_types WHERE owner_id = ? AND id = ?"
        )
            .bind(owner_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<AppointmentType>, AppError> {
        sqlx::query_as::<_, AppointmentType>(
            "SELECT * FROM appointment_types WHERE owner_id = ? ORDER BY sort_order ASC, name ASC"
        )
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active(&self, owner_id: &str) -> Result<Vec<AppointmentType>, AppError> {
        sqlx::query_as::<_, AppointmentType>(
            "SELECT * FROM appointment_types WHERE owner_id = ? AND is_active = TRUE ORDER BY sort_order ASC, name ASC"
        )
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, appointment_type: &AppointmentType) -> Result<AppointmentType, AppError> {
        sqlx::query_as::<_, AppointmentType>(
            r#"UPDATE appointment_types SET
                name = ?, duration_minutes = ?, buffer_before_minutes = ?, buffer_after_minutes = ?,
                price_cents = ?, is_active = ?, max_per_day = ?, require_phone = ?, require_company = ?,
                sort_order = ?
               WHERE id = ? AND owner_id = ?
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
