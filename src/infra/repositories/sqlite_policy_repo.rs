use crate::domain::{models::booking_policy::BookingPolicy, ports::BookingPolicyRepository};
use crate::error::AppError;
use crate::infra::repositories::map_unique_violation;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePolicyRepo {
    pool: SqlitePool,
}

impl SqlitePolicyRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingPolicyRepository for SqlitePolicyRepo {
    async fn create(&self, policy: &BookingPolicy) -> Result<BookingPolicy, AppError> {
        sqlx::query_as::<_, BookingPolicy>(
            r#"INSERT INTO booking_policies (
                id, owner_id, timezone, min_booking_notice_hours, max_booking_days_ahead,
                require_approval, booking_slug, is_booking_enabled, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *"#
        )
            .bind(&policy.id)
            .bind(&policy.owner_id)
            .bind(&policy.timezone)
            .bind(policy.min_booking_notice_hours)
            .bind(policy.max_booking_days_ahead)
            .bind(policy.require_approval)
            .bind(&policy.booking_slug)
            .bind(policy.is_booking_enabled)
            .bind(policy.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "Booking slug is already taken"))
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Option<BookingPolicy>, AppError> {
        sqlx::query_as::<_, BookingPolicy>("SELECT * FROM booking_policies WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_slug(&self, booking_slug: &str) -> Result<Option<BookingPolicy>, AppError> {
        sqlx::query_as::<_, BookingPolicy>("SELECT * FROM booking_policies WHERE booking_slug = ?")
            .bind(booking_slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, policy: &BookingPolicy) -> Result<BookingPolicy, AppError> {
        sqlx::query_as::<_, BookingPolicy>(
            r#"UPDATE booking_policies SET
                timezone = ?, min_booking_notice_hours = ?, max_booking_days_ahead = ?,
                require_approval = ?, booking_slug = ?, is_booking_enabled = ?
               WHERE owner_id = ?
               RETURNING *"#
        )
            .bind(&policy.timezone)
            .bind(policy.min_booking_notice_hours)
            .bind(policy.max_booking_days_ahead)
            .bind(policy.require_approval)
            .bind(&policy.booking_slug)
            .bind(policy.is_booking_enabled)
            .bind(&policy.owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "Booking slug is already taken"))
    }
}
