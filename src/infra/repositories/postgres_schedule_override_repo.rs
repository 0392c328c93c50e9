use crate::domain::{models::schedule_override::ScheduleOverride, ports::ScheduleOverrideRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::NaiveDate;

pub struct PostgresScheduleOverrideRepo {
    pool: PgPool,
}

impl PostgresScheduleOverrideRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleOverrideRepository for PostgresScheduleOverrideRepo {
    async fn upsert(&self, entity: &ScheduleOverride) -> Result<ScheduleOverride, AppError> {
        sqlx::query_as::<_, ScheduleOverride>(
            r#"INSERT INTO schedule_overrides (id, owner_id, date, is_closed, hours_json, created_at)
               VALUES ($1, $2, $3, $4, $5, $6)
               ON CONFLICT(owner_id, date) DO UPDATE SET
               is_closed = excluded.is_closed,
               hours_json = excluded.hours_json
               RETURNING *"#
        )
            .bind(&entity.id)
            .bind(&entity.owner_id)
            .bind(entity.date)
            .bind(entity.is_closed)
            .bind(&entity.hours_json)
            .bind(entity.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_date(&self, owner_id: &str, date: NaiveDate) -> Result<Option<ScheduleOverride>, AppError> {
        sqlx::query_as::<_, ScheduleOverride>(
            "SELECT * FROM schedule_overrides WHERE owner_id = $1 AND date = $2"
        )
            .bind(owner_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_range(&self, owner_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<ScheduleOverride>, AppError> {
        sqlx::query_as::<_, ScheduleOverride>(
            "SELECT * FROM schedule_overrides WHERE owner_id = $1 AND date >= $2 AND date <= $3 ORDER BY date ASC"
        )
            .bind(owner_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, owner_id: &str, date: NaiveDate) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM schedule_overrides WHERE owner_id = $1 AND date = $2")
            .bind(owner_id)
            .bind(date)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Override not found".into()));
        }
        Ok(())
    }
}
