use crate::domain::{models::owner::Owner, ports::OwnerRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresOwnerRepo {
    pool: PgPool,
}

impl PostgresOwnerRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnerRepository for PostgresOwnerRepo {
    async fn create(&self, owner: &Owner) -> Result<Owner, AppError> {
        sqlx::query_as::<_, Owner>(
            "INSERT INTO owners (id, name, email, created_at) VALUES ($1, $2, $3, $4) RETURNING *"
        )
            .bind(&owner.id)
            .bind(&owner.name)
            .bind(&owner.email)
            .bind(owner.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Owner>, AppError> {
        sqlx::query_as::<_, Owner>("SELECT * FROM owners WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
