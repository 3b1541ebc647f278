//! Image repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::ImageStore;
use crate::models::{Image, NewImage};

/// PostgreSQL-backed image repository
#[derive(Clone)]
pub struct ImageRepository {
    pool: PgPool,
}

impl ImageRepository {
    /// Create a new image repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageStore for ImageRepository {
    async fn create(&self, image: &NewImage) -> Result<Image> {
        info!("Saving image record: {}", image.name);

        let image = sqlx::query_as::<_, Image>(
            r#"
            INSERT INTO images (url, name, price, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, url, name, price, description, created_at
            "#,
        )
        .bind(&image.url)
        .bind(&image.name)
        .bind(image.price)
        .bind(&image.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(image)
    }

    async fn get_all(&self) -> Result<Vec<Image>> {
        let images = sqlx::query_as::<_, Image>(
            r#"
            SELECT id, url, name, price, description, created_at
            FROM images
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Image>> {
        let image = sqlx::query_as::<_, Image>(
            r#"
            SELECT id, url, name, price, description, created_at
            FROM images
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Image>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let images = sqlx::query_as::<_, Image>(
            r#"
            SELECT id, url, name, price, description, created_at
            FROM images
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
