//! PostgreSQL implementation of the URL store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on_alias;

#[derive(Debug, FromRow)]
struct UrlRow {
    id: i64,
    alias: String,
    target_url: String,
    created_at: DateTime<Utc>,
}

impl From<UrlRow> for UrlRecord {
    fn from(row: UrlRow) -> Self {
        UrlRecord::new(row.id, row.alias, row.target_url, row.created_at)
    }
}

/// PostgreSQL repository for alias records.
///
/// Every statement runs in auto-commit mode, so a successful `save` or `delete`
/// is durable when the call returns.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn save(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        const OP: &str = "store.postgres.save";

        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            INSERT INTO urls (alias, target_url)
            VALUES ($1, $2)
            RETURNING id, alias, target_url, created_at
            "#,
        )
        .bind(&new_record.alias)
        .bind(&new_record.target_url)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on_alias(&e) {
                AppError::alias_conflict(OP, &new_record.alias)
            } else {
                AppError::backend(OP, Some(new_record.alias.as_str()), e)
            }
        })?;

        info!(id = row.id, alias = %row.alias, "URL saved");
        Ok(row.into())
    }

    async fn get(&self, alias: &str) -> Result<UrlRecord, AppError> {
        const OP: &str = "store.postgres.get";

        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT id, alias, target_url, created_at
            FROM urls
            WHERE alias = $1
            "#,
        )
        .bind(alias)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| AppError::backend(OP, Some(alias), e))?
        .ok_or_else(|| AppError::not_found(OP, alias))?;

        debug!(alias, target_url = %row.target_url, "URL retrieved");
        Ok(row.into())
    }

    async fn delete(&self, alias: &str) -> Result<UrlRecord, AppError> {
        const OP: &str = "store.postgres.delete";

        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            DELETE FROM urls
            WHERE alias = $1
            RETURNING id, alias, target_url, created_at
            "#,
        )
        .bind(alias)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| AppError::backend(OP, Some(alias), e))?
        .ok_or_else(|| AppError::not_found(OP, alias))?;

        info!(id = row.id, alias, target_url = %row.target_url, "URL deleted");
        Ok(row.into())
    }

    async fn alias_exists(&self, alias: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM urls WHERE alias = $1)")
            .bind(alias)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| AppError::backend("store.postgres.alias_exists", Some(alias), e))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .map(|_| ())
            .map_err(|e| AppError::backend("store.postgres.ping", None, e))
    }
}
