use std::time::Duration;

use chrono::{DateTime, Utc};
use jobfinder_core::error::AppError;
use jobfinder_core::models::CacheEntry;
use jobfinder_core::traits::CacheStore;
use sqlx::{PgPool, Pool, Postgres};

/// Query-result cache stored in the `query_cache` table.
///
/// Expiry is judged by the database clock: a row is live while
/// `expires_at > NOW()`. Writes are single-row upserts, so readers see either
/// the previous payload or the new one.
#[derive(Clone)]
pub struct CacheRepository {
    pool: Pool<Postgres>,
}

impl CacheRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Payload for `key`, if present and not expired.
    pub async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let row: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT payload
            FROM query_cache
            WHERE key = $1 AND expires_at > NOW()
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Cache(e.to_string()))?;

        Ok(row.map(|(payload,)| payload))
    }

    /// Store `payload` under `key`, replacing any previous entry and
    /// restarting its expiry.
    pub async fn put(&self, key: &str, payload: &str, ttl: Duration) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO query_cache (key, payload, stored_at, expires_at)
            VALUES ($1, $2, NOW(), NOW() + make_interval(secs => $3))
            ON CONFLICT (key) DO UPDATE
            SET payload = EXCLUDED.payload,
                stored_at = EXCLUDED.stored_at,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(key)
        .bind(payload)
        .bind(ttl.as_secs_f64())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Cache(e.to_string()))?;

        Ok(())
    }

    /// The stored row for `key`, expired or not.
    pub async fn entry(&self, key: &str) -> Result<Option<CacheEntry>, AppError> {
        let row = sqlx::query_as::<_, CacheRow>(
            r#"
            SELECT key, payload, stored_at, expires_at
            FROM query_cache
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Cache(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    /// Delete expired rows. Returns the number removed.
    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM query_cache WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Cache(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Cache(e.to_string()))?;
        Ok(())
    }
}

// -- Internal row type for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct CacheRow {
    key: String,
    payload: String,
    stored_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<CacheRow> for CacheEntry {
    fn from(row: CacheRow) -> Self {
        let ttl = (row.expires_at - row.stored_at).to_std().unwrap_or_default();
        CacheEntry::new(row.key, row.payload, row.stored_at, ttl)
    }
}

// -- Trait implementation --

impl CacheStore for CacheRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        CacheRepository::get(self, key).await
    }

    async fn put(&self, key: &str, payload: String, ttl: Duration) -> Result<(), AppError> {
        CacheRepository::put(self, key, &payload, ttl).await
    }
}
