use jobfinder_core::AppError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::cache_repository::CacheRepository;
use crate::config::DatabaseConfig;

/// Owns the connection pool, runs migrations, and vends the cache repository.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL with the given configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(|e| AppError::Cache(format!("Failed to connect: {e}")))?;

        tracing::info!(max_connections = config.max_connections, "Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run all pending migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Cache(format!("Migration failed: {e}")))?;
        Ok(())
    }

    /// Get a [`CacheRepository`] backed by this pool.
    pub fn cache_repo(&self) -> CacheRepository {
        CacheRepository::new(self.pool.clone())
    }
}
