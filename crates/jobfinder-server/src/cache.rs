use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use jobfinder_core::error::AppError;
use jobfinder_core::traits::CacheStore;
use jobfinder_core::{MemoryCacheStore, NullCache};
use jobfinder_db::CacheRepository;
use tokio_util::sync::CancellationToken;

/// Which backing the server caches query results in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackendKind {
    Memory,
    Postgres,
    None,
}

impl fmt::Display for CacheBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheBackendKind::Memory => write!(f, "memory"),
            CacheBackendKind::Postgres => write!(f, "postgres"),
            CacheBackendKind::None => write!(f, "none"),
        }
    }
}

impl FromStr for CacheBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheBackendKind::Memory),
            "postgres" => Ok(CacheBackendKind::Postgres),
            "none" | "off" => Ok(CacheBackendKind::None),
            other => Err(format!(
                "Invalid cache backend '{other}': expected memory, postgres or none"
            )),
        }
    }
}

/// A configured cache backing, chosen at startup.
#[derive(Clone)]
pub enum CacheBackend {
    Memory(MemoryCacheStore),
    Postgres(CacheRepository),
    Disabled(NullCache),
}

impl CacheBackend {
    pub fn kind(&self) -> CacheBackendKind {
        match self {
            CacheBackend::Memory(_) => CacheBackendKind::Memory,
            CacheBackend::Postgres(_) => CacheBackendKind::Postgres,
            CacheBackend::Disabled(_) => CacheBackendKind::None,
        }
    }

    /// Whether the backing is reachable. Only the database can be down.
    pub async fn health_check(&self) -> Result<(), AppError> {
        match self {
            CacheBackend::Postgres(repo) => repo.health_check().await,
            CacheBackend::Memory(_) | CacheBackend::Disabled(_) => Ok(()),
        }
    }
}

impl CacheStore for CacheBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        match self {
            CacheBackend::Memory(store) => store.get(key).await,
            CacheBackend::Postgres(repo) => CacheStore::get(repo, key).await,
            CacheBackend::Disabled(store) => store.get(key).await,
        }
    }

    async fn put(&self, key: &str, payload: String, ttl: Duration) -> Result<(), AppError> {
        match self {
            CacheBackend::Memory(store) => store.put(key, payload, ttl).await,
            CacheBackend::Postgres(repo) => CacheStore::put(repo, key, payload, ttl).await,
            CacheBackend::Disabled(store) => store.put(key, payload, ttl).await,
        }
    }
}

/// Periodically delete expired rows from the database cache until `cancel` fires.
pub fn spawn_sweeper(
    repo: CacheRepository,
    every: Duration,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => match repo.purge_expired().await {
                    Ok(0) => {}
                    Ok(purged) => tracing::info!(purged, "Purged expired cache rows"),
                    Err(e) => tracing::warn!(error = %e, "Cache sweep failed"),
                },
            }
        }
        tracing::debug!("Cache sweeper stopped");
    })
}
