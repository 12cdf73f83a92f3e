use std::time::Duration;

use jobfinder_core::AppError;

use crate::cache::CacheBackendKind;

/// Server-level settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub cache_backend: CacheBackendKind,
    /// Maximum entries for the memory backend.
    pub cache_capacity: u64,
    /// How often the postgres backend purges expired rows.
    pub sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            cache_backend: CacheBackendKind::Memory,
            cache_capacity: jobfinder_core::cache::DEFAULT_CAPACITY,
            sweep_interval: Duration::from_secs(300),
        }
    }
}

impl ServerConfig {
    /// Read configuration from environment variables, falling back to defaults.
    ///
    /// - `JOBFINDER_SERVER_PORT`
    /// - `JOBFINDER_CACHE_BACKEND` (`memory`, `postgres`, `none`)
    /// - `JOBFINDER_CACHE_CAPACITY`
    /// - `JOBFINDER_CACHE_SWEEP_SECS`
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("JOBFINDER_SERVER_PORT") {
            config.port = parse_number("JOBFINDER_SERVER_PORT", &raw)?;
        }
        if let Ok(raw) = std::env::var("JOBFINDER_CACHE_BACKEND") {
            config.cache_backend = raw.parse().map_err(AppError::Config)?;
        }
        if let Ok(raw) = std::env::var("JOBFINDER_CACHE_CAPACITY") {
            config.cache_capacity = parse_number("JOBFINDER_CACHE_CAPACITY", &raw)?;
        }
        if let Ok(raw) = std::env::var("JOBFINDER_CACHE_SWEEP_SECS") {
            let secs: u64 = parse_number("JOBFINDER_CACHE_SWEEP_SECS", &raw)?;
            config.sweep_interval = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr + PartialEq + Default>(
    name: &str,
    raw: &str,
) -> Result<T, AppError> {
    let parsed: T = raw.trim().parse().map_err(|_| {
        AppError::Config(format!("Invalid {name} '{raw}': must be a positive integer"))
    })?;
    if parsed == T::default() {
        return Err(AppError::Config(format!("{name} must be at least 1")));
    }
    Ok(parsed)
}
