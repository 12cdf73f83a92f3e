//! In-process cache store backings.
//!
//! [`MemoryCacheStore`] keeps entries in a bounded Moka cache. Each entry
//! carries its own TTL: Moka evicts it physically once the TTL elapses, and
//! `get` independently treats it as absent once the injected [`Clock`] says
//! `now - stored_at >= ttl`. [`NullCache`] stores nothing.

use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;

use crate::clock::{Clock, SystemClock};
use crate::error::AppError;
use crate::models::CacheEntry;
use crate::traits::CacheStore;

/// Default upper bound on the number of cached terms.
pub const DEFAULT_CAPACITY: u64 = 10_000;

/// Per-entry expiry policy: an entry lives for its own `ttl` from the moment
/// it was written. Overwrites restart the countdown.
struct EntryTtl;

impl Expiry<String, CacheEntry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Bounded in-memory cache store.
#[derive(Clone)]
pub struct MemoryCacheStore<C: Clock = SystemClock> {
    inner: Cache<String, CacheEntry>,
    clock: C,
}

impl MemoryCacheStore<SystemClock> {
    /// Create a store holding at most `capacity` entries.
    pub fn new(capacity: u64) -> Self {
        Self::with_clock(capacity, SystemClock)
    }
}

impl Default for MemoryCacheStore<SystemClock> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<C: Clock> MemoryCacheStore<C> {
    /// Create a store whose logical expiry is judged by `clock`.
    pub fn with_clock(capacity: u64, clock: C) -> Self {
        let inner = Cache::builder()
            .max_capacity(capacity)
            .expire_after(EntryTtl)
            .build();

        Self { inner, clock }
    }
}

impl<C: Clock> CacheStore for MemoryCacheStore<C> {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let Some(entry) = self.inner.get(key).await else {
            return Ok(None);
        };

        if entry.is_expired(self.clock.now()) {
            tracing::debug!(%key, "Cache entry expired");
            self.inner.invalidate(key).await;
            return Ok(None);
        }

        Ok(Some(entry.payload))
    }

    async fn put(&self, key: &str, payload: String, ttl: Duration) -> Result<(), AppError> {
        let entry = CacheEntry::new(key, payload, self.clock.now(), ttl);
        self.inner.insert(key.to_string(), entry).await;
        Ok(())
    }
}

/// A cache store that never holds anything; every lookup is a miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

impl CacheStore for NullCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, AppError> {
        Ok(None)
    }

    async fn put(&self, _key: &str, _payload: String, _ttl: Duration) -> Result<(), AppError> {
        Ok(())
    }
}
