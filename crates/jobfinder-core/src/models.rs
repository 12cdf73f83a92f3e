use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Namespace prefix for every cache key.
pub const CACHE_KEY_PREFIX: &str = "ntg-jobs-";

/// One job posting extracted from a listings page.
///
/// `title` and `link` are mandatory; the extractor drops cards without them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    pub link: String,
}

/// The answer to a single query.
///
/// `count` is not stored: it is always `jobs.len()`, both in memory and in
/// the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "QueryResultWire", from = "QueryResultWire")]
pub struct QueryResult {
    term: String,
    jobs: Vec<JobRecord>,
    cached: bool,
}

impl QueryResult {
    /// A result built from a fresh render.
    pub fn fresh(term: impl Into<String>, jobs: Vec<JobRecord>) -> Self {
        Self {
            term: term.into(),
            jobs,
            cached: false,
        }
    }

    /// The same result, flagged as served from cache.
    pub fn into_cached(self) -> Self {
        Self {
            cached: true,
            ..self
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn jobs(&self) -> &[JobRecord] {
        &self.jobs
    }

    pub fn count(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_cached(&self) -> bool {
        self.cached
    }

    pub fn into_jobs(self) -> Vec<JobRecord> {
        self.jobs
    }
}

/// JSON shape of a [`QueryResult`]. The incoming `count` is ignored.
#[derive(Serialize, Deserialize)]
struct QueryResultWire {
    cached: bool,
    term: String,
    #[serde(default)]
    count: usize,
    jobs: Vec<JobRecord>,
}

impl From<QueryResult> for QueryResultWire {
    fn from(result: QueryResult) -> Self {
        Self {
            cached: result.cached,
            count: result.jobs.len(),
            term: result.term,
            jobs: result.jobs,
        }
    }
}

impl From<QueryResultWire> for QueryResult {
    fn from(wire: QueryResultWire) -> Self {
        Self {
            term: wire.term,
            jobs: wire.jobs,
            cached: wire.cached,
        }
    }
}

/// A stored, serialized query result with its expiry metadata.
///
/// Entries are never mutated; a refresh replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub payload: String,
    pub stored_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn new(
        key: impl Into<String>,
        payload: String,
        stored_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            key: key.into(),
            payload,
            stored_at,
            ttl,
        }
    }

    /// An entry is expired once `now - stored_at >= ttl`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let Ok(ttl) = TimeDelta::from_std(self.ttl) else {
            return false;
        };
        now.signed_duration_since(self.stored_at) >= ttl
    }
}

/// Derive the cache key for a search term.
///
/// Pure and case-insensitive: terms differing only in letter case share a key.
pub fn cache_key(term: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{}", term.to_lowercase())
}
