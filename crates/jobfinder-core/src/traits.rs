use std::future::Future;
use std::time::Duration;

use crate::error::AppError;
use crate::models::JobRecord;

/// Obtains rendered HTML for a page from an external rendering service.
pub trait Renderer: Send + Sync + Clone {
    /// Render `target_url` and return the resulting HTML.
    ///
    /// Any transport failure, timeout or non-success status is
    /// [`AppError::RenderUnavailable`]. Implementations do not retry.
    fn render(&self, target_url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Turns raw HTML into job records.
///
/// Never fails: unparseable input yields an empty sequence, and cards missing
/// a title or link are skipped. Output keeps document order.
pub trait Extractor: Send + Sync + Clone {
    fn extract(&self, html: &str) -> Vec<JobRecord>;
}

/// Key-value store with per-entry expiry.
///
/// `get` returns `None` both for keys never stored and for expired entries.
/// A `put` replaces any existing entry and restarts its expiry clock. A `get`
/// observes either a complete earlier payload or nothing.
pub trait CacheStore: Send + Sync + Clone {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, AppError>> + Send;

    fn put(
        &self,
        key: &str,
        payload: String,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), AppError>> + Send;
}
