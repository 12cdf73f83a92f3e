//! Test utilities: mock implementations of the core traits.
//!
//! Handwritten mocks for dependency injection in unit tests. All mocks use
//! `Arc<Mutex<_>>` for interior mutability so clones share recorded calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::AppError;
use crate::models::JobRecord;
use crate::traits::{CacheStore, Extractor, Renderer};

// ---------------------------------------------------------------------------
// MockRenderer
// ---------------------------------------------------------------------------

/// Mock renderer that returns queued responses and records requested URLs.
#[derive(Clone)]
pub struct MockRenderer {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns an empty HTML document.
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    pub calls: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

impl MockRenderer {
    pub fn new(html: &str) -> Self {
        Self::with_responses(vec![Ok(html.to_string())])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Renderer for MockRenderer {
    async fn render(&self, target_url: &str) -> Result<String, AppError> {
        self.calls.lock().unwrap().push(target_url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("<html><body></body></html>".to_string())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockExtractor
// ---------------------------------------------------------------------------

/// Mock extractor that ignores its input and returns fixed records.
#[derive(Clone)]
pub struct MockExtractor {
    jobs: Arc<Vec<JobRecord>>,
}

impl MockExtractor {
    pub fn new(jobs: Vec<JobRecord>) -> Self {
        Self {
            jobs: Arc::new(jobs),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl Extractor for MockExtractor {
    fn extract(&self, _html: &str) -> Vec<JobRecord> {
        self.jobs.as_ref().clone()
    }
}

// ---------------------------------------------------------------------------
// MockCache
// ---------------------------------------------------------------------------

/// Recorded write: (key, payload, ttl).
pub type CacheWrite = (String, String, Duration);

/// Mock cache backed by a `HashMap`, without expiry, that records writes
/// and can be made to fail.
#[derive(Clone, Default)]
pub struct MockCache {
    entries: Arc<Mutex<HashMap<String, String>>>,
    pub writes: Arc<Mutex<Vec<CacheWrite>>>,
    get_error: Arc<Mutex<Option<AppError>>>,
    put_error: Arc<Mutex<Option<AppError>>>,
}

impl MockCache {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Cache pre-populated with one payload.
    pub fn with_entry(key: &str, payload: &str) -> Self {
        let cache = Self::default();
        cache
            .entries
            .lock()
            .unwrap()
            .insert(key.to_string(), payload.to_string());
        cache
    }

    /// Cache whose next `get` fails.
    pub fn with_get_error(error: AppError) -> Self {
        let cache = Self::default();
        *cache.get_error.lock().unwrap() = Some(error);
        cache
    }

    /// Cache whose next `put` fails.
    pub fn with_put_error(error: AppError) -> Self {
        let cache = Self::default();
        *cache.put_error.lock().unwrap() = Some(error);
        cache
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }
}

impl CacheStore for MockCache {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        if let Some(e) = self.get_error.lock().unwrap().take() {
            return Err(e);
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, payload: String, ttl: Duration) -> Result<(), AppError> {
        if let Some(e) = self.put_error.lock().unwrap().take() {
            return Err(e);
        }
        self.writes
            .lock()
            .unwrap()
            .push((key.to_string(), payload.clone(), ttl));
        self.entries.lock().unwrap().insert(key.to_string(), payload);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Create a job record with a predictable link.
pub fn make_test_job(title: &str, location: Option<&str>) -> JobRecord {
    JobRecord {
        title: title.to_string(),
        location: location.map(str::to_string),
        salary: None,
        link: format!("https://jobs.example.com/{}", title.to_lowercase().replace(' ', "-")),
    }
}

/// A job card in the markup the listings page uses.
pub fn job_card(title: &str, office: &str, href: &str) -> String {
    format!(
        r#"<a class="personio-job-card card" data-name="{title}" data-office="{office}" data-schedule="Vollzeit" href="{href}"><h3>{title}</h3></a>"#
    )
}
