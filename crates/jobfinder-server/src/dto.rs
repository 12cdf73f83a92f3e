use serde::{Deserialize, Serialize};

use jobfinder_core::models::{JobRecord, QueryResult};

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    /// Search term. Blank or missing uses the configured default.
    pub term: Option<String>,
    /// `1` or `true` bypasses the cache.
    pub refresh: Option<String>,
}

impl SearchQuery {
    pub fn force_refresh(&self) -> bool {
        self.refresh
            .as_deref()
            .is_some_and(|r| matches!(r.trim(), "1" | "true"))
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct JobResponse {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    pub link: String,
}

impl From<JobRecord> for JobResponse {
    fn from(job: JobRecord) -> Self {
        Self {
            title: job.title,
            location: job.location,
            salary: job.salary,
            link: job.link,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SearchResponse {
    pub cached: bool,
    pub term: String,
    pub count: usize,
    pub jobs: Vec<JobResponse>,
}

impl From<QueryResult> for SearchResponse {
    fn from(result: QueryResult) -> Self {
        let cached = result.is_cached();
        let term = result.term().to_string();
        let jobs: Vec<JobResponse> = result.into_jobs().into_iter().map(Into::into).collect();

        Self {
            cached,
            term,
            count: jobs.len(),
            jobs,
        }
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cache: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
