use std::time::Duration;

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::AppError;
use crate::models::{QueryResult, cache_key};
use crate::normalize::matches_term;
use crate::traits::{CacheStore, Extractor, Renderer};

pub const DEFAULT_LISTING_URL: &str = "https://novotergum.de/karriere/offene-stellenangebote/";
pub const DEFAULT_SEARCH_PARAM: &str = "_search";
pub const DEFAULT_TERM: &str = "Ergotherapeut";
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Settings for the query pipeline.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Listings page the search term is appended to.
    pub listing_url: Url,
    /// Query parameter carrying the search term on `listing_url`.
    pub search_param: String,
    /// Substituted when the caller sends a blank term.
    pub default_term: String,
    /// Lifetime of cached results.
    pub ttl: Duration,
    /// Keep only records whose title or location matches the term.
    pub filter_results: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            listing_url: Url::parse(DEFAULT_LISTING_URL).expect("default listing URL is valid"),
            search_param: DEFAULT_SEARCH_PARAM.to_string(),
            default_term: DEFAULT_TERM.to_string(),
            ttl: DEFAULT_TTL,
            filter_results: false,
        }
    }
}

impl QueryConfig {
    /// Read configuration from environment variables, falling back to defaults.
    ///
    /// - `JOBFINDER_LISTING_URL`
    /// - `JOBFINDER_SEARCH_PARAM`
    /// - `JOBFINDER_DEFAULT_TERM`
    /// - `JOBFINDER_CACHE_TTL_SECS` (must be at least 1)
    /// - `JOBFINDER_FILTER_RESULTS` (`true`/`false`/`1`/`0`)
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("JOBFINDER_LISTING_URL") {
            config.listing_url = Url::parse(&raw).map_err(|e| {
                AppError::Config(format!("Invalid JOBFINDER_LISTING_URL '{raw}': {e}"))
            })?;
        }
        if let Ok(param) = std::env::var("JOBFINDER_SEARCH_PARAM") {
            config.search_param = param;
        }
        if let Ok(term) = std::env::var("JOBFINDER_DEFAULT_TERM") {
            let term = term.trim();
            if term.is_empty() {
                return Err(AppError::Config(
                    "JOBFINDER_DEFAULT_TERM must not be blank".into(),
                ));
            }
            config.default_term = term.to_string();
        }
        if let Ok(raw) = std::env::var("JOBFINDER_CACHE_TTL_SECS") {
            config.ttl = parse_ttl(&raw)?;
        }
        if let Ok(raw) = std::env::var("JOBFINDER_FILTER_RESULTS") {
            config.filter_results = parse_flag("JOBFINDER_FILTER_RESULTS", &raw)?;
        }

        Ok(config)
    }
}

fn parse_ttl(raw: &str) -> Result<Duration, AppError> {
    let secs: u64 = raw.trim().parse().map_err(|_| {
        AppError::Config(format!(
            "Invalid JOBFINDER_CACHE_TTL_SECS '{raw}': must be a positive integer"
        ))
    })?;
    if secs == 0 {
        return Err(AppError::Config(
            "JOBFINDER_CACHE_TTL_SECS must be at least 1".into(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// Parse a boolean environment flag.
pub fn parse_flag(name: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(AppError::Config(format!(
            "Invalid {name} '{other}': expected true or false"
        ))),
    }
}

/// Orchestrates a query: cache lookup → render → extract → filter → cache write.
///
/// Generic over its collaborators via traits, so the renderer, extractor and
/// cache backing are all injected.
pub struct QueryService<R, E, C>
where
    R: Renderer,
    E: Extractor,
    C: CacheStore,
{
    renderer: R,
    extractor: E,
    cache: C,
    config: QueryConfig,
}

impl<R, E, C> QueryService<R, E, C>
where
    R: Renderer,
    E: Extractor,
    C: CacheStore,
{
    pub fn new(renderer: R, extractor: E, cache: C, config: QueryConfig) -> Self {
        Self {
            renderer,
            extractor,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Trim the caller's term, substituting the default when blank.
    pub fn resolve_term(&self, term: &str) -> String {
        let term = term.trim();
        if term.is_empty() {
            self.config.default_term.clone()
        } else {
            term.to_string()
        }
    }

    /// Listings page URL with `term` embedded as the search parameter.
    pub fn target_url(&self, term: &str) -> String {
        let mut url = self.config.listing_url.clone();
        url.query_pairs_mut().append_pair(&self.config.search_param, term);
        url.into()
    }

    /// Answer a query, from cache when possible.
    ///
    /// 1. Unless `force_refresh`, return a cached result (flagged `cached`)
    /// 2. Render the listings page for the term
    /// 3. Extract job records, filtering by term when configured
    /// 4. Cache the fresh result and return it
    ///
    /// A render failure fails the whole query and nothing is cached. Cache
    /// failures never fail a query: a failed read is a miss, a failed write
    /// is logged.
    pub async fn query(&self, term: &str, force_refresh: bool) -> Result<QueryResult, AppError> {
        let term = self.resolve_term(term);
        let key = cache_key(&term);

        if !force_refresh {
            if let Some(hit) = self.lookup(&key).await {
                tracing::info!(%term, count = hit.count(), "Cache hit");
                return Ok(hit);
            }
        }

        let target = self.target_url(&term);
        tracing::info!(%term, %target, force_refresh, "Rendering listings page");
        let html = self.renderer.render(&target).await?;
        tracing::info!(bytes = html.len(), "Rendered HTML");

        let mut jobs = self.extractor.extract(&html);
        let extracted = jobs.len();
        if self.config.filter_results {
            jobs.retain(|job| matches_term(job, &term));
        }
        tracing::info!(%term, extracted, kept = jobs.len(), "Extraction complete");

        let result = QueryResult::fresh(term, jobs);
        self.store(&key, &result).await;

        Ok(result)
    }

    /// Like [`query`](Self::query), but gives up as soon as `cancel` fires.
    ///
    /// The in-flight render is dropped and no cache write happens.
    pub async fn query_with_cancel(
        &self,
        term: &str,
        force_refresh: bool,
        cancel: &CancellationToken,
    ) -> Result<QueryResult, AppError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(term = %term.trim(), "Query cancelled");
                Err(AppError::Cancelled)
            }
            result = self.query(term, force_refresh) => result,
        }
    }

    async fn lookup(&self, key: &str) -> Option<QueryResult> {
        let payload = match self.cache.get(key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(%key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str::<QueryResult>(&payload) {
            Ok(result) => Some(result.into_cached()),
            Err(e) => {
                tracing::warn!(%key, error = %e, "Discarding unreadable cache entry");
                None
            }
        }
    }

    async fn store(&self, key: &str, result: &QueryResult) {
        let payload = match serde_json::to_string(result) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(%key, error = %e, "Failed to serialize result, not caching");
                return;
            }
        };

        if let Err(e) = self.cache.put(key, payload, self.config.ttl).await {
            tracing::warn!(%key, error = %e, "Cache write failed");
        }
    }
}
