use jobfinder_client::{PatternExtractor, RendererClient};
use jobfinder_core::QueryService;

use crate::cache::CacheBackend;

/// The query pipeline as wired for the server.
pub type JobQueryService = QueryService<RendererClient, PatternExtractor, CacheBackend>;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    pub service: JobQueryService,
}
