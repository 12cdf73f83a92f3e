use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use serde::Serialize;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use jobfinder_core::AppError;

use crate::dto::{HealthResponse, SearchQuery, SearchResponse};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Build the full router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/index.html", get(index))
        .route("/api", get(search))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Search page
// ---------------------------------------------------------------------------

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// ---------------------------------------------------------------------------
// Search API
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api",
    params(SearchQuery),
    responses(
        (status = 200, description = "Jobs matching the term", body = SearchResponse),
        (status = 502, description = "Renderer unavailable", body = crate::dto::ErrorResponse),
    ),
    tag = "search"
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    let term = query.term.as_deref().unwrap_or_default();
    let result = state.service.query(term, query.force_refresh()).await?;

    tracing::info!(
        term = %result.term(),
        count = result.count(),
        cached = result.is_cached(),
        "Served search"
    );

    pretty_json(StatusCode::OK, &SearchResponse::from(result))
}

/// Pretty-printed JSON response, as the search page and humans read it.
fn pretty_json<T: Serialize>(status: StatusCode, value: &T) -> Result<Response, ApiError> {
    let body = serde_json::to_string_pretty(value).map_err(AppError::from)?;
    Ok((
        status,
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        body,
    )
        .into_response())
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Cache backing unreachable", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cache = state.service.cache();

    let (status, label) = match cache.health_check().await {
        Ok(()) => (StatusCode::OK, "healthy"),
        Err(e) => {
            tracing::warn!(error = %e, "Cache health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
        }
    };

    let response = HealthResponse {
        status: label,
        cache: cache.kind().to_string(),
    };

    (status, axum::Json(response))
}
