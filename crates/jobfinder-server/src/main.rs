use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use jobfinder_client::{PatternExtractor, RendererClient, RendererConfig};
use jobfinder_core::{MemoryCacheStore, NullCache, QueryConfig, QueryService};
use jobfinder_db::{Database, DatabaseConfig};
use jobfinder_server::cache::{CacheBackend, CacheBackendKind, spawn_sweeper};
use jobfinder_server::config::ServerConfig;
use jobfinder_server::routes;
use jobfinder_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("jobfinder=info".parse()?))
        .with_target(false)
        .init();

    let server_config = ServerConfig::from_env()?;
    let query_config = QueryConfig::from_env()?;
    let renderer_config = RendererConfig::from_env()?;

    let shutdown = CancellationToken::new();
    let cache = match server_config.cache_backend {
        CacheBackendKind::Memory => {
            CacheBackend::Memory(MemoryCacheStore::new(server_config.cache_capacity))
        }
        CacheBackendKind::Postgres => {
            let db = Database::connect(&DatabaseConfig::from_env()?).await?;
            db.migrate().await?;
            let repo = db.cache_repo();
            spawn_sweeper(repo.clone(), server_config.sweep_interval, shutdown.clone());
            CacheBackend::Postgres(repo)
        }
        CacheBackendKind::None => CacheBackend::Disabled(NullCache),
    };

    let renderer = RendererClient::new(&renderer_config)?;
    let extractor = PatternExtractor::default().with_base_url(query_config.listing_url.clone());

    tracing::info!(
        cache = %cache.kind(),
        ttl_secs = query_config.ttl.as_secs(),
        filter = query_config.filter_results,
        renderer = %renderer_config.endpoint,
        "Query service configured"
    );

    let service = QueryService::new(renderer, extractor, cache, query_config);
    let state = Arc::new(AppState { service });

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", server_config.port);
    tracing::info!("Starting server on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown.cancel();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
