use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use tokio::net::TcpListener;
use url::Url;

use jobfinder_client::{PatternExtractor, RendererClient, RendererConfig};
use jobfinder_core::testutil::job_card;
use jobfinder_core::{MemoryCacheStore, QueryConfig, QueryService};
use jobfinder_server::cache::CacheBackend;
use jobfinder_server::routes;
use jobfinder_server::state::AppState;

/// A stand-in for the rendering service, counting every request it serves.
pub struct FakeRenderer {
    html: String,
    fail: bool,
    hits: AtomicUsize,
}

impl FakeRenderer {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub struct TestApp {
    pub router: Router,
    pub renderer: Arc<FakeRenderer>,
    pub cache: MemoryCacheStore,
}

pub fn listings_page() -> String {
    format!(
        r#"<html><body>
            {}
            {}
            <a class="personio-job-card" data-office="Berlin"></a>
        </body></html>"#,
        job_card("Ergotherapeut (m/w/d)", "Köln", "/job/1"),
        job_card("Ergotherapeutin Teilzeit", "Bonn", "/job/2"),
    )
}

async fn render(State(fake): State<Arc<FakeRenderer>>) -> (StatusCode, String) {
    fake.hits.fetch_add(1, Ordering::SeqCst);
    if fake.fail {
        (StatusCode::INTERNAL_SERVER_ERROR, "render crashed".into())
    } else {
        (StatusCode::OK, fake.html.clone())
    }
}

async fn spawn_renderer(fake: Arc<FakeRenderer>) -> Url {
    let app = Router::new().route("/render", get(render)).with_state(fake);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/render")).unwrap()
}

async fn build(html: String, fail: bool) -> TestApp {
    let renderer = Arc::new(FakeRenderer {
        html,
        fail,
        hits: AtomicUsize::new(0),
    });
    let endpoint = spawn_renderer(renderer.clone()).await;

    let renderer_config = RendererConfig::default()
        .with_endpoint(endpoint)
        .with_timeout(Duration::from_secs(5));
    let client = RendererClient::new(&renderer_config).unwrap();

    let query_config = QueryConfig::default();
    let extractor = PatternExtractor::default().with_base_url(query_config.listing_url.clone());
    let cache = MemoryCacheStore::new(64);

    let service = QueryService::new(
        client,
        extractor,
        CacheBackend::Memory(cache.clone()),
        query_config,
    );

    TestApp {
        router: routes::router(Arc::new(AppState { service })),
        renderer,
        cache,
    }
}

/// App whose renderer serves the two-listing page.
pub async fn setup_test_app() -> TestApp {
    build(listings_page(), false).await
}

/// App whose renderer answers every request with a 500.
pub async fn setup_failing_app() -> TestApp {
    build(String::new(), true).await
}
