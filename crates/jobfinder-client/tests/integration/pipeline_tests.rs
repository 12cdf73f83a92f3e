//! End-to-end query scenarios: real extractor and in-memory cache, mocked renderer.

use jobfinder_client::PatternExtractor;
use jobfinder_core::testutil::{MockRenderer, job_card};
use jobfinder_core::{
    AppError, CacheStore, MemoryCacheStore, QueryConfig, QueryService, cache_key,
};

fn listings_page() -> String {
    format!(
        r#"<html><body><div class="results">
            {}
            {}
            <a class="personio-job-card" data-name="Physiotherapeut Springer" data-office="Aachen"></a>
        </div></body></html>"#,
        job_card("Physiotherapeut (m/w/d)", "Köln", "https://jobs.example/101"),
        job_card("Physiotherapeut Teilzeit", "Bonn", "https://jobs.example/102"),
    )
}

fn service(
    renderer: MockRenderer,
    cache: MemoryCacheStore,
) -> QueryService<MockRenderer, PatternExtractor, MemoryCacheStore> {
    QueryService::new(
        renderer,
        PatternExtractor::default(),
        cache,
        QueryConfig::default(),
    )
}

#[tokio::test]
async fn fresh_query_keeps_only_complete_cards() {
    let renderer = MockRenderer::new(&listings_page());
    let svc = service(renderer.clone(), MemoryCacheStore::new(16));

    let result = svc.query("Physiotherapeut", false).await.unwrap();

    assert_eq!(result.count(), 2);
    assert!(!result.is_cached());
    assert_eq!(result.jobs()[0].link, "https://jobs.example/101");
    assert_eq!(result.jobs()[1].location.as_deref(), Some("Bonn – Vollzeit"));
}

#[tokio::test]
async fn repeat_query_within_ttl_is_served_from_cache() {
    let renderer = MockRenderer::new(&listings_page());
    let svc = service(renderer.clone(), MemoryCacheStore::new(16));

    let first = svc.query("Physiotherapeut", false).await.unwrap();
    let second = svc.query("Physiotherapeut", false).await.unwrap();

    assert!(second.is_cached());
    assert_eq!(second.term(), first.term());
    assert_eq!(second.jobs(), first.jobs());
    assert_eq!(second.count(), 2);
    assert_eq!(renderer.call_count(), 1);
}

#[tokio::test]
async fn blank_term_falls_back_to_default() {
    let renderer = MockRenderer::new(&listings_page());
    let cache = MemoryCacheStore::new(16);
    let svc = service(renderer.clone(), cache.clone());

    let result = svc.query("", false).await.unwrap();

    assert_eq!(result.term(), "Ergotherapeut");
    assert!(renderer.calls.lock().unwrap()[0].ends_with("?_search=Ergotherapeut"));
    assert!(cache.get(&cache_key("Ergotherapeut")).await.unwrap().is_some());
}

#[tokio::test]
async fn render_failure_writes_nothing() {
    let renderer = MockRenderer::with_error(AppError::RenderUnavailable(
        "connection reset by peer".into(),
    ));
    let cache = MemoryCacheStore::new(16);
    let svc = service(renderer, cache.clone());

    let err = svc.query("Physiotherapeut", false).await.unwrap_err();

    assert!(err.is_render_unavailable());
    assert_eq!(cache.get(&cache_key("Physiotherapeut")).await.unwrap(), None);
}

#[tokio::test]
async fn empty_page_is_a_successful_zero_result() {
    let renderer = MockRenderer::new("<html><body><p>Keine Stellen</p></body></html>");
    let svc = service(renderer, MemoryCacheStore::new(16));

    let result = svc.query("Logopäde", false).await.unwrap();

    assert_eq!(result.count(), 0);
    assert!(result.jobs().is_empty());
}
