use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use jobfinder_core::{CacheStore, cache_key};

use crate::integration::common::{setup_failing_app, setup_test_app};

async fn get(router: &Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body) = get(router, uri).await;
    (status, serde_json::from_str(&body).unwrap())
}

#[tokio::test]
async fn search_returns_extracted_jobs() {
    let app = setup_test_app().await;

    let (status, json) = get_json(&app.router, "/api?term=Ergotherapeut").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cached"], false);
    assert_eq!(json["term"], "Ergotherapeut");
    assert_eq!(json["count"], 2);
    assert_eq!(json["jobs"][0]["title"], "Ergotherapeut (m/w/d)");
    assert_eq!(json["jobs"][0]["location"], "Köln – Vollzeit");
    assert_eq!(json["jobs"][0]["link"], "https://novotergum.de/job/1");
    assert_eq!(app.renderer.hits(), 1);
}

#[tokio::test]
async fn search_body_is_pretty_printed() {
    let app = setup_test_app().await;

    let (_, body) = get(&app.router, "/api?term=Ergotherapeut").await;

    assert!(body.starts_with("{\n  \"cached\": false,\n  \"term\""));
}

#[tokio::test]
async fn repeat_search_is_cached() {
    let app = setup_test_app().await;

    get_json(&app.router, "/api?term=Ergotherapeut").await;
    let (status, json) = get_json(&app.router, "/api?term=ergotherapeut").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cached"], true);
    assert_eq!(json["term"], "Ergotherapeut");
    assert_eq!(json["count"], 2);
    assert_eq!(app.renderer.hits(), 1);
}

#[tokio::test]
async fn refresh_bypasses_cache() {
    let app = setup_test_app().await;

    get_json(&app.router, "/api?term=Ergotherapeut").await;
    let (_, json) = get_json(&app.router, "/api?term=Ergotherapeut&refresh=1").await;
    assert_eq!(json["cached"], false);

    let (_, json) = get_json(&app.router, "/api?term=Ergotherapeut&refresh=true").await;
    assert_eq!(json["cached"], false);

    assert_eq!(app.renderer.hits(), 3);
}

#[tokio::test]
async fn blank_term_uses_default() {
    let app = setup_test_app().await;

    let (status, json) = get_json(&app.router, "/api?term=%20%20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["term"], "Ergotherapeut");

    let (_, json) = get_json(&app.router, "/api").await;
    assert_eq!(json["term"], "Ergotherapeut");
    assert_eq!(json["cached"], true);
}

#[tokio::test]
async fn render_failure_returns_502_and_caches_nothing() {
    let app = setup_failing_app().await;

    let (status, json) = get_json(&app.router, "/api?term=Logopaede").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "render_unavailable");
    assert!(json["message"].as_str().unwrap().contains("500"));
    assert!(app.cache.get(&cache_key("Logopaede")).await.unwrap().is_none());
}

#[tokio::test]
async fn health_reports_cache_backend() {
    let app = setup_test_app().await;

    let (status, json) = get_json(&app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["cache"], "memory");
}

#[tokio::test]
async fn index_serves_search_page() {
    let app = setup_test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));

    let (_, body) = get(&app.router, "/index.html").await;
    assert!(body.contains("/api?term="));
}

#[tokio::test]
async fn openapi_document_lists_routes() {
    let app = setup_test_app().await;

    let (status, json) = get_json(&app.router, "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/api"].is_object());
    assert!(json["paths"]["/health"].is_object());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = setup_test_app().await;

    let (status, _) = get(&app.router, "/v1/jobs").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.renderer.hits(), 0);
}
