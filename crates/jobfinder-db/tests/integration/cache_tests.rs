use std::time::Duration;

use jobfinder_core::CacheStore;
use jobfinder_db::{CacheRepository, Database};

use crate::integration::common::setup_test_db;

const TTL: Duration = Duration::from_secs(600);

#[tokio::test]
async fn put_then_get_returns_payload() {
    let (pool, _container) = setup_test_db().await;
    let repo = CacheRepository::new(pool);

    repo.put("ntg-jobs-physiotherapeut", r#"{"count":2}"#, TTL)
        .await
        .unwrap();

    let payload = repo.get("ntg-jobs-physiotherapeut").await.unwrap();
    assert_eq!(payload.as_deref(), Some(r#"{"count":2}"#));
}

#[tokio::test]
async fn missing_key_is_absent() {
    let (pool, _container) = setup_test_db().await;
    let repo = CacheRepository::new(pool);

    assert_eq!(repo.get("ntg-jobs-nothing").await.unwrap(), None);
}

#[tokio::test]
async fn expired_entry_is_absent() {
    let (pool, _container) = setup_test_db().await;
    let repo = CacheRepository::new(pool);

    repo.put("k", "v", Duration::from_millis(200)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(repo.get("k").await.unwrap(), None);
    // Row still physically present until purged
    assert!(repo.entry("k").await.unwrap().is_some());
}

#[tokio::test]
async fn overwrite_replaces_entry_and_resets_expiry() {
    let (pool, _container) = setup_test_db().await;
    let repo = CacheRepository::new(pool);

    repo.put("k", "old", Duration::from_secs(1)).await.unwrap();
    let first = repo.entry("k").await.unwrap().unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    repo.put("k", "new", TTL).await.unwrap();
    let second = repo.entry("k").await.unwrap().unwrap();

    assert_eq!(second.payload, "new");
    assert!(second.stored_at > first.stored_at);
    assert_eq!(second.ttl.as_secs(), 600);
    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("new"));
}

#[tokio::test]
async fn purge_removes_only_expired_rows() {
    let (pool, _container) = setup_test_db().await;
    let repo = CacheRepository::new(pool);

    repo.put("stale", "a", Duration::from_millis(100)).await.unwrap();
    repo.put("live", "b", TTL).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    let purged = repo.purge_expired().await.unwrap();

    assert_eq!(purged, 1);
    assert!(repo.entry("stale").await.unwrap().is_none());
    assert_eq!(repo.get("live").await.unwrap().as_deref(), Some("b"));
}

#[tokio::test]
async fn works_through_cache_store_trait() {
    let (pool, _container) = setup_test_db().await;
    let store = CacheRepository::new(pool);

    CacheStore::put(&store, "k", "payload".to_string(), TTL)
        .await
        .unwrap();

    let payload = CacheStore::get(&store, "k").await.unwrap();
    assert_eq!(payload.as_deref(), Some("payload"));
}

#[tokio::test]
async fn health_check_succeeds() {
    let (pool, _container) = setup_test_db().await;
    let repo = CacheRepository::new(pool);

    repo.health_check().await.unwrap();
}

#[tokio::test]
async fn migrate_is_idempotent_and_keeps_rows() {
    let (pool, _container) = setup_test_db().await;
    let db = Database::from_pool(pool);

    db.cache_repo().put("k", "kept", TTL).await.unwrap();
    db.migrate().await.unwrap();

    assert_eq!(db.cache_repo().get("k").await.unwrap().as_deref(), Some("kept"));
}
