//! Integration tests for the Redis cache client
//!
//! These tests require a running Redis instance.
//! Run with: cargo test -p sp_infra --test redis_integration -- --ignored

use sp_core::repositories::KeyValueCache;
use sp_infra::RedisClient;
use sp_shared::config::CacheConfig;

fn config() -> CacheConfig {
    CacheConfig {
        url: std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        ..CacheConfig::default()
    }
}

fn unique_key(label: &str) -> String {
    format!("test:{}:{}", label, uuid::Uuid::new_v4())
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_connection_and_health() {
    let client = RedisClient::connect(config()).await.unwrap();
    assert!(client.health_check().await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_set_get_delete_round_trip() {
    let client = RedisClient::connect(config()).await.unwrap();
    let key = unique_key("token");

    client
        .set_with_expiry(&key, "sealed-payload", 300)
        .await
        .unwrap();
    assert_eq!(
        client.get(&key).await.unwrap(),
        Some("sealed-payload".to_string())
    );
    assert!(client.exists(&key).await.unwrap());

    let ttl = client.ttl(&key).await.unwrap().unwrap();
    assert!(ttl > 0 && ttl <= 300);

    assert!(client.delete(&key).await.unwrap());
    assert_eq!(client.get(&key).await.unwrap(), None);
    assert!(!client.delete(&key).await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_counter_with_window() {
    let client = RedisClient::connect(config()).await.unwrap();
    let key = unique_key("counter");

    assert_eq!(client.increment(&key).await.unwrap(), 1);
    assert_eq!(client.increment(&key).await.unwrap(), 2);

    assert!(client.expire(&key, 60).await.unwrap());
    let ttl = client.ttl(&key).await.unwrap().unwrap();
    assert!(ttl > 0 && ttl <= 60);

    client.delete(&key).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_ttl_reports_missing_and_persistent_keys() {
    let client = RedisClient::connect(config()).await.unwrap();

    assert_eq!(client.ttl(&unique_key("missing")).await.unwrap(), None);

    // A counter created without a window has no expiry
    let key = unique_key("persistent");
    client.increment(&key).await.unwrap();
    assert_eq!(client.ttl(&key).await.unwrap(), None);
    client.delete(&key).await.unwrap();
}
