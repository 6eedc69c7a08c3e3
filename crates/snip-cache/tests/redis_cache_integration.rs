use std::time::Duration;

use redis::AsyncCommands;
use snip_cache::{RedisUrlCache, UrlCache, DEFAULT_TTL};
use snip_core::ShortCode;
use snip_test_infra::redis::RedisServer;

async fn connect(url: &str) -> redis::aio::MultiplexedConnection {
    let client = redis::Client::open(url).expect("redis client");
    client
        .get_multiplexed_async_connection()
        .await
        .expect("redis connection")
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn stores_both_directions_with_expiry() {
    let server = RedisServer::new().await.expect("start redis");
    let url = server.url().await.expect("redis url");
    let cache = RedisUrlCache::connect(&url, DEFAULT_TTL)
        .await
        .expect("connect cache");
    let code = ShortCode::new_unchecked("Ab-_9xYz");

    cache.set_url(&code, "https://example.com/x").await.unwrap();
    cache.set_code("https://example.com/x", &code).await.unwrap();

    assert_eq!(
        cache.get_url(&code).await.unwrap().as_deref(),
        Some("https://example.com/x")
    );
    assert_eq!(
        cache.get_code("https://example.com/x").await.unwrap(),
        Some(code)
    );

    let mut conn = connect(&url).await;
    let ttl: i64 = conn.ttl("snip:code:Ab-_9xYz").await.unwrap();
    assert!(ttl > 0 && ttl <= DEFAULT_TTL.as_secs() as i64);
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn missing_keys_are_misses() {
    let server = RedisServer::new().await.expect("start redis");
    let url = server.url().await.expect("redis url");
    let cache = RedisUrlCache::connect(&url, DEFAULT_TTL)
        .await
        .expect("connect cache");

    assert!(cache
        .get_url(&ShortCode::new_unchecked("nothing"))
        .await
        .unwrap()
        .is_none());
    assert!(cache.get_code("https://nothing.example").await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn entries_expire() {
    let server = RedisServer::new().await.expect("start redis");
    let url = server.url().await.expect("redis url");
    let conn = connect(&url).await;
    let cache = RedisUrlCache::with_prefix(conn, "test:", Duration::from_secs(1));
    let code = ShortCode::new_unchecked("fleeting");

    cache.set_url(&code, "https://example.com").await.unwrap();
    assert!(cache.get_url(&code).await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert!(cache.get_url(&code).await.unwrap().is_none());
}

#[tokio::test]
async fn connect_rejects_malformed_url() {
    let err = RedisUrlCache::connect("not a redis url", DEFAULT_TTL)
        .await
        .unwrap_err();

    assert!(matches!(err, snip_cache::CacheError::Initialization(_)));
}
