use std::num::NonZeroU32;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use snip_cache::MokaUrlCache;
use snip_core::{Redirector, Shortener};
use snip_gateway::{App, AppState, IpRateLimiter};
use snip_redirector::RedirectorService;
use snip_shortener::{CodePolicy, HashGenerator, ShortenerService};
use snip_storage::InMemoryRepository;
use tower::ServiceExt;

const BASE_URL: &str = "https://sho.rt/";

fn app_with_limits(per_second: u32, burst: u32) -> Router {
    let repository = Arc::new(InMemoryRepository::new());
    let cache = Arc::new(MokaUrlCache::new());

    let shortener: Arc<dyn Shortener> = Arc::new(ShortenerService::new(
        Arc::clone(&repository),
        Arc::clone(&cache),
        HashGenerator::new(),
        CodePolicy::default(),
    ));
    let redirector: Arc<dyn Redirector> = Arc::new(RedirectorService::new(repository, cache));
    let limiter = Arc::new(IpRateLimiter::new(
        NonZeroU32::new(per_second).unwrap(),
        NonZeroU32::new(burst).unwrap(),
    ));

    App::router(AppState::new(shortener, redirector, BASE_URL), limiter)
}

fn app() -> Router {
    app_with_limits(1000, 1000)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn code_of(short_url: &str) -> String {
    short_url.rsplit('/').next().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();

    let (status, _, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn shorten_then_redirect_round_trips() {
    let app = app();
    let original = "https://example.com/a/b?x=1";

    let (status, _, body) = send(&app, post_json("/shorten", json!({"original_url": original}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["original_url"], original);

    let short_url = body["short_url"].as_str().unwrap();
    assert!(short_url.starts_with("https://sho.rt/"));
    let code = code_of(short_url);
    assert_eq!(code.len(), 8);
    assert!(code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));

    let (status, headers, _) = send(&app, get(&format!("/{code}"))).await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(headers[header::LOCATION], original);
}

#[tokio::test]
async fn shorten_is_idempotent() {
    let app = app();
    let request = || post_json("/shorten", json!({"original_url": "https://example.com"}));

    let (_, _, first) = send(&app, request()).await;
    let (_, _, second) = send(&app, request()).await;

    assert_eq!(first["short_url"], second["short_url"]);
}

#[tokio::test]
async fn custom_alias_and_conflict() {
    let app = app();

    let (status, _, body) = send(
        &app,
        post_json(
            "/shorten",
            json!({"original_url": "https://one.example", "custom_alias": "my-alias"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["short_url"], "https://sho.rt/my-alias");

    let (status, _, body) = send(
        &app,
        post_json(
            "/shorten",
            json!({"original_url": "https://two.example", "custom_alias": "my-alias"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn invalid_input_is_rejected() {
    let app = app();

    let (status, _, body) = send(
        &app,
        Request::post("/shorten")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "invalid request"}));

    let (status, _, _) = send(&app, post_json("/shorten", json!({"original_url": "nope"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(
        &app,
        post_json(
            "/shorten",
            json!({"original_url": "https://example.com", "custom_alias": "a!"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn aliases_shadowed_by_routes_are_rejected() {
    let app = app();

    for alias in ["health", "urls", "shorten", "analytics"] {
        let (status, _, body) = send(
            &app,
            post_json(
                "/shorten",
                json!({"original_url": "https://example.com", "custom_alias": alias}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "alias {alias}");
        assert!(body["error"].is_string());
    }

    let (_, _, body) = send(&app, get("/urls")).await;
    assert_eq!(body["total_count"], 0);
}

#[tokio::test]
async fn unknown_code_is_not_found() {
    let app = app();

    let (status, _, body) = send(&app, get("/doesnotexist")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn analytics_counts_redirects() {
    let app = app();
    send(
        &app,
        post_json(
            "/shorten",
            json!({"original_url": "https://example.com", "custom_alias": "counted"}),
        ),
    )
    .await;

    for _ in 0..3 {
        let (status, _, _) = send(&app, get("/counted")).await;
        assert_eq!(status, StatusCode::FOUND);
    }

    let (status, _, body) = send(&app, get("/analytics/counted")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["short_code"], "counted");
    assert_eq!(body["original_url"], "https://example.com");
    assert_eq!(body["click_count"], 3);
    assert!(body["last_accessed_at"].is_string());

    let (status, _, _) = send(&app, get("/analytics/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_paginates() {
    let app = app();
    for i in 1..=25 {
        let (status, _, _) = send(
            &app,
            post_json(
                "/shorten",
                json!({"original_url": format!("https://example.com/{i}"), "custom_alias": format!("rec{i:02}")}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _, body) = send(&app, get("/urls?page=2&limit=10")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 25);
    assert_eq!(body["pages"], 3);
    let codes: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["short_code"].as_str().unwrap())
        .collect();
    let expected: Vec<String> = (6..=15).rev().map(|i| format!("rec{i:02}")).collect();
    assert_eq!(codes, expected);

    let (_, _, body) = send(&app, get("/urls?limit=0")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 25);
    assert_eq!(body["pages"], 1);

    let (status, _, body) = send(&app, get("/urls?page=abc&limit=xyz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 25);
}

#[tokio::test]
async fn rate_limit_rejects_after_burst() {
    let app = app_with_limits(1, 5);
    let from = |ip: &str| {
        Request::get("/urls")
            .header("x-forwarded-for", ip)
            .body(Body::empty())
            .unwrap()
    };

    for _ in 0..5 {
        let (status, _, _) = send(&app, from("198.51.100.1")).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _, body) = send(&app, from("198.51.100.1")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body, json!({"error": "Too Many Requests, Try after sometime"}));

    let (status, _, _) = send(&app, from("198.51.100.2")).await;
    assert_eq!(status, StatusCode::OK);

    // Health checks bypass the limiter.
    let (status, _, _) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}
