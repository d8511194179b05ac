//! End-to-end checks against a real upstream served on an ephemeral port,
//! covering what the scripted transport cannot: URL construction, header
//! forwarding on the wire, and the timeout bound.

use axum::{
    Json, Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    routing::get,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceExt;

use rostrum::api;
use rostrum::clients::upstream::{
    HttpUpstream, UpstreamError, UpstreamRequest, UpstreamTransport,
};
use rostrum::config::Config;

async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn http_upstream_forwards_and_parses_replies() {
    let upstream_app = Router::new().route(
        "/posts",
        get(|| async { Json(json!({"success": true, "data": {"posts": []}})) }),
    );
    let base = spawn_upstream(upstream_app).await;

    let upstream = HttpUpstream::with_client(reqwest::Client::new(), &base);
    let reply = upstream.send(UpstreamRequest::get("/posts")).await.unwrap();

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["success"], true);
}

#[tokio::test]
async fn authorization_reaches_the_upstream_unchanged() {
    let upstream_app = Router::new().route(
        "/auth/me",
        get(|headers: HeaderMap| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            Json(json!({"success": true, "data": {"auth": auth}}))
        }),
    );
    let base = spawn_upstream(upstream_app).await;

    let upstream = HttpUpstream::with_client(reqwest::Client::new(), &base);
    let mut request = UpstreamRequest::get("/auth/me");
    request.authorization = Some("Bearer wire-token".to_string());

    let reply = upstream.send(request).await.unwrap();
    assert_eq!(reply.body["data"]["auth"], "Bearer wire-token");
}

#[tokio::test]
async fn query_strings_pass_through_verbatim() {
    let upstream_app = Router::new().route(
        "/notices",
        get(
            |axum::extract::RawQuery(query): axum::extract::RawQuery| async move {
                Json(json!({"success": true, "data": {"query": query.unwrap_or_default()}}))
            },
        ),
    );
    let base = spawn_upstream(upstream_app).await;

    let upstream = HttpUpstream::with_client(reqwest::Client::new(), &base);
    let mut request = UpstreamRequest::get("/notices");
    request.query = Some("category=press&page=2".to_string());

    let reply = upstream.send(request).await.unwrap();
    assert_eq!(reply.body["data"]["query"], "category=press&page=2");
}

#[tokio::test]
async fn slow_upstream_times_out_within_the_deadline() {
    let upstream_app = Router::new().route(
        "/posts",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"success": true}))
        }),
    );
    let base = spawn_upstream(upstream_app).await;

    let upstream = HttpUpstream::with_client(reqwest::Client::new(), &base);
    let mut request = UpstreamRequest::get("/posts");
    request.timeout = Duration::from_millis(150);

    let start = Instant::now();
    let result = upstream.send(request).await;
    let elapsed = start.elapsed();

    assert!(matches!(result, Err(UpstreamError::Timeout)));
    assert!(
        elapsed < Duration::from_secs(2),
        "timeout took {elapsed:?}, expected well under 2s"
    );
}

#[tokio::test]
async fn full_stack_answers_fallback_before_the_caller_gives_up() {
    let upstream_app = Router::new().route(
        "/popups",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"success": true, "data": []}))
        }),
    );
    let base = spawn_upstream(upstream_app).await;

    let mut config = Config::default();
    config.upstream.base_url = base;
    config.upstream.timeout_ms = 200;

    let transport: Arc<dyn UpstreamTransport> =
        Arc::new(HttpUpstream::from_config(&config.upstream).unwrap());
    let state = api::create_app_state(config, transport, None);
    let app = api::router(state);

    let start = Instant::now();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/popups")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);

    assert!(
        elapsed < Duration::from_secs(2),
        "fallback took {elapsed:?}, expected well under 2s"
    );
}

#[tokio::test]
async fn full_stack_proxies_a_healthy_upstream() {
    let upstream_app = Router::new()
        .route(
            "/notices",
            get(|| async {
                Json(json!({
                    "success": true,
                    "data": [{
                        "title": "Spring rally",
                        "content": "Details inside.",
                        "category": "event",
                        "status": "published"
                    }]
                }))
            }),
        )
        .route("/health", get(|| async { Json(json!({"success": true})) }));
    let base = spawn_upstream(upstream_app).await;

    let mut config = Config::default();
    config.upstream.base_url = base;

    let transport: Arc<dyn UpstreamTransport> =
        Arc::new(HttpUpstream::from_config(&config.upstream).unwrap());
    let state = api::create_app_state(config, transport, None);
    let app = api::router(state);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/notices")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"][0]["category"], "event");
    assert_eq!(body["data"][0]["views"], 0);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/system/health/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
