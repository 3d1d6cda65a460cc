//! Message history, streamed replies, timeouts and billing passthroughs.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use futures_util::stream;
use serde_json::json;
use std::time::Duration;

mod common;

fn post_prompt(uri: &str, prompt: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "prompt": prompt }).to_string()))
        .unwrap()
}

fn streaming_backend() -> Router {
    Router::new().route(
        "/chat/{id}/message",
        post(|| async {
            let chunks = stream::iter(
                ["BTC is ", "trading at ", "$64,000"]
                    .into_iter()
                    .map(|s| Ok::<_, std::io::Error>(s.to_string())),
            );
            (
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                Body::from_stream(chunks),
            )
        })
        .get(|| async { Json(json!([{ "role": "user", "content": "hi" }])) }),
    )
}

#[tokio::test]
async fn test_empty_prompt_is_rejected_locally() {
    let backend = common::start_mock_backend(streaming_backend()).await;
    let app = common::gateway(common::config_for(&backend));

    let res = common::send(&app, post_prompt("/api/chat/c1/message", "")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::json_body(res).await, json!({ "error": "Prompt is required" }));

    let missing = Request::builder()
        .method("POST")
        .uri("/api/chat/c1/message")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let res = common::send(&app, missing).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert_eq!(backend.recorder.hits(), 0);
}

#[tokio::test]
async fn test_reply_is_streamed_as_plain_text() {
    let backend = common::start_mock_backend(streaming_backend()).await;
    let app = common::gateway(common::config_for(&backend));

    let res = common::send(&app, post_prompt("/api/chat/c1/message", "price of BTC?")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "text/plain; charset=utf-8");
    assert_eq!(res.headers()[header::CACHE_CONTROL], "no-cache");
    assert_eq!(res.headers()[header::CONNECTION], "keep-alive");
    assert_eq!(common::text_body(res).await, "BTC is trading at $64,000");
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let backend = common::start_mock_backend(Router::new().route(
        "/chat/{id}/message",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "too late"
        }),
    ))
    .await;
    let mut config = common::config_for(&backend);
    config.backend.stream_timeout_secs = 1;
    let app = common::gateway(config);

    let res = common::send(&app, post_prompt("/api/chat/c1/message", "hello")).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        common::json_body(res).await,
        json!({ "error": "Request to the backend timed out" })
    );
}

#[tokio::test]
async fn test_unreachable_backend_is_classified() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = tradechat_gateway::GatewayConfig::default();
    config.backend.base_url = format!("http://{}", addr);
    let app = common::gateway(config);

    let res = common::send(&app, post_prompt("/api/chat/c1/message", "hello")).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        common::json_body(res).await,
        json!({ "error": "Connection refused: the backend server may not be running" })
    );
}

#[tokio::test]
async fn test_message_history_forwards_query() {
    let backend = common::start_mock_backend(streaming_backend()).await;
    let app = common::gateway(common::config_for(&backend));

    let req = Request::builder()
        .uri("/api/chat/c1/message?limit=50")
        .body(Body::empty())
        .unwrap();
    let res = common::send(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(common::json_body(res).await[0]["content"], "hi");
    let seen = backend.recorder.last().unwrap();
    assert_eq!(seen.path, "/chat/c1/message");
    assert_eq!(seen.query.as_deref(), Some("limit=50"));
}

#[tokio::test]
async fn test_prompt_sent_as_plain_text_is_accepted() {
    let backend = common::start_mock_backend(streaming_backend()).await;
    let app = common::gateway(common::config_for(&backend));

    let req = Request::builder()
        .method("POST")
        .uri("/api/chat/c1/message")
        .header(header::CONTENT_TYPE, "text/plain;charset=UTF-8")
        .body(Body::from(json!({ "prompt": "price of BTC?" }).to_string()))
        .unwrap();
    let res = common::send(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(common::text_body(res).await, "BTC is trading at $64,000");

    let seen = backend.recorder.last().unwrap();
    assert_eq!(seen.content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_billing_passthroughs() {
    let backend = common::start_mock_backend(
        Router::new()
            .route("/billing/pricing", get(|| async { Json(json!({ "plans": ["pro"] })) }))
            .route(
                "/billing/create-portal",
                post(|| async { Json(json!({ "url": "https://billing.example.com/p" })) }),
            )
            .route(
                "/billing/create-checkout-session",
                post(|| async { Json(json!({ "sessionId": "cs_1" })) }),
            ),
    )
    .await;
    let app = common::gateway(common::config_for(&backend));

    let req = Request::builder().uri("/api/billing/pricing").body(Body::empty()).unwrap();
    let res = common::send(&app, req).await;
    assert_eq!(common::json_body(res).await, json!({ "plans": ["pro"] }));

    let req = Request::builder()
        .method("POST")
        .uri("/api/billing/create-portal")
        .header(header::COOKIE, "access_token=acc-1")
        .body(Body::empty())
        .unwrap();
    let res = common::send(&app, req).await;
    assert_eq!(common::json_body(res).await["url"], "https://billing.example.com/p");
    assert_eq!(
        backend.recorder.last().unwrap().authorization.as_deref(),
        Some("Bearer acc-1")
    );

    let req = Request::builder()
        .method("POST")
        .uri("/api/billing/create-checkout-session")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "priceId": "price_1" }).to_string()))
        .unwrap();
    let res = common::send(&app, req).await;
    assert_eq!(common::json_body(res).await["sessionId"], "cs_1");
}
