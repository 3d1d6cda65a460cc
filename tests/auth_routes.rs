//! Login, OAuth callback, logout and protected profile/session routes.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tradechat_gateway::config::Environment;

mod common;

fn auth_backend() -> Router {
    Router::new()
        .route(
            "/auth/login",
            post(|| async {
                Json(json!({
                    "access_token": "acc-1",
                    "refresh_token": "ref-1",
                    "token_type": "bearer",
                    "user": { "email": "trader@example.com" }
                }))
            }),
        )
        .route(
            "/auth/google/callback",
            post(|| async { Json(json!({ "access_token": "acc-g" })) }),
        )
        .route(
            "/auth/google",
            post(|| async { Json(json!({ "url": "https://accounts.example.com/o/oauth2" })) }),
        )
        .route("/auth/logout", post(|| async { Json(json!({ "ok": true })) }))
        .route(
            "/auth/session",
            get(|| async { Json(json!({ "user": { "email": "trader@example.com" } })) }),
        )
        .route(
            "/users/profile",
            get(|| async { Json(json!({ "name": "Ada" })) })
                .put(|Json(body): Json<serde_json::Value>| async move { Json(body) }),
        )
}

fn post_json(uri: &str, cookie: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn find_cookie<'a>(cookies: &'a [String], name: &str) -> &'a str {
    cookies
        .iter()
        .find(|c| c.starts_with(&format!("{}=", name)))
        .unwrap_or_else(|| panic!("missing {} cookie in {:?}", name, cookies))
}

#[tokio::test]
async fn test_login_sets_cookies_and_echoes_body() {
    let backend = common::start_mock_backend(auth_backend()).await;
    let mut config = common::config_for(&backend);
    config.environment = Environment::Production;
    let app = common::gateway(config);

    let res = common::send(
        &app,
        post_json("/api/auth/login", None, json!({ "email": "trader@example.com", "password": "pw" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let cookies = common::set_cookies(&res);
    let access = find_cookie(&cookies, "access_token");
    assert!(access.starts_with("access_token=acc-1"));
    assert!(access.contains("HttpOnly"));
    assert!(access.contains("Secure"));
    assert!(access.contains("SameSite=Lax"));
    assert!(access.contains("Max-Age=604800"));

    let refresh = find_cookie(&cookies, "refresh_token");
    assert!(refresh.starts_with("refresh_token=ref-1"));
    assert!(refresh.contains("Max-Age=2592000"));

    let body = common::json_body(res).await;
    assert_eq!(body["access_token"], "acc-1");
    assert_eq!(body["user"]["email"], "trader@example.com");
}

#[tokio::test]
async fn test_login_in_development_is_not_secure() {
    let backend = common::start_mock_backend(auth_backend()).await;
    let app = common::gateway(common::config_for(&backend));

    let res = common::send(&app, post_json("/api/auth/login", None, json!({}))).await;
    let cookies = common::set_cookies(&res);
    assert!(!find_cookie(&cookies, "access_token").contains("Secure"));
}

#[tokio::test]
async fn test_login_passes_form_body_through() {
    let backend = common::start_mock_backend(auth_backend()).await;
    let app = common::gateway(common::config_for(&backend));

    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=trader&password=pw"))
        .unwrap();
    let res = common::send(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let seen = backend.recorder.last().unwrap();
    assert_eq!(seen.content_type.as_deref(), Some("application/x-www-form-urlencoded"));
}

#[tokio::test]
async fn test_login_failure_sets_no_cookies() {
    let backend = common::start_mock_backend(Router::new().route(
        "/auth/login",
        post(|| async { (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Incorrect email or password" }))) }),
    ))
    .await;
    let app = common::gateway(common::config_for(&backend));

    let res = common::send(&app, post_json("/api/auth/login", None, json!({}))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(common::set_cookies(&res).is_empty());
    assert_eq!(
        common::json_body(res).await,
        json!({ "error": "Incorrect email or password" })
    );
}

#[tokio::test]
async fn test_google_callback_sets_access_cookie_only() {
    let backend = common::start_mock_backend(auth_backend()).await;
    let app = common::gateway(common::config_for(&backend));

    let res = common::send(&app, post_json("/api/auth/google/callback", None, json!({ "code": "xyz" }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let cookies = common::set_cookies(&res);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("access_token=acc-g"));
    assert_eq!(common::json_body(res).await, json!({ "access_token": "acc-g" }));
}

#[tokio::test]
async fn test_google_init_is_passthrough() {
    let backend = common::start_mock_backend(auth_backend()).await;
    let app = common::gateway(common::config_for(&backend));

    let res = common::send(&app, post_json("/api/auth/google", None, json!({}))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(common::set_cookies(&res).is_empty());
    assert_eq!(common::json_body(res).await["url"], "https://accounts.example.com/o/oauth2");
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let backend = common::start_mock_backend(auth_backend()).await;
    let app = common::gateway(common::config_for(&backend));

    for cookie in [Some("access_token=acc-1; refresh_token=ref-1"), None] {
        let res = common::send(&app, post_json("/api/auth/logout", cookie, json!({}))).await;
        assert_eq!(res.status(), StatusCode::OK);

        let cookies = common::set_cookies(&res);
        for name in ["access_token", "refresh_token"] {
            assert!(find_cookie(&cookies, name).contains("Max-Age=0"));
        }
        assert_eq!(common::json_body(res).await, json!({ "success": true }));
    }

    // Only the call that carried a token reached the backend.
    assert_eq!(backend.recorder.hits(), 1);
    assert_eq!(
        backend.recorder.last().unwrap().authorization.as_deref(),
        Some("Bearer acc-1")
    );
}

#[tokio::test]
async fn test_logout_succeeds_when_backend_fails() {
    let backend = common::start_mock_backend(Router::new().route(
        "/auth/logout",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    ))
    .await;
    let app = common::gateway(common::config_for(&backend));

    let res = common::send(&app, post_json("/api/auth/logout", Some("access_token=a"), json!({}))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(common::set_cookies(&res).len(), 2);
}

#[tokio::test]
async fn test_session_and_profile_require_token() {
    let backend = common::start_mock_backend(auth_backend()).await;
    let app = common::gateway(common::config_for(&backend));

    for uri in ["/api/auth/session", "/api/users/profile"] {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let res = common::send(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
    assert_eq!(backend.recorder.hits(), 0);

    let req = Request::builder()
        .uri("/api/auth/session")
        .header(header::COOKIE, "access_token=acc-1")
        .body(Body::empty())
        .unwrap();
    let res = common::send(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(common::json_body(res).await["user"]["email"], "trader@example.com");
}

#[tokio::test]
async fn test_profile_update_forwards_body() {
    let backend = common::start_mock_backend(auth_backend()).await;
    let app = common::gateway(common::config_for(&backend));

    let req = Request::builder()
        .method("PUT")
        .uri("/api/users/profile")
        .header(header::COOKIE, "access_token=acc-1")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "name": "Grace" }).to_string()))
        .unwrap();
    let res = common::send(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(common::json_body(res).await, json!({ "name": "Grace" }));

    let seen = backend.recorder.last().unwrap();
    assert_eq!(seen.method, "PUT");
    assert_eq!(seen.authorization.as_deref(), Some("Bearer acc-1"));
}
