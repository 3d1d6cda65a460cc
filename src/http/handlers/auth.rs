//! Auth handlers: login, OAuth, logout, session info.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use super::{inbound_body, relay, AuthPolicy};
use crate::backend::{Deadline, Payload, ProxyError, ProxyRequest};
use crate::http::request::RequestId;
use crate::http::server::AppState;
use crate::session::Session;

/// Store tokens found in a backend auth response.
///
/// The body itself is echoed to the browser unchanged; cookies ride along.
fn establish_session(session: Session, payload: Payload) -> Response {
    let (status, data) = match payload {
        Payload::Json { status, data } => (status, data),
        stream @ Payload::Stream { .. } => return (session, stream).into_response(),
    };

    let access = data.get("access_token").and_then(Value::as_str);
    let refresh = data.get("refresh_token").and_then(Value::as_str);
    let session = match access.filter(|a| !a.is_empty()) {
        Some(access) => {
            tracing::info!(refresh = refresh.is_some(), "Session established");
            session.set_tokens(access, refresh)
        }
        None => {
            tracing::warn!("Auth response carried no access_token");
            session
        }
    };

    (session, (status, Json(data))).into_response()
}

/// Forward an auth exchange and set cookies on success.
async fn exchange(
    state: &AppState,
    session: Session,
    path: &'static str,
    request_id: Option<String>,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let request = ProxyRequest::post(path)
        .body(inbound_body(headers, body)?)
        .request_id(request_id);
    let payload = relay(state, request, Deadline::Standard).await?;
    Ok(establish_session(session, payload))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    RequestId(request_id): RequestId,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    exchange(&state, session, "/auth/login", request_id, &headers, body).await
}

/// POST /api/auth/google
///
/// Starts the OAuth flow; the backend answers with the provider URL.
pub async fn google_init(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Payload, ProxyError> {
    let request = ProxyRequest::post("/auth/google")
        .body(inbound_body(&headers, body)?)
        .request_id(request_id);
    relay(&state, request, Deadline::Standard).await
}

/// POST /api/auth/google/callback
pub async fn google_callback(
    State(state): State<AppState>,
    session: Session,
    RequestId(request_id): RequestId,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    exchange(&state, session, "/auth/google/callback", request_id, &headers, body).await
}

/// POST /api/auth/logout
///
/// Never fails: the backend call is best effort and the cookies are always
/// cleared.
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    RequestId(request_id): RequestId,
) -> Response {
    if let Some(token) = session.access_token() {
        let request = ProxyRequest::post("/auth/logout")
            .token(Some(token))
            .request_id(request_id);
        match relay(&state, request, Deadline::Standard).await {
            Ok(_) => tracing::debug!("Backend logout acknowledged"),
            Err(e) => tracing::warn!(error = %e, "Backend logout failed, clearing cookies anyway"),
        }
    }

    (session.clear_tokens(), Json(json!({ "success": true }))).into_response()
}

/// GET /api/auth/session
pub async fn session_info(
    State(state): State<AppState>,
    session: Session,
    RequestId(request_id): RequestId,
) -> Result<Payload, ProxyError> {
    let token = AuthPolicy::Required.authorize(&session)?;
    let request = ProxyRequest::get("/auth/session")
        .token(token)
        .request_id(request_id);
    relay(&state, request, Deadline::Standard).await
}
