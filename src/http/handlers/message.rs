//! Chat message handlers: history and streamed replies.

use axum::{
    body::{Body, Bytes},
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use super::{inbound_body, path_id, relay, AuthPolicy};
use crate::backend::{Deadline, Payload, ProxyBody, ProxyError, ProxyRequest};
use crate::http::request::RequestId;
use crate::http::server::AppState;
use crate::session::Session;

/// GET /api/chat/{id}/message
pub async fn list_messages(
    State(state): State<AppState>,
    session: Session,
    RequestId(request_id): RequestId,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Payload, ProxyError> {
    let token = AuthPolicy::Optional.authorize(&session)?;
    let request = ProxyRequest::get(format!("/chat/{}/message", path_id(&id)?))
        .token(token)
        .query(query)
        .request_id(request_id);
    relay(&state, request, Deadline::Standard).await
}

/// Extract a non-blank `prompt` from a message body.
fn require_prompt(body: &ProxyBody) -> Result<&str, ProxyError> {
    body.as_json()
        .and_then(|v| v.get("prompt"))
        .and_then(Value::as_str)
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ProxyError::ClientInput("Prompt is required".to_string()))
}

/// POST /api/chat/{id}/message
///
/// Streams the assistant reply back as plain text. The backend must start
/// responding within `backend.stream_timeout_secs`.
pub async fn send_message(
    State(state): State<AppState>,
    session: Session,
    RequestId(request_id): RequestId,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let chat_id = path_id(&id)?;
    let body = inbound_body(&headers, body)?;
    let prompt_len = require_prompt(&body)?.len();

    let token = AuthPolicy::Optional.authorize(&session)?;
    tracing::debug!(chat_id = %chat_id, prompt_len, "Streaming message");

    let request = ProxyRequest::post(format!("/chat/{}/message", chat_id))
        .token(token)
        .body(body)
        .request_id(request_id);

    let (status, body) = match relay(&state, request, Deadline::Stream).await? {
        Payload::Stream { status, body, .. } => (status, body),
        Payload::Json { status, data } => {
            let text = match data {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (status, Body::from(text))
        }
    };

    Ok((
        status,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8")),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
            (header::CONNECTION, HeaderValue::from_static("keep-alive")),
        ],
        body,
    )
        .into_response())
}
