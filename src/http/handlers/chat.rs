//! Chat resource handlers: list, create, get, delete, token limit.

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use super::{inbound_body, path_id, relay, AuthPolicy};
use crate::backend::{Deadline, Payload, ProxyError, ProxyRequest};
use crate::http::request::RequestId;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::session::Session;

/// GET /api/chat
///
/// Fail-open: any backend or network error, or a body that is not an array,
/// yields `200 []` so the chat sidebar keeps rendering.
pub async fn list_chats(
    State(state): State<AppState>,
    session: Session,
    RequestId(request_id): RequestId,
    RawQuery(query): RawQuery,
) -> Result<Response, ProxyError> {
    let token = AuthPolicy::for_chat(&state.config).authorize(&session)?;
    let request = ProxyRequest::get("/chat")
        .token(token)
        .query(query)
        .request_id(request_id);

    let chats = match relay(&state, request, Deadline::Standard).await {
        Ok(Payload::Json { data: Value::Array(chats), .. }) => chats,
        Ok(other) => {
            tracing::warn!(status = other.status().as_u16(), "Chat list was not an array, returning empty list");
            metrics::record_fail_open("chat_list");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Chat list failed, returning empty list");
            metrics::record_fail_open("chat_list");
            Vec::new()
        }
    };

    Ok((StatusCode::OK, Json(Value::Array(chats))).into_response())
}

/// POST /api/chat/create
pub async fn create_chat(
    State(state): State<AppState>,
    session: Session,
    RequestId(request_id): RequestId,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Payload, ProxyError> {
    let token = AuthPolicy::for_chat(&state.config).authorize(&session)?;
    let body = inbound_body(&headers, body)?;
    let request = ProxyRequest::post("/chat/create")
        .token(token)
        .body(body)
        .request_id(request_id);

    let payload = relay(&state, request, Deadline::Standard).await?;
    if let Payload::Json { data, .. } = &payload {
        let id = data.get("chatId").or_else(|| data.get("id"));
        tracing::info!(chat_id = ?id, "Chat created");
    }
    Ok(payload)
}

/// GET /api/chat/{id}
pub async fn get_chat(
    State(state): State<AppState>,
    session: Session,
    RequestId(request_id): RequestId,
    Path(id): Path<String>,
) -> Result<Payload, ProxyError> {
    let token = AuthPolicy::for_chat(&state.config).authorize(&session)?;
    let request = ProxyRequest::get(format!("/chat/{}", path_id(&id)?))
        .token(token)
        .request_id(request_id);
    relay(&state, request, Deadline::Standard).await
}

/// DELETE /api/chat/{id}
pub async fn delete_chat(
    State(state): State<AppState>,
    session: Session,
    RequestId(request_id): RequestId,
    Path(id): Path<String>,
) -> Result<Payload, ProxyError> {
    let token = AuthPolicy::for_chat(&state.config).authorize(&session)?;
    let request = ProxyRequest::new(Method::DELETE, format!("/chat/{}", path_id(&id)?))
        .token(token)
        .request_id(request_id);

    let payload = relay(&state, request, Deadline::Standard).await?;
    tracing::info!(chat_id = %id, "Chat deleted");
    Ok(payload)
}

/// GET /api/chat/limit
///
/// Falls back to `chat.token_limit_fallback` when the backend cannot answer.
pub async fn get_limit(
    State(state): State<AppState>,
    session: Session,
    RequestId(request_id): RequestId,
) -> Result<Payload, ProxyError> {
    let token = AuthPolicy::Optional.authorize(&session)?;
    let request = ProxyRequest::get("/chat/limit")
        .token(token)
        .request_id(request_id);

    match relay(&state, request, Deadline::Standard).await {
        Ok(payload) => Ok(payload),
        Err(e) => {
            let fallback = state.config.chat.token_limit_fallback;
            tracing::warn!(error = %e, fallback, "Token limit unavailable, using fallback");
            metrics::record_fail_open("chat_limit");
            Ok(Payload::Json {
                status: StatusCode::OK,
                data: json!({ "limit": fallback }),
            })
        }
    }
}
