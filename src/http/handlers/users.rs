//! User profile handlers.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method},
};

use super::{inbound_body, relay, AuthPolicy};
use crate::backend::{Deadline, Payload, ProxyError, ProxyRequest};
use crate::http::request::RequestId;
use crate::http::server::AppState;
use crate::session::Session;

/// GET /api/users/profile
pub async fn get_profile(
    State(state): State<AppState>,
    session: Session,
    RequestId(request_id): RequestId,
) -> Result<Payload, ProxyError> {
    let token = AuthPolicy::Required.authorize(&session)?;
    let request = ProxyRequest::get("/users/profile")
        .token(token)
        .request_id(request_id);
    relay(&state, request, Deadline::Standard).await
}

/// PUT /api/users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    RequestId(request_id): RequestId,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Payload, ProxyError> {
    let token = AuthPolicy::Required.authorize(&session)?;
    let request = ProxyRequest::new(Method::PUT, "/users/profile")
        .token(token)
        .body(inbound_body(&headers, body)?)
        .request_id(request_id);
    relay(&state, request, Deadline::Standard).await
}
