//! Billing passthroughs (Stripe sessions and pricing).

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::HeaderMap,
};

use super::{inbound_body, relay, AuthPolicy};
use crate::backend::{Deadline, Payload, ProxyError, ProxyRequest};
use crate::http::request::RequestId;
use crate::http::server::AppState;
use crate::session::Session;

async fn post_billing(
    state: &AppState,
    session: &Session,
    path: &'static str,
    request_id: Option<String>,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Payload, ProxyError> {
    let token = AuthPolicy::Optional.authorize(session)?;
    let request = ProxyRequest::post(path)
        .token(token)
        .body(inbound_body(headers, body)?)
        .request_id(request_id);
    relay(state, request, Deadline::Standard).await
}

/// POST /api/billing/create-portal
pub async fn create_portal(
    State(state): State<AppState>,
    session: Session,
    RequestId(request_id): RequestId,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Payload, ProxyError> {
    post_billing(&state, &session, "/billing/create-portal", request_id, &headers, body).await
}

/// POST /api/billing/create-checkout-session
pub async fn create_checkout_session(
    State(state): State<AppState>,
    session: Session,
    RequestId(request_id): RequestId,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Payload, ProxyError> {
    post_billing(&state, &session, "/billing/create-checkout-session", request_id, &headers, body).await
}

/// GET /api/billing/pricing
pub async fn pricing(
    State(state): State<AppState>,
    session: Session,
    RequestId(request_id): RequestId,
    RawQuery(query): RawQuery,
) -> Result<Payload, ProxyError> {
    let token = AuthPolicy::Optional.authorize(&session)?;
    let request = ProxyRequest::get("/billing/pricing")
        .token(token)
        .query(query)
        .request_id(request_id);
    relay(&state, request, Deadline::Standard).await
}
