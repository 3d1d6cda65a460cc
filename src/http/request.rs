//! Request identification.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the client sent none
//! - Echo it on the response and forward it to the backend
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderName, Request},
};
use std::convert::Infallible;
use tower_http::request_id::{MakeRequestId, RequestId as TowerRequestId};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Header name for request IDs.
pub fn request_id_header() -> HeaderName {
    HeaderName::from_static(X_REQUEST_ID)
}

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeUuidRequestId;

impl MakeRequestId for MakeUuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<TowerRequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        id.parse().ok().map(TowerRequestId::new)
    }
}

/// The current request's ID, if the request-id layer assigned one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestId(pub Option<String>);

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok(RequestId(id))
    }
}
