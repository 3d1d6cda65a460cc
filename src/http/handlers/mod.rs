//! Route handlers for the `/api` surface.
//!
//! Every handler runs the same pipeline:
//!
//! ```text
//! RECEIVE → AUTH-CHECK (if required) → FORWARD → NORMALIZE → RESPOND
//! ```
//!
//! Input and auth errors are answered locally; the backend is never
//! contacted for them.

pub mod auth;
pub mod billing;
pub mod chat;
pub mod message;
pub mod users;

use axum::body::Bytes;
use axum::http::{header, HeaderMap};

use crate::backend::{normalize, Deadline, Payload, ProxyBody, ProxyError, ProxyRequest};
use crate::config::GatewayConfig;
use crate::http::server::AppState;
use crate::session::Session;

/// Whether a route needs an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Reject with 401 before any backend call when no token is present.
    Required,
    /// Attach the bearer token when present, call anonymously otherwise.
    Optional,
}

impl AuthPolicy {
    /// Policy for chat list/create/get/delete, from `chat.auth_required`.
    pub fn for_chat(config: &GatewayConfig) -> Self {
        if config.chat.auth_required {
            Self::Required
        } else {
            Self::Optional
        }
    }

    /// Resolve the token to forward, or fail fast.
    pub fn authorize(self, session: &Session) -> Result<Option<String>, ProxyError> {
        match (self, session.access_token()) {
            (_, Some(token)) => Ok(Some(token)),
            (Self::Optional, None) => Ok(None),
            (Self::Required, None) => {
                tracing::debug!("Rejecting unauthenticated request");
                Err(ProxyError::AuthRequired)
            }
        }
    }
}

/// Forward `request` and normalize the outcome.
pub(crate) async fn relay(
    state: &AppState,
    request: ProxyRequest,
    deadline: Deadline,
) -> Result<Payload, ProxyError> {
    let response = state.forwarder.forward(request, deadline).await?;
    normalize(response).await
}

/// Turn an inbound body into an outbound one.
pub(crate) fn inbound_body(headers: &HeaderMap, body: Bytes) -> Result<ProxyBody, ProxyError> {
    ProxyBody::from_inbound(headers.get(header::CONTENT_TYPE), body)
        .map_err(|_| ProxyError::ClientInput("Request body must be valid JSON".to_string()))
}

/// Reject path ids that could escape their backend path segment.
pub(crate) fn path_id(id: &str) -> Result<&str, ProxyError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(id)
    } else {
        Err(ProxyError::ClientInput("Invalid chat id".to_string()))
    }
}
