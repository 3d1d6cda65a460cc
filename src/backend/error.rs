//! Error taxonomy shared by the forwarder, the normalizer and the handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Message returned to the browser when a protected route is hit without a token.
pub const AUTH_REQUIRED_MESSAGE: &str = "Authentication required. Please log in.";

/// Failure that happened before any backend response was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NetworkFailure {
    #[error("Connection refused: the backend server may not be running")]
    ConnectionRefused,

    #[error("Connection reset by the backend server")]
    ConnectionReset,

    #[error("Request to the backend timed out")]
    Timeout,

    #[error("Request to the backend was aborted")]
    Aborted,

    #[error("Failed to reach the backend server")]
    Unknown,
}

impl NetworkFailure {
    /// Classify a failure from its textual description.
    pub fn classify(description: &str) -> Self {
        let text = description.to_ascii_lowercase();
        if text.contains("refused") {
            Self::ConnectionRefused
        } else if text.contains("reset") {
            Self::ConnectionReset
        } else if text.contains("timed out") || text.contains("timeout") {
            Self::Timeout
        } else if text.contains("abort") || text.contains("cancel") {
            Self::Aborted
        } else {
            Self::Unknown
        }
    }

    /// Classify a reqwest error from its source chain.
    ///
    /// The top-level message embeds the URL, so it is only consulted when
    /// there is no underlying cause.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }
        let mut causes = Vec::new();
        let mut source = std::error::Error::source(err);
        while let Some(inner) = source {
            causes.push(inner.to_string());
            source = inner.source();
        }
        if causes.is_empty() {
            return Self::classify(&err.to_string());
        }
        Self::classify(&causes.join(": "))
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionRefused => "connection_refused",
            Self::ConnectionReset => "connection_reset",
            Self::Timeout => "timeout",
            Self::Aborted => "aborted",
            Self::Unknown => "unknown",
        }
    }
}

/// Every way a proxied call can fail, as seen by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// Missing or invalid client input; no backend call was made.
    #[error("{0}")]
    ClientInput(String),

    /// Protected route without an access token; no backend call was made.
    #[error("{}", AUTH_REQUIRED_MESSAGE)]
    AuthRequired,

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Backend { status: StatusCode, message: String },

    /// The backend could not be reached.
    #[error(transparent)]
    Network(#[from] NetworkFailure),

    /// The backend answered OK with a body that is not JSON.
    #[error("Invalid JSON response from backend")]
    MalformedBody,
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ClientInput(_) => StatusCode::BAD_REQUEST,
            Self::AuthRequired => StatusCode::UNAUTHORIZED,
            Self::Backend { status, .. } => *status,
            Self::Network(_) | Self::MalformedBody => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Shapes a backend error body can take.
///
/// FastAPI reports `detail` either as a string or as a list of validation
/// entries; other services use `error`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BackendErrorBody {
    Detail { detail: Value },
    Error { error: Value },
    Other(Value),
}

impl BackendErrorBody {
    /// Parse raw bytes, falling back to an empty object on invalid JSON.
    pub fn parse(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_else(|_| Self::Other(json!({})))
    }

    /// Human readable message, defaulting to `HTTP <status>`.
    pub fn message(&self, status: StatusCode) -> String {
        let extracted = match self {
            Self::Detail { detail } => describe(detail),
            Self::Error { error } => describe(error),
            Self::Other(_) => None,
        };
        extracted.unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
    }
}

fn describe(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| match item.get("msg") {
                    Some(Value::String(msg)) => Some(msg.clone()),
                    _ => describe(item),
                })
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        Value::Object(map) => map.get("message").and_then(describe),
        _ => None,
    }
}
