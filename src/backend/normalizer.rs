//! Mapping of raw backend responses onto the gateway's response contract.
//!
//! # Responsibilities
//! - Coerce non-OK bodies into a `{ error }` message
//! - Pass streaming text bodies through unbuffered
//! - Parse everything else as JSON

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures_util::StreamExt;
use serde_json::Value;

use crate::backend::error::{BackendErrorBody, NetworkFailure, ProxyError};

/// Successful backend payload.
#[derive(Debug)]
pub enum Payload {
    Json { status: StatusCode, data: Value },
    Stream { status: StatusCode, content_type: HeaderValue, body: Body },
}

impl Payload {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Json { status, .. } | Self::Stream { status, .. } => *status,
        }
    }
}

impl IntoResponse for Payload {
    fn into_response(self) -> Response {
        match self {
            Self::Json { status, data } => (status, Json(data)).into_response(),
            Self::Stream { status, content_type, body } => {
                (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
            }
        }
    }
}

/// Whether a content type denotes a streaming text payload.
pub fn is_streaming(content_type: Option<&HeaderValue>) -> bool {
    let Some(ct) = content_type.and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let ct = ct.to_ascii_lowercase();
    ct.starts_with("text/") || ct.contains("event-stream")
}

fn to_status(status: reqwest::StatusCode) -> StatusCode {
    StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY)
}

/// Normalize a backend response.
pub async fn normalize(response: reqwest::Response) -> Result<Payload, ProxyError> {
    let status = to_status(response.status());

    if !status.is_success() {
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) if e.is_timeout() => return Err(ProxyError::Network(NetworkFailure::Timeout)),
            Err(_) => Default::default(),
        };
        let message = BackendErrorBody::parse(&bytes).message(status);
        tracing::warn!(status = status.as_u16(), message = %message, "Backend returned an error");
        return Err(ProxyError::Backend { status, message });
    }

    let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
    if is_streaming(content_type.as_ref()) {
        let stream = response.bytes_stream().inspect(|chunk| {
            if let Err(e) = chunk {
                tracing::warn!(error = %e, "Backend stream interrupted");
            }
        });
        return Ok(Payload::Stream {
            status,
            content_type: content_type.unwrap_or_else(|| HeaderValue::from_static("text/plain")),
            body: Body::from_stream(stream),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ProxyError::Network(NetworkFailure::from_reqwest(&e)))?;
    if bytes.is_empty() {
        return Ok(Payload::Json { status, data: Value::Null });
    }

    match serde_json::from_slice(&bytes) {
        Ok(data) => Ok(Payload::Json { status, data }),
        Err(e) => {
            tracing::error!(error = %e, "Backend returned malformed JSON");
            Err(ProxyError::MalformedBody)
        }
    }
}
