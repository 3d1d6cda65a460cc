//! Outbound calls to the backend API.
//!
//! One attempt per call. Every call carries a deadline; when it elapses the
//! in-flight request is dropped and the caller sees `NetworkFailure::Timeout`.
//! Standard calls are bounded through the body read; stream calls only until
//! the response headers arrive.

use axum::body::Bytes;
use axum::http::{header, HeaderValue, Method};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::backend::error::NetworkFailure;
use crate::config::BackendConfig;
use crate::http::request::X_REQUEST_ID;
use crate::observability::metrics;
use crate::resilience::timeouts::with_deadline;

/// Body of an outbound request.
#[derive(Debug, Clone, Default)]
pub enum ProxyBody {
    #[default]
    Empty,
    Json(Value),
    /// Forwarded byte-for-byte with its original content type.
    Raw { content_type: HeaderValue, bytes: Bytes },
}

impl ProxyBody {
    /// Build a body from an inbound request.
    ///
    /// JSON (or untyped) payloads are parsed so handlers can inspect them.
    /// `text/plain` bodies are parsed when they hold JSON, since `fetch`
    /// labels string bodies that way; anything else is passed through untouched.
    pub fn from_inbound(content_type: Option<&HeaderValue>, bytes: Bytes) -> Result<Self, serde_json::Error> {
        if bytes.is_empty() {
            return Ok(Self::Empty);
        }
        match content_type {
            Some(ct) if is_plain_text(ct) => Ok(match serde_json::from_slice(&bytes) {
                Ok(value) => Self::Json(value),
                Err(_) => Self::Raw {
                    content_type: ct.clone(),
                    bytes,
                },
            }),
            Some(ct) if !is_json(ct) => Ok(Self::Raw {
                content_type: ct.clone(),
                bytes,
            }),
            _ => serde_json::from_slice(&bytes).map(Self::Json),
        }
    }

    /// The JSON value, if this body carries one.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }
}

fn is_json(content_type: &HeaderValue) -> bool {
    content_type
        .to_str()
        .map(|ct| ct.to_ascii_lowercase().contains("json"))
        .unwrap_or(false)
}

fn is_plain_text(content_type: &HeaderValue) -> bool {
    content_type
        .to_str()
        .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("text/plain"))
        .unwrap_or(false)
}

/// A request to relay to the backend.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: Method,
    /// Backend path, starting with `/`.
    pub path: String,
    pub query: Option<String>,
    /// Access token; when absent no `Authorization` header is sent.
    pub token: Option<String>,
    pub body: ProxyBody,
    pub request_id: Option<String>,
}

impl ProxyRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            token: None,
            body: ProxyBody::Empty,
            request_id: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn body(mut self, body: ProxyBody) -> Self {
        self.body = body;
        self
    }

    pub fn json(self, value: Value) -> Self {
        self.body(ProxyBody::Json(value))
    }

    pub fn query(mut self, query: Option<String>) -> Self {
        self.query = query.filter(|q| !q.is_empty());
        self
    }

    pub fn request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}

/// Deadline class of an outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    /// `backend.request_timeout_secs`.
    Standard,
    /// `backend.stream_timeout_secs`; bounds time until the stream starts.
    Stream,
}

/// HTTP client bound to the configured backend origin.
#[derive(Clone)]
pub struct BackendForwarder {
    client: Client,
    base_url: String,
    request_timeout: Duration,
    stream_timeout: Duration,
}

impl BackendForwarder {
    pub fn new(config: &BackendConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            stream_timeout: Duration::from_secs(config.stream_timeout_secs),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, request: &ProxyRequest) -> String {
        match &request.query {
            Some(q) => format!("{}{}?{}", self.base_url, request.path, q),
            None => format!("{}{}", self.base_url, request.path),
        }
    }

    /// Send `request` to the backend.
    ///
    /// Returns the raw response for any HTTP status; only failures that
    /// prevent a response from arriving are errors.
    pub async fn forward(&self, request: ProxyRequest, deadline: Deadline) -> Result<Response, NetworkFailure> {
        let url = self.url_for(&request);
        let limit = match deadline {
            Deadline::Standard => self.request_timeout,
            Deadline::Stream => self.stream_timeout,
        };

        let mut builder = self.client.request(request.method.clone(), &url);
        if deadline == Deadline::Standard {
            // Covers the body read as well; surfaces as `is_timeout()`.
            builder = builder.timeout(limit);
        }

        builder = match request.body {
            ProxyBody::Empty => builder.header(header::CONTENT_TYPE, "application/json"),
            ProxyBody::Json(ref value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(value.to_string()),
            ProxyBody::Raw { ref content_type, ref bytes } => builder
                .header(header::CONTENT_TYPE, content_type.clone())
                .body(bytes.clone()),
        };

        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(id) = &request.request_id {
            builder = builder.header(X_REQUEST_ID, id.as_str());
        }

        let start = Instant::now();
        let method = request.method.as_str();
        let result = match with_deadline(limit, builder.send()).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => {
                let failure = NetworkFailure::from_reqwest(&e);
                tracing::error!(
                    request_id = ?request.request_id,
                    method = %method,
                    path = %request.path,
                    kind = failure.kind(),
                    error = %e,
                    "Backend request failed"
                );
                Err(failure)
            }
            Err(_) => {
                tracing::error!(
                    request_id = ?request.request_id,
                    method = %method,
                    path = %request.path,
                    timeout = ?limit,
                    "Backend request timed out"
                );
                Err(NetworkFailure::Timeout)
            }
        };

        match &result {
            Ok(response) => {
                tracing::debug!(
                    request_id = ?request.request_id,
                    method = %method,
                    path = %request.path,
                    status = response.status().as_u16(),
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Backend responded"
                );
                metrics::record_backend_call(method, &request.path, response.status().as_u16(), start);
            }
            Err(failure) => metrics::record_backend_failure(method, &request.path, *failure),
        }

        result
    }
}
