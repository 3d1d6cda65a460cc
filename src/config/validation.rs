//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, cookie lifetimes > 0)
//! - Check that the backend origin is a usable http(s) URL
//! - Keep the inbound timeout above the backend deadlines
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("backend.base_url '{url}' is invalid: {reason}")]
    InvalidBackendUrl { url: String, reason: String },

    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error(
        "listener.request_timeout_secs ({inbound}) must exceed backend timeouts ({backend})"
    )]
    InboundTimeoutTooShort { inbound: u64, backend: u64 },
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.backend.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::InvalidBackendUrl {
            url: config.backend.base_url.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidBackendUrl {
            url: config.backend.base_url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let positives: [(&'static str, bool); 7] = [
        ("listener.request_timeout_secs", config.listener.request_timeout_secs > 0),
        ("backend.connect_timeout_secs", config.backend.connect_timeout_secs > 0),
        ("backend.request_timeout_secs", config.backend.request_timeout_secs > 0),
        ("backend.stream_timeout_secs", config.backend.stream_timeout_secs > 0),
        ("session.access_max_age_secs", config.session.access_max_age_secs > 0),
        ("session.refresh_max_age_secs", config.session.refresh_max_age_secs > 0),
        ("security.max_body_size", config.security.max_body_size > 0),
    ];
    for (field, ok) in positives {
        if !ok {
            errors.push(ValidationError::NotPositive(field));
        }
    }

    let backend_max = config
        .backend
        .request_timeout_secs
        .max(config.backend.stream_timeout_secs);
    if config.listener.request_timeout_secs > 0 && config.listener.request_timeout_secs <= backend_max {
        errors.push(ValidationError::InboundTimeoutTooShort {
            inbound: config.listener.request_timeout_secs,
            backend: backend_max,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
