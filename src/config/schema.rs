//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Default backend origin used when nothing else is configured.
///
/// Local-development convenience only; production deployments set
/// `backend.base_url` or `BACKEND_URL`.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Deployment environment (drives cookie `Secure` and log format).
    pub environment: Environment,

    /// Listener configuration (bind address, inbound timeout).
    pub listener: ListenerConfig,

    /// Backend API settings.
    pub backend: BackendConfig,

    /// Auth cookie lifetimes.
    pub session: SessionConfig,

    /// Chat endpoint policy.
    pub chat: ChatConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request hardening.
    pub security: SecurityConfig,
}

impl GatewayConfig {
    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.environment == Environment::Production
    }
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Inbound request timeout in seconds. Must exceed every backend timeout.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            request_timeout_secs: 60,
        }
    }
}

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend origin, e.g. "https://api.example.com".
    pub base_url: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Deadline for ordinary backend calls in seconds.
    pub request_timeout_secs: u64,

    /// Deadline for the streaming-message call to start responding, in seconds.
    pub stream_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
            stream_timeout_secs: 30,
        }
    }
}

/// Auth cookie lifetimes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// `Max-Age` of the access token cookie in seconds (7 days).
    pub access_max_age_secs: i64,

    /// `Max-Age` of the refresh token cookie in seconds (30 days).
    pub refresh_max_age_secs: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            access_max_age_secs: 7 * 24 * 60 * 60,
            refresh_max_age_secs: 30 * 24 * 60 * 60,
        }
    }
}

/// Chat endpoint policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Require an access token on chat list/create/get/delete.
    pub auth_required: bool,

    /// Token limit reported by `/api/chat/limit` when the backend cannot answer.
    pub token_limit_fallback: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            auth_required: true,
            token_limit_fallback: 10_000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log format; defaults to JSON in production and pretty otherwise.
    pub log_format: Option<LogFormat>,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: None,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}
