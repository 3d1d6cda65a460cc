//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - Log level configurable via config; `RUST_LOG` wins when set

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Environment, GatewayConfig, LogFormat};

/// Resolve the effective log format.
pub fn log_format(config: &GatewayConfig) -> LogFormat {
    config.observability.log_format.unwrap_or(match config.environment {
        Environment::Production => LogFormat::Json,
        Environment::Development => LogFormat::Pretty,
    })
}

/// Default filter directive derived from the configured level.
pub fn default_directive(level: &str) -> String {
    format!("tradechat_gateway={level},tower_http={level}")
}

/// Install the global subscriber. Call once, from the binary.
pub fn init_logging(config: &GatewayConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(&config.observability.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match log_format(config) {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
