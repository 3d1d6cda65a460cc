//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides from the process environment.
pub fn apply_process_env(config: &mut GatewayConfig) {
    apply_env_overrides(config, |key| std::env::var(key).ok());
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Recognized: `BACKEND_URL`, `APP_ENV`, `GATEWAY_BIND`. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = lookup("BACKEND_URL") {
        config.backend.base_url = url.trim_end_matches('/').to_string();
    }

    if let Some(env) = lookup("APP_ENV") {
        match env.parse() {
            Ok(environment) => config.environment = environment,
            Err(e) => tracing::warn!(error = %e, "Ignoring APP_ENV"),
        }
    }

    if let Some(bind) = lookup("GATEWAY_BIND") {
        config.listener.bind_address = bind;
    }
}
