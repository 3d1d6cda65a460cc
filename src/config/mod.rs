//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, apply_process_env, load_config, ConfigError};
pub use schema::{
    BackendConfig, ChatConfig, Environment, GatewayConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, SecurityConfig, SessionConfig,
};
pub use validation::{validate_config, ValidationError};
