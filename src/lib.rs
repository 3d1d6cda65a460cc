//! Trading-chat API gateway.
//!
//! Serves the browser-facing `/api` surface and relays every call to the
//! backend API, owning the auth cookies on the way through.

pub mod backend;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod session;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
