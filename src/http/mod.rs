//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Browser request (/api/...)
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handlers/* (auth check → forward → normalize)
//!     → response (JSON, stream, or { error }) + Set-Cookie
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use request::{RequestId, X_REQUEST_ID};
pub use server::{AppState, GatewayServer};
