//! Backend API client subsystem.
//!
//! # Data Flow
//! ```text
//! Route handler
//!     → forwarder.rs (build URL, headers, bearer; single attempt under a deadline)
//!     → reqwest::Response | NetworkFailure
//!     → normalizer.rs (JSON | passthrough stream | ProxyError)
//!     → Route handler writes the browser response
//! ```
//!
//! # Design Decisions
//! - No retries; callers decide whether to try again
//! - Failures are values (`ProxyError`), never panics or caught exceptions
//! - Backend error bodies are coerced into one `{ error }` shape at this boundary

pub mod error;
pub mod forwarder;
pub mod normalizer;

pub use error::{NetworkFailure, ProxyError, AUTH_REQUIRED_MESSAGE};
pub use forwarder::{BackendForwarder, Deadline, ProxyBody, ProxyRequest};
pub use normalizer::{normalize, Payload};
