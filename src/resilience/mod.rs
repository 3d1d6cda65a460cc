//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → timeouts.rs (enforce the per-call deadline)
//!     → On failure: classified by backend::error, returned to the handler
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every backend call has a deadline
//! - No automatic retries or circuit breaking; one attempt per call

pub mod timeouts;
