//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the backend forwarder produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing in production
//! - Request ID flows from the inbound request to the backend call
//! - Metrics are cheap; without an installed recorder they are no-ops

pub mod logging;
pub mod metrics;
