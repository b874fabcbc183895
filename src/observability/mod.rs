//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! gateway + ranking service produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the HTTP trace spans
//! - Secrets (API key, server secret) are never logged

pub mod logging;
pub mod metrics;
