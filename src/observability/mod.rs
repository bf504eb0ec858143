//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! policy + transport produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Metrics calls are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
