//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! gate, registry, strategies produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request paths go to logs, never to metric labels
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
