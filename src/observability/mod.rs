//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher, simulation and autoscaler produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - The request log shown to users is simulation data, not a tracing sink
//! - Metrics are cheap facade calls

pub mod logging;
pub mod metrics;
