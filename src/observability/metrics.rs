//! Metrics collection.
//!
//! # Metrics
//! - `sim_dispatch_total` (counter): routed requests by server, algorithm
//! - `sim_dispatch_rejected_total` (counter): dropped requests by reason
//! - `sim_completions_total` (counter): released connections
//! - `sim_pool_size` (gauge): current number of servers
//! - `sim_autoscale_events_total` (counter): pool changes by direction
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; without an installed recorder
//!   every call is a no-op
//! - No exporter is started here since the simulator does no network I/O

use crate::load_balancer::{Algorithm, ServerId};

/// Record a successful dispatch.
pub fn record_dispatch(server: &ServerId, algorithm: Algorithm) {
    metrics::counter!(
        "sim_dispatch_total",
        "server" => server.to_string(),
        "algorithm" => algorithm.as_str()
    )
    .increment(1);
}

/// Record a request that was dropped.
pub fn record_rejected(reason: &'static str) {
    metrics::counter!("sim_dispatch_rejected_total", "reason" => reason).increment(1);
}

/// Record a released connection.
pub fn record_completion() {
    metrics::counter!("sim_completions_total").increment(1);
}

/// Record the current pool size.
pub fn record_pool_size(size: usize) {
    metrics::gauge!("sim_pool_size").set(size as f64);
}

/// Record an autoscale pool change.
pub fn record_autoscale(direction: &'static str) {
    metrics::counter!("sim_autoscale_events_total", "direction" => direction).increment(1);
}
