//! Threshold autoscaling policy.
//!
//! Evaluates the instantaneous average load of the pool and decides whether
//! to grow or shrink it by one server. The simulation applies the decision.

use std::ops::Range;

use crate::config::AutoscaleConfig;
use crate::load_balancer::pool::{ServerPool, MIN_POOL_SIZE};

/// Outcome of one autoscale tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleDecision {
    /// Append one fresh server.
    ScaleUp,
    /// Remove the last server.
    ScaleDown,
    /// Load is within band.
    NoChange,
}

impl ScaleDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleDecision::ScaleUp => "up",
            ScaleDecision::ScaleDown => "down",
            ScaleDecision::NoChange => "none",
        }
    }
}

/// Single-sample threshold policy with no smoothing or cooldown.
#[derive(Debug, Clone)]
pub struct AutoscalePolicy {
    config: AutoscaleConfig,
}

impl AutoscalePolicy {
    pub fn new(config: AutoscaleConfig) -> Self {
        Self { config }
    }

    /// Tick period in milliseconds.
    pub fn interval_ms(&self) -> u64 {
        self.config.interval_ms.max(1)
    }

    /// Response-time range for servers the policy adds.
    pub fn response_time_range(&self) -> Range<u64> {
        self.config.min_response_time_ms..self.config.max_response_time_ms
    }

    /// Decide what to do given the pool's current load.
    pub fn evaluate(&self, pool: &ServerPool) -> ScaleDecision {
        let avg = pool.average_connections();

        if avg > self.config.scale_up_threshold {
            tracing::debug!(
                avg_connections = avg,
                threshold = self.config.scale_up_threshold,
                pool_size = pool.len(),
                "scaling up"
            );
            return ScaleDecision::ScaleUp;
        }

        if avg < self.config.scale_down_threshold && pool.len() > MIN_POOL_SIZE {
            tracing::debug!(
                avg_connections = avg,
                threshold = self.config.scale_down_threshold,
                pool_size = pool.len(),
                "scaling down"
            );
            return ScaleDecision::ScaleDown;
        }

        ScaleDecision::NoChange
    }
}

impl Default for AutoscalePolicy {
    fn default() -> Self {
        Self::new(AutoscaleConfig::default())
    }
}
