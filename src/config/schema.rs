//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the simulator.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::load_balancer::Algorithm;

/// Root configuration for the dispatch simulator.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimConfig {
    /// Dispatch policy and clock settings.
    pub simulation: SimulationConfig,

    /// Initial server pool, in pool order.
    pub servers: Vec<ServerConfig>,

    /// Routing history and request log capacities.
    pub history: HistoryConfig,

    /// Autoscaling control loop.
    pub autoscale: AutoscaleConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            servers: vec![
                ServerConfig::new(1, 400),
                ServerConfig::new(2, 250),
                ServerConfig::new(1, 700),
            ],
            history: HistoryConfig::default(),
            autoscale: AutoscaleConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Dispatch settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Initial selection policy.
    pub algorithm: Algorithm,

    /// Real-time step, in milliseconds, at which the actor advances the clock.
    pub resolution_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::RoundRobin,
            resolution_ms: 50,
        }
    }
}

/// Simulated server definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Explicit label; defaults to the next unused letter.
    #[serde(default)]
    pub id: Option<String>,

    /// Weight for weighted load balancing (default: 1).
    #[serde(default = "default_weight")]
    pub weight: u32,

    /// Simulated service latency in milliseconds.
    #[serde(default = "default_response_time_ms")]
    pub response_time_ms: u64,

    /// Whether the server starts up.
    #[serde(default = "default_up")]
    pub up: bool,
}

impl ServerConfig {
    pub fn new(weight: u32, response_time_ms: u64) -> Self {
        Self {
            id: None,
            weight,
            response_time_ms,
            up: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(default_weight(), default_response_time_ms())
    }
}

fn default_weight() -> u32 {
    1
}

fn default_response_time_ms() -> u64 {
    400
}

fn default_up() -> bool {
    true
}

/// Bounded history settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Routing decisions retained (oldest dropped first).
    pub routing_capacity: usize,

    /// Request log lines retained (oldest dropped first).
    pub log_capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            routing_capacity: 100,
            log_capacity: 50,
        }
    }
}

/// Autoscaling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AutoscaleConfig {
    /// Start with autoscaling enabled.
    pub enabled: bool,

    /// Tick period in milliseconds.
    pub interval_ms: u64,

    /// Add a server when average connections exceed this.
    pub scale_up_threshold: f64,

    /// Remove the last server when average connections fall below this.
    pub scale_down_threshold: f64,

    /// Lower bound (inclusive) of a new server's response time.
    pub min_response_time_ms: u64,

    /// Upper bound (exclusive) of a new server's response time.
    pub max_response_time_ms: u64,
}

impl Default for AutoscaleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: 1000,
            scale_up_threshold: 0.9,
            scale_down_threshold: 0.25,
            min_response_time_ms: 300,
            max_response_time_ms: 1000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
