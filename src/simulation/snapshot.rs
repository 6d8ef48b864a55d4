//! Read-only projections handed to the UI.

use serde::Serialize;

use crate::load_balancer::{Algorithm, ServerId};
use crate::simulation::history::RoutingHistoryEntry;

/// One server as displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerSnapshot {
    pub index: usize,
    pub id: ServerId,
    pub weight: u32,
    pub connections: u32,
    pub response_time_ms: u64,
    pub up: bool,
    pub total_requests: u64,
    /// Received a request within the last few hundred milliseconds.
    pub hit: bool,
}

/// Point-in-time view of the whole simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSnapshot {
    pub now_ms: u64,
    pub algorithm: Algorithm,
    pub autoscale_enabled: bool,
    pub average_connections: f64,
    pub servers: Vec<ServerSnapshot>,
    pub history: Vec<RoutingHistoryEntry>,
    pub log: Vec<String>,
}
