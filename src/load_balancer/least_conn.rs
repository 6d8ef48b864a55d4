//! Least Connections load balancing strategy.

use crate::load_balancer::{server::Server, LoadBalancer};

/// Least connections selector.
/// Selects the eligible server with the minimum number of in-flight connections.
#[derive(Debug, Default)]
pub struct LeastConnections;

impl LeastConnections {
    pub fn new() -> Self {
        Self
    }
}

impl LoadBalancer for LeastConnections {
    fn next_server(&self, servers: &[Server], _client_ip: Option<&str>) -> Option<usize> {
        // In case of tie, the first one in pool order is selected
        servers
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_eligible())
            .min_by_key(|(_, s)| s.connections)
            .map(|(i, _)| i)
    }
}
