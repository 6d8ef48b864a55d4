//! Least response time load balancing strategy.

use crate::load_balancer::{server::Server, LoadBalancer};

/// Picks the eligible server with the lowest simulated latency.
/// Ties go to the first server in pool order.
#[derive(Debug, Default)]
pub struct LeastResponseTime;

impl LeastResponseTime {
    pub fn new() -> Self {
        Self
    }
}

impl LoadBalancer for LeastResponseTime {
    fn next_server(&self, servers: &[Server], _client_ip: Option<&str>) -> Option<usize> {
        servers
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_eligible())
            .min_by_key(|(_, s)| s.response_time_ms)
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_balancer::server::ServerId;

    #[test]
    fn test_fastest_wins() {
        let lb = LeastResponseTime::new();
        let mut pool = vec![
            Server::new(ServerId::new("A"), 1, 400),
            Server::new(ServerId::new("B"), 2, 250),
            Server::new(ServerId::new("C"), 1, 250),
        ];
        assert_eq!(lb.next_server(&pool, None), Some(1));

        pool[1].up = false;
        assert_eq!(lb.next_server(&pool, None), Some(2));
    }
}
