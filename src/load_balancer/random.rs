//! Uniform random load balancing strategy.

use rand::Rng;

use crate::load_balancer::{eligible, server::Server, LoadBalancer};

#[derive(Debug, Default)]
pub struct RandomSelect;

impl RandomSelect {
    pub fn new() -> Self {
        Self
    }
}

impl LoadBalancer for RandomSelect {
    fn next_server(&self, servers: &[Server], _client_ip: Option<&str>) -> Option<usize> {
        let eligible = eligible(servers);
        if eligible.is_empty() {
            return None;
        }
        let slot = rand::thread_rng().gen_range(0..eligible.len());
        Some(eligible[slot])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_balancer::server::ServerId;

    #[test]
    fn test_only_eligible_picked() {
        let lb = RandomSelect::new();
        let mut pool: Vec<Server> = (0..3)
            .map(|i| Server::new(ServerId::from_ordinal(i), 1, 100))
            .collect();
        pool[1].up = false;

        let mut seen = [false; 3];
        for _ in 0..200 {
            let pick = lb.next_server(&pool, None).unwrap();
            seen[pick] = true;
        }
        assert_eq!(seen, [true, false, true]);
    }
}
