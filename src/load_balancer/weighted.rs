//! Weighted round-robin load balancing strategy.
//!
//! Conceptually each eligible server appears `max(1, weight)` times, back to
//! back and in pool order, in a cycle of `total_weight` slots. The cursor
//! walks slot numbers and the owner of a slot is found with a prefix-sum walk,
//! so the cycle is never materialized.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::load_balancer::{server::Server, LoadBalancer};

/// Weighted round-robin selector.
#[derive(Debug, Default)]
pub struct WeightedRoundRobin {
    cursor: AtomicU64,
}

impl WeightedRoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Length of one weighted cycle: the sum of `max(1, weight)` over eligible servers.
pub fn total_weight(servers: &[Server]) -> u64 {
    servers
        .iter()
        .filter(|s| s.is_eligible())
        .map(|s| u64::from(s.effective_weight()))
        .sum()
}

/// Pool index owning `slot` of the weighted cycle.
pub fn slot_owner(servers: &[Server], slot: u64) -> Option<usize> {
    let mut remaining = slot;
    for (i, server) in servers.iter().enumerate().filter(|(_, s)| s.is_eligible()) {
        let weight = u64::from(server.effective_weight());
        if remaining < weight {
            return Some(i);
        }
        remaining -= weight;
    }
    None
}

impl LoadBalancer for WeightedRoundRobin {
    fn next_server(&self, servers: &[Server], _client_ip: Option<&str>) -> Option<usize> {
        let total = total_weight(servers);
        if total == 0 {
            return None;
        }
        let prev = self
            .cursor
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| {
                Some((c % total + 1) % total)
            })
            .unwrap_or_else(|c| c);
        slot_owner(servers, prev % total)
    }

    fn clamp_cursor(&self, servers: &[Server]) {
        let total = total_weight(servers);
        let _ = self
            .cursor
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| {
                Some(if total == 0 { 0 } else { c % total })
            });
    }
}
