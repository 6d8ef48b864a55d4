//! Round-robin load balancing strategy.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::load_balancer::{eligible, server::Server, LoadBalancer};

/// Round-robin selector.
/// Stores a cursor into the eligible-server list and advances it per call.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursor: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Advance `cursor` by one within `len`, returning the slot it pointed at.
pub(crate) fn advance(cursor: &AtomicUsize, len: usize) -> usize {
    let prev = cursor
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| {
            Some((c % len + 1) % len)
        })
        .unwrap_or_else(|c| c);
    prev % len
}

/// Reduce `cursor` modulo `len` (reset to 0 when `len` is 0).
pub(crate) fn clamp(cursor: &AtomicUsize, len: usize) {
    let _ = cursor.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| {
        Some(if len == 0 { 0 } else { c % len })
    });
}

impl LoadBalancer for RoundRobin {
    fn next_server(&self, servers: &[Server], _client_ip: Option<&str>) -> Option<usize> {
        let eligible = eligible(servers);
        if eligible.is_empty() {
            return None;
        }
        let slot = advance(&self.cursor, eligible.len());
        Some(eligible[slot])
    }

    fn clamp_cursor(&self, servers: &[Server]) {
        clamp(&self.cursor, eligible(servers).len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_balancer::server::ServerId;

    fn servers(n: usize) -> Vec<Server> {
        (0..n)
            .map(|i| Server::new(ServerId::from_ordinal(i), 1, 100))
            .collect()
    }

    #[test]
    fn test_round_robin() {
        let lb = RoundRobin::new();
        let pool = servers(2);

        assert_eq!(lb.next_server(&pool, None), Some(0));
        assert_eq!(lb.next_server(&pool, None), Some(1));
        assert_eq!(lb.next_server(&pool, None), Some(0));
    }

    #[test]
    fn test_skips_down_servers() {
        let lb = RoundRobin::new();
        let mut pool = servers(3);
        pool[1].up = false;

        let picks: Vec<_> = (0..4).filter_map(|_| lb.next_server(&pool, None)).collect();
        assert_eq!(picks, vec![0, 2, 0, 2]);
    }

    #[test]
    fn test_all_down() {
        let lb = RoundRobin::new();
        let mut pool = servers(2);
        pool.iter_mut().for_each(|s| s.up = false);
        assert_eq!(lb.next_server(&pool, None), None);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let lb = RoundRobin::new();
        let mut pool = servers(4);
        for _ in 0..3 {
            lb.next_server(&pool, None);
        }
        pool.truncate(2);
        lb.clamp_cursor(&pool);
        // Cursor was 3, now 3 % 2 = 1.
        assert_eq!(lb.next_server(&pool, None), Some(1));
        assert_eq!(lb.next_server(&pool, None), Some(0));
    }
}
