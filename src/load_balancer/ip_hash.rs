//! IP hash load balancing strategy.
//!
//! The hash is the sum of the client IP's UTF-16 character codes, reduced
//! modulo the number of eligible servers. Requests without a client IP take
//! an explicit random fallback: a dotted-quad is synthesized per call, so
//! those picks are not reproducible.

use rand::Rng;

use crate::load_balancer::{eligible, server::Server, LoadBalancer};

/// IP hash selector.
#[derive(Debug, Default)]
pub struct IpHash;

impl IpHash {
    pub fn new() -> Self {
        Self
    }
}

/// Sum of the character codes of `ip`.
pub fn hash_ip(ip: &str) -> usize {
    ip.encode_utf16().map(usize::from).sum()
}

/// A random dotted-quad address.
pub fn synthesize_ip() -> String {
    let mut rng = rand::thread_rng();
    format!(
        "{}.{}.{}.{}",
        rng.gen_range(0..=255u8),
        rng.gen_range(0..=255u8),
        rng.gen_range(0..=255u8),
        rng.gen_range(0..=255u8)
    )
}

impl LoadBalancer for IpHash {
    fn next_server(&self, servers: &[Server], client_ip: Option<&str>) -> Option<usize> {
        let eligible = eligible(servers);
        if eligible.is_empty() {
            return None;
        }

        let hash = match client_ip {
            Some(ip) => hash_ip(ip),
            None => {
                let ip = synthesize_ip();
                tracing::debug!(client_ip = %ip, "No client IP supplied, hashing a random address");
                hash_ip(&ip)
            }
        };
        Some(eligible[hash % eligible.len()])
    }
}
