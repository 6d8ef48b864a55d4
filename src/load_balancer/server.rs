//! Simulated server abstraction.
//!
//! # Responsibilities
//! - Represent a single simulated backend server
//! - Track in-flight connections (for Least Connections LB)
//! - Track the operator-controlled health flag (Up/Down)

use std::fmt;
use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// How long a server shows as "hit" after receiving a request.
pub const HIT_PULSE_MS: u64 = 400;

/// Stable server label: A, B, ..., Z, AA, AB, ...
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(String);

impl ServerId {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Label of the n-th server in creation order (0 → A, 25 → Z, 26 → AA).
    pub fn from_ordinal(mut n: usize) -> Self {
        let mut label = String::new();
        loop {
            label.insert(0, char::from(b'A' + (n % 26) as u8));
            if n < 26 {
                break;
            }
            n = n / 26 - 1;
        }
        Self(label)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single simulated server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Server {
    /// Stable identifier, never reused while the server exists.
    pub id: ServerId,
    /// Unique per pool insertion; tells a re-added id apart from its predecessor.
    pub serial: u64,
    /// Relative share of traffic under weighted policies.
    pub weight: u32,
    /// Number of in-flight simulated requests.
    pub connections: u32,
    /// Simulated service latency.
    pub response_time_ms: u64,
    /// Health flag; down servers are skipped by every policy.
    pub up: bool,
    /// Requests ever routed to this server.
    pub total_requests: u64,
    /// Simulated time of the most recent dispatch.
    pub last_hit_ms: Option<u64>,
}

impl Server {
    /// Create a healthy server with no load.
    pub fn new(id: ServerId, weight: u32, response_time_ms: u64) -> Self {
        Self {
            id,
            serial: 0,
            weight: weight.max(1),
            connections: 0,
            response_time_ms: response_time_ms.max(1),
            up: true,
            total_requests: 0,
            last_hit_ms: None,
        }
    }

    pub fn is_eligible(&self) -> bool {
        self.up
    }

    /// Weight as seen by weighted round-robin (never zero).
    pub fn effective_weight(&self) -> u32 {
        self.weight.max(1)
    }

    /// Account for a newly routed request.
    pub fn inc_connections(&mut self, now_ms: u64) {
        self.connections = self.connections.saturating_add(1);
        self.total_requests += 1;
        self.last_hit_ms = Some(now_ms);
    }

    /// Release one connection, floored at zero.
    pub fn dec_connections(&mut self) {
        self.connections = self.connections.saturating_sub(1);
    }

    /// Whether the cosmetic hit pulse is still showing at `now_ms`.
    pub fn is_hit(&self, now_ms: u64) -> bool {
        self.last_hit_ms
            .is_some_and(|hit| now_ms.saturating_sub(hit) < HIT_PULSE_MS)
    }
}

/// Draw a response time for a freshly added server.
pub fn random_response_time(range: Range<u64>) -> u64 {
    if range.is_empty() {
        return range.start.max(1);
    }
    rand::thread_rng().gen_range(range)
}
