//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Request submitted with the active Algorithm
//!     → dispatcher.rs (pick the strategy for the algorithm)
//!     → pool.rs (servers in pool order; down servers filtered out)
//!     → Apply load balancing strategy:
//!         - round_robin.rs (rotate through eligible servers)
//!         - weighted.rs (rotate through the weight-expanded sequence)
//!         - least_conn.rs (fewest in-flight connections)
//!         - ip_hash.rs (client IP character-code sum)
//!         - least_response.rs (lowest simulated latency)
//!         - random.rs (uniform pick)
//!     → Return pool index, or None when nothing is up
//! ```
//!
//! # Design Decisions
//! - Strategies never mutate servers; the caller accounts connections
//! - Rotating cursors live inside their strategy and are clamped on pool change
//! - Down servers are excluded from every strategy

pub mod algorithm;
pub mod dispatcher;
pub mod ip_hash;
pub mod least_conn;
pub mod least_response;
pub mod pool;
pub mod random;
pub mod round_robin;
pub mod server;
pub mod weighted;

pub use algorithm::Algorithm;
pub use dispatcher::Dispatcher;
pub use pool::ServerPool;
pub use server::{Server, ServerId};

/// A server selection strategy.
pub trait LoadBalancer: Send + Sync + std::fmt::Debug {
    /// Pick the pool index of the next server, or `None` if no server is up.
    fn next_server(&self, servers: &[Server], client_ip: Option<&str>) -> Option<usize>;

    /// Bring any internal cursor back in range after the pool changed.
    fn clamp_cursor(&self, _servers: &[Server]) {}
}

/// Pool indices of servers that are up, in pool order.
pub fn eligible(servers: &[Server]) -> Vec<usize> {
    servers
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_eligible())
        .map(|(i, _)| i)
        .collect()
}
