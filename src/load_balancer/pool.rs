//! Server pool management.
//!
//! # Responsibilities
//! - Own the ordered set of simulated servers
//! - Resolve servers by stable id as well as by pool position
//! - Enforce the one-server floor on removal

use std::collections::HashMap;

use crate::config::ServerConfig;
use crate::error::DispatchError;
use crate::load_balancer::server::{Server, ServerId};

/// The pool can never shrink below this many servers.
pub const MIN_POOL_SIZE: usize = 1;

/// Ordered collection of simulated servers.
///
/// Pool order drives round-robin and tie-breaking. Servers are only ever
/// appended or popped from the end, so the id index stays dense.
#[derive(Debug, Clone, Default)]
pub struct ServerPool {
    servers: Vec<Server>,
    /// Map of server id -> position in `servers`.
    index: HashMap<ServerId, usize>,
    /// Serial handed to the next inserted server.
    next_serial: u64,
}

impl ServerPool {
    /// Build the initial pool from configuration.
    pub fn from_config(configs: &[ServerConfig]) -> Self {
        let mut pool = Self::default();
        for config in configs {
            let id = match &config.id {
                Some(label) => ServerId::new(label.clone()),
                None => pool.next_id(),
            };
            let mut server = Server::new(id, config.weight, config.response_time_ms);
            server.up = config.up;
            pool.push(server);
        }
        pool
    }

    fn push(&mut self, mut server: Server) -> bool {
        if self.index.contains_key(&server.id) {
            tracing::warn!(server = %server.id, "Duplicate server id, skipping");
            return false;
        }
        server.serial = self.next_serial;
        self.next_serial += 1;
        self.index.insert(server.id.clone(), self.servers.len());
        self.servers.push(server);
        true
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// All servers in pool order.
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn iter(&self) -> impl Iterator<Item = &Server> {
        self.servers.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Server> {
        self.servers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Server> {
        self.servers.get_mut(index)
    }

    /// Current position of a server, if it still exists.
    pub fn position(&self, id: &ServerId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn get_by_id(&self, id: &ServerId) -> Option<&Server> {
        self.position(id).and_then(|i| self.servers.get(i))
    }

    pub fn get_by_id_mut(&mut self, id: &ServerId) -> Option<&mut Server> {
        let i = self.position(id)?;
        self.servers.get_mut(i)
    }

    /// First label in the A, B, ... sequence not used by any current server.
    pub fn next_id(&self) -> ServerId {
        (0..)
            .map(ServerId::from_ordinal)
            .find(|id| !self.index.contains_key(id))
            .unwrap_or_else(|| ServerId::from_ordinal(self.servers.len()))
    }

    /// Append a fresh healthy server and return its id.
    pub fn add(&mut self, weight: u32, response_time_ms: u64) -> ServerId {
        let id = self.next_id();
        self.push(Server::new(id.clone(), weight, response_time_ms));
        id
    }

    /// Remove the last server, refusing to go below [`MIN_POOL_SIZE`].
    pub fn remove_last(&mut self) -> Result<Server, DispatchError> {
        if self.servers.len() <= MIN_POOL_SIZE {
            return Err(DispatchError::PoolFloor {
                floor: MIN_POOL_SIZE,
            });
        }
        let server = self
            .servers
            .pop()
            .ok_or(DispatchError::PoolFloor {
                floor: MIN_POOL_SIZE,
            })?;
        self.index.remove(&server.id);
        Ok(server)
    }

    /// Pool indices of servers that are up, in pool order.
    pub fn eligible_indices(&self) -> Vec<usize> {
        super::eligible(&self.servers)
    }

    pub fn total_connections(&self) -> u64 {
        self.servers.iter().map(|s| u64::from(s.connections)).sum()
    }

    /// Mean in-flight connections per server (0 for an empty pool).
    pub fn average_connections(&self) -> f64 {
        if self.servers.is_empty() {
            return 0.0;
        }
        self.total_connections() as f64 / self.servers.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> ServerPool {
        let mut pool = ServerPool::default();
        pool.add(1, 400);
        pool.add(2, 250);
        pool.add(1, 700);
        pool
    }

    #[test]
    fn test_sequential_ids() {
        let pool = abc();
        let ids: Vec<&str> = pool.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(pool.next_id().as_str(), "D");
    }

    #[test]
    fn test_next_id_reuses_freed_label() {
        let mut pool = abc();
        pool.remove_last().unwrap();
        assert_eq!(pool.next_id().as_str(), "C");
        assert!(pool.get_by_id(&ServerId::new("C")).is_none());
    }

    #[test]
    fn test_floor_of_one() {
        let mut pool = abc();
        pool.remove_last().unwrap();
        pool.remove_last().unwrap();
        assert_eq!(
            pool.remove_last(),
            Err(DispatchError::PoolFloor { floor: 1 })
        );
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_duplicate_config_ids_skipped() {
        let configs = vec![
            ServerConfig {
                id: Some("A".into()),
                ..ServerConfig::default()
            },
            ServerConfig {
                id: Some("A".into()),
                ..ServerConfig::default()
            },
            ServerConfig::default(),
        ];
        let pool = ServerPool::from_config(&configs);
        let ids: Vec<&str> = pool.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_average_connections() {
        let mut pool = abc();
        pool.get_mut(0).unwrap().inc_connections(0);
        pool.get_mut(0).unwrap().inc_connections(0);
        pool.get_mut(2).unwrap().inc_connections(0);
        assert_eq!(pool.total_connections(), 3);
        assert!((pool.average_connections() - 1.0).abs() < f64::EPSILON);
    }
}
