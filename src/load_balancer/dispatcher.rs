//! Algorithm dispatch.
//!
//! # Responsibilities
//! - Hold one instance of every strategy so cursors survive policy switches
//! - Route a selection request to the strategy for the given algorithm
//! - Re-clamp rotating cursors whenever the pool changes shape

use crate::load_balancer::{
    ip_hash::IpHash, least_conn::LeastConnections, least_response::LeastResponseTime,
    pool::ServerPool, random::RandomSelect, round_robin::RoundRobin,
    weighted::WeightedRoundRobin, Algorithm, LoadBalancer,
};

/// Selects servers for incoming requests.
#[derive(Debug, Default)]
pub struct Dispatcher {
    round_robin: RoundRobin,
    weighted: WeightedRoundRobin,
    least_conn: LeastConnections,
    ip_hash: IpHash,
    least_response: LeastResponseTime,
    random: RandomSelect,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn strategy(&self, algorithm: Algorithm) -> &dyn LoadBalancer {
        match algorithm {
            Algorithm::RoundRobin => &self.round_robin,
            Algorithm::WeightedRoundRobin => &self.weighted,
            Algorithm::LeastConnections => &self.least_conn,
            Algorithm::IpHash => &self.ip_hash,
            Algorithm::LeastResponseTime => &self.least_response,
            Algorithm::Random => &self.random,
        }
    }

    /// Pick the pool index that should receive the next request.
    ///
    /// Returns `None` when no server is up; this is an ordinary outcome,
    /// not a failure of the dispatcher.
    pub fn dispatch(
        &self,
        algorithm: Algorithm,
        pool: &ServerPool,
        client_ip: Option<&str>,
    ) -> Option<usize> {
        let picked = self.strategy(algorithm).next_server(pool.servers(), client_ip);
        match picked {
            Some(index) => {
                tracing::trace!(%algorithm, index, "Server selected");
            }
            None => {
                tracing::debug!(%algorithm, pool_size = pool.len(), "No eligible servers in pool");
            }
        }
        picked
    }

    /// Bring every rotating cursor back in range for the current pool.
    pub fn on_pool_changed(&self, pool: &ServerPool) {
        for algorithm in Algorithm::ALL {
            self.strategy(algorithm).clamp_cursor(pool.servers());
        }
    }
}
