//! Request simulation.
//!
//! # Data Flow
//! ```text
//! submit_request(client_ip)
//!     → Dispatcher picks a pool index (or none)
//!     → server.connections += 1
//!     → RoutingHistory + request log appended
//!     → Task::Complete { server_id, serial } scheduled at now + response_time_ms
//!
//! Task::Complete fires
//!     → server looked up by id (no-op if it was removed or re-added)
//!     → server.connections -= 1 (floored at 0)
//! ```

use crate::error::DispatchError;
use crate::load_balancer::ServerId;
use crate::observability::metrics;
use crate::simulation::clock::{format_clock, Task};
use crate::simulation::state::SimulationState;

impl SimulationState {
    /// Route one request with the active algorithm.
    ///
    /// On `NoEligibleServer` a log line is written and nothing else changes.
    pub fn submit_request(&mut self, client_ip: Option<&str>) -> Result<ServerId, DispatchError> {
        match self.dispatch(client_ip) {
            Some(index) => self.route_to(index),
            None => Err(self.reject(DispatchError::NoEligibleServer)),
        }
    }

    /// Route a request to a specific server, bypassing the dispatcher.
    pub fn send_to_server(&mut self, index: usize) -> Result<ServerId, DispatchError> {
        let server = self
            .pool
            .get(index)
            .ok_or(DispatchError::UnknownServer { index })?;
        if !server.is_eligible() {
            let id = server.id.clone();
            return Err(self.reject(DispatchError::InvalidManualTarget { id }));
        }
        self.route_to(index)
    }

    /// Submit `count` requests spaced `delay_ms` apart, starting now.
    pub fn submit_batch(&mut self, count: usize, delay_ms: u64) {
        self.submit_batch_from(count, delay_ms, None);
    }

    /// Like [`submit_batch`](Self::submit_batch), with every request carrying
    /// the same client IP.
    pub fn submit_batch_from(&mut self, count: usize, delay_ms: u64, client_ip: Option<&str>) {
        let now = self.now_ms();
        for i in 0..count as u64 {
            self.tasks.schedule(
                now.saturating_add(i.saturating_mul(delay_ms)),
                Task::Request {
                    client_ip: client_ip.map(str::to_string),
                },
            );
        }
        tracing::debug!(count, delay_ms, "Batch scheduled");
        // Requests due right now go out immediately
        self.advance(0);
    }

    /// Release one connection on the identified server.
    ///
    /// `serial` guards against a server removed and re-added under the same id
    /// while the request was in flight.
    pub(crate) fn complete(&mut self, server_id: &ServerId, serial: u64) {
        match self.pool.get_by_id_mut(server_id) {
            Some(server) if server.serial == serial => {
                server.dec_connections();
                tracing::trace!(server = %server_id, connections = server.connections, "Request completed");
                metrics::record_completion();
            }
            _ => {
                tracing::debug!(server = %server_id, "Completion for removed server ignored");
            }
        }
    }

    fn route_to(&mut self, index: usize) -> Result<ServerId, DispatchError> {
        let now = self.now_ms();
        let algorithm = self.algorithm;
        let server = self
            .pool
            .get_mut(index)
            .ok_or(DispatchError::UnknownServer { index })?;
        server.inc_connections(now);
        let id = server.id.clone();
        let serial = server.serial;
        let response_time_ms = server.response_time_ms;

        self.record_routed(index, id.clone());
        self.log.push(format!(
            "{} → Routed to {} ({})",
            format_clock(now),
            id,
            algorithm
        ));
        self.tasks.schedule(
            now.saturating_add(response_time_ms),
            Task::Complete {
                server_id: id.clone(),
                serial,
            },
        );

        tracing::debug!(server = %id, %algorithm, response_time_ms, "Request routed");
        metrics::record_dispatch(&id, algorithm);
        Ok(id)
    }

    /// Write a failed request or operator action to the request log.
    pub(crate) fn reject(&mut self, error: DispatchError) -> DispatchError {
        self.log
            .push(format!("{} → {}", format_clock(self.now_ms()), error));
        tracing::warn!(error = %error, "Rejected");
        metrics::record_rejected(error.reason());
        error
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SimConfig;
    use crate::error::DispatchError;
    use crate::load_balancer::{Algorithm, ServerPool};
    use crate::simulation::state::SimulationState;

    fn state(algorithm: Algorithm) -> SimulationState {
        let mut pool = ServerPool::default();
        pool.add(1, 400);
        pool.add(2, 250);
        pool.add(1, 700);
        SimulationState::with_pool(pool, algorithm, &SimConfig::default())
    }

    #[test]
    fn test_routes_and_releases() {
        let mut sim = state(Algorithm::RoundRobin);
        let id = sim.submit_request(None).unwrap();
        assert_eq!(id.as_str(), "A");
        assert_eq!(sim.pool().get(0).unwrap().connections, 1);
        assert_eq!(sim.history().len(), 1);
        assert_eq!(
            sim.log().iter().last(),
            Some("00:00:00.000 → Routed to A (round-robin)")
        );

        sim.advance(399);
        assert_eq!(sim.pool().get(0).unwrap().connections, 1);
        sim.advance(1);
        assert_eq!(sim.pool().get(0).unwrap().connections, 0);
    }

    #[test]
    fn test_manual_target_down_is_rejected() {
        let mut sim = state(Algorithm::RoundRobin);
        sim.toggle_server_up(1).unwrap();

        let err = sim.send_to_server(1).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidManualTarget { ref id } if id.as_str() == "B"));
        assert_eq!(sim.pool().get(1).unwrap().connections, 0);
        assert!(sim.history().is_empty());
        assert!(sim
            .log()
            .iter()
            .any(|l| l.ends_with("server B is down, request rejected")));

        assert_eq!(sim.send_to_server(2).unwrap().as_str(), "C");
        assert_eq!(
            sim.send_to_server(7),
            Err(DispatchError::UnknownServer { index: 7 })
        );
    }

    #[test]
    fn test_batch_spacing() {
        let mut sim = state(Algorithm::RoundRobin);
        sim.submit_batch(3, 100);
        // First request goes out immediately
        assert_eq!(sim.history().len(), 1);
        sim.advance(100);
        assert_eq!(sim.history().len(), 2);
        sim.advance(100);
        assert_eq!(sim.history().len(), 3);

        let stamps: Vec<u64> = sim.history().iter().map(|e| e.timestamp_ms).collect();
        assert_eq!(stamps, vec![0, 100, 200]);
    }

    #[test]
    fn test_completion_after_removal_is_noop() {
        let mut sim = state(Algorithm::RoundRobin);
        sim.send_to_server(2).unwrap();
        sim.remove_server().unwrap();
        // C's completion fires at 700 and must not touch anything
        sim.advance(1_000);
        assert_eq!(sim.pool().len(), 2);
        assert!(sim.pool().iter().all(|s| s.connections == 0));
    }

    #[test]
    fn test_completion_skips_re_added_id() {
        let mut sim = state(Algorithm::RoundRobin);
        // Old C finishes at 700
        sim.send_to_server(2).unwrap();
        sim.remove_server().unwrap();

        assert_eq!(sim.add_server().as_str(), "C");
        sim.set_server_response_time(2, 5_000).unwrap();
        sim.send_to_server(2).unwrap();

        sim.advance(1_000);
        assert_eq!(sim.pool().get(2).unwrap().connections, 1);
        sim.advance(4_000);
        assert_eq!(sim.pool().get(2).unwrap().connections, 0);
    }

    #[test]
    fn test_ip_hash_sticky() {
        let mut sim = state(Algorithm::IpHash);
        let first = sim.submit_request(Some("203.0.113.9")).unwrap();
        for _ in 0..5 {
            assert_eq!(sim.submit_request(Some("203.0.113.9")).unwrap(), first);
        }
    }
}
