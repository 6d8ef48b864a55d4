//! Owned simulation state and operator actions.
//!
//! # Responsibilities
//! - Own the pool, dispatcher, histories, clock and task queue
//! - Apply operator actions (add/remove, weight, latency, health, autoscale)
//! - Run deferred tasks as the logical clock advances
//! - Keep cursors and history consistent after every pool change

use crate::autoscale::{AutoscalePolicy, ScaleDecision};
use crate::config::SimConfig;
use crate::error::DispatchError;
use crate::load_balancer::server::random_response_time;
use crate::load_balancer::{Algorithm, Dispatcher, ServerId, ServerPool};
use crate::observability::metrics;
use crate::simulation::clock::{format_clock, SimClock, Task, TaskQueue};
use crate::simulation::history::{RequestLog, RoutingHistory, RoutingHistoryEntry};
use crate::simulation::snapshot::{ServerSnapshot, SimulationSnapshot};

/// Everything the simulator mutates, owned in one place.
#[derive(Debug)]
pub struct SimulationState {
    pub(crate) pool: ServerPool,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) algorithm: Algorithm,
    pub(crate) history: RoutingHistory,
    pub(crate) log: RequestLog,
    pub(crate) clock: SimClock,
    pub(crate) tasks: TaskQueue,
    autoscale: AutoscalePolicy,
    autoscale_enabled: bool,
    /// Bumped on every disable so ticks from an earlier enable are dropped.
    autoscale_generation: u64,
}

impl SimulationState {
    /// Build the initial state from configuration.
    pub fn new(config: &SimConfig) -> Self {
        let mut state = Self::with_pool(
            ServerPool::from_config(&config.servers),
            config.simulation.algorithm,
            config,
        );
        if config.autoscale.enabled {
            state.set_autoscale_enabled(true);
        }
        state
    }

    /// Build a state around an explicit pool, taking the rest from `config`.
    pub fn with_pool(pool: ServerPool, algorithm: Algorithm, config: &SimConfig) -> Self {
        metrics::record_pool_size(pool.len());
        Self {
            pool,
            dispatcher: Dispatcher::new(),
            algorithm,
            history: RoutingHistory::new(config.history.routing_capacity),
            log: RequestLog::new(config.history.log_capacity),
            clock: SimClock::new(),
            tasks: TaskQueue::new(),
            autoscale: AutoscalePolicy::new(config.autoscale.clone()),
            autoscale_enabled: false,
            autoscale_generation: 0,
        }
    }

    // --- Read-only projections ---

    pub fn pool(&self) -> &ServerPool {
        &self.pool
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn history(&self) -> &RoutingHistory {
        &self.history
    }

    pub fn log(&self) -> &RequestLog {
        &self.log
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn autoscale_enabled(&self) -> bool {
        self.autoscale_enabled
    }

    /// Number of deferred tasks still waiting to run.
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Serializable view of the whole simulation.
    pub fn snapshot(&self) -> SimulationSnapshot {
        let now = self.now_ms();
        SimulationSnapshot {
            now_ms: now,
            algorithm: self.algorithm,
            autoscale_enabled: self.autoscale_enabled,
            average_connections: self.pool.average_connections(),
            servers: self
                .pool
                .iter()
                .enumerate()
                .map(|(index, s)| ServerSnapshot {
                    index,
                    id: s.id.clone(),
                    weight: s.weight,
                    connections: s.connections,
                    response_time_ms: s.response_time_ms,
                    up: s.up,
                    total_requests: s.total_requests,
                    hit: s.is_hit(now),
                })
                .collect(),
            history: self.history.iter().cloned().collect(),
            log: self.log.iter().map(str::to_string).collect(),
        }
    }

    // --- Dispatch ---

    /// Ask the dispatcher which server would take the next request under the
    /// active algorithm. Advances rotating cursors but mutates no server.
    pub fn dispatch(&self, client_ip: Option<&str>) -> Option<usize> {
        self.dispatcher.dispatch(self.algorithm, &self.pool, client_ip)
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        if self.algorithm != algorithm {
            tracing::info!(from = %self.algorithm, to = %algorithm, "Algorithm changed");
            self.algorithm = algorithm;
        }
    }

    // --- Pool management ---

    /// Append a fresh server and return its id.
    pub fn add_server(&mut self) -> ServerId {
        let rt = random_response_time(self.autoscale.response_time_range());
        let id = self.pool.add(1, rt);
        tracing::info!(server = %id, response_time_ms = rt, pool_size = self.pool.len(), "Server added");
        self.pool_changed();
        id
    }

    /// Remove the last server, keeping at least one.
    ///
    /// A removal blocked by the floor is written to the request log.
    pub fn remove_server(&mut self) -> Result<ServerId, DispatchError> {
        let server = match self.pool.remove_last() {
            Ok(server) => server,
            Err(e) => return Err(self.reject(e)),
        };
        tracing::info!(
            server = %server.id,
            in_flight = server.connections,
            pool_size = self.pool.len(),
            "Server removed"
        );
        self.pool_changed();
        Ok(server.id)
    }

    pub fn set_server_weight(&mut self, index: usize, weight: u32) -> Result<(), DispatchError> {
        let server = self
            .pool
            .get_mut(index)
            .ok_or(DispatchError::UnknownServer { index })?;
        server.weight = weight.max(1);
        tracing::debug!(server = %server.id, weight = server.weight, "Weight changed");
        self.pool_changed();
        Ok(())
    }

    pub fn set_server_response_time(&mut self, index: usize, ms: u64) -> Result<(), DispatchError> {
        let server = self
            .pool
            .get_mut(index)
            .ok_or(DispatchError::UnknownServer { index })?;
        server.response_time_ms = ms.max(1);
        tracing::debug!(server = %server.id, response_time_ms = server.response_time_ms, "Response time changed");
        Ok(())
    }

    /// Flip a server between up and down.
    pub fn toggle_server_up(&mut self, index: usize) -> Result<(), DispatchError> {
        let server = self
            .pool
            .get_mut(index)
            .ok_or(DispatchError::UnknownServer { index })?;
        server.up = !server.up;
        tracing::info!(server = %server.id, up = server.up, "Server health toggled");
        self.pool_changed();
        Ok(())
    }

    /// Keep cursors and history consistent with the pool's current shape.
    fn pool_changed(&mut self) {
        self.dispatcher.on_pool_changed(&self.pool);
        self.history.prune(self.pool.len());
        metrics::record_pool_size(self.pool.len());
    }

    // --- Autoscaling ---

    pub fn set_autoscale_enabled(&mut self, enabled: bool) {
        if enabled == self.autoscale_enabled {
            return;
        }
        self.autoscale_enabled = enabled;
        if enabled {
            let due = self.now_ms() + self.autoscale.interval_ms();
            self.tasks.schedule(
                due,
                Task::AutoscaleTick {
                    generation: self.autoscale_generation,
                },
            );
        } else {
            self.autoscale_generation += 1;
        }
        tracing::info!(enabled, "Autoscaling toggled");
    }

    /// Run one evaluation of the autoscale policy and apply its decision.
    ///
    /// Works whether or not periodic autoscaling is enabled.
    pub fn autoscale_tick(&mut self) -> ScaleDecision {
        let decision = self.autoscale.evaluate(&self.pool);
        match decision {
            ScaleDecision::ScaleUp => {
                let id = self.add_server();
                self.log.push(format!(
                    "{} → Autoscale: added {}",
                    format_clock(self.now_ms()),
                    id
                ));
            }
            ScaleDecision::ScaleDown => match self.remove_server() {
                Ok(id) => {
                    self.log.push(format!(
                        "{} → Autoscale: removed {}",
                        format_clock(self.now_ms()),
                        id
                    ));
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Autoscale scale-down skipped");
                    return ScaleDecision::NoChange;
                }
            },
            ScaleDecision::NoChange => return decision,
        }
        metrics::record_autoscale(decision.as_str());
        decision
    }

    // --- Clock ---

    /// Advance the logical clock by `ms`, running every task that falls due.
    pub fn advance(&mut self, ms: u64) {
        let until = self.now_ms().saturating_add(ms);
        while let Some(scheduled) = self.tasks.pop_due(until) {
            self.clock.advance_to(scheduled.due_ms);
            self.run_task(scheduled.task);
        }
        self.clock.advance_to(until);
    }

    /// Advance until no tasks remain, or `limit_ms` of simulated time passes.
    pub fn run_until_idle(&mut self, limit_ms: u64) {
        let deadline = self.now_ms().saturating_add(limit_ms);
        while let Some(due) = self.tasks.next_due() {
            if due > deadline {
                break;
            }
            self.advance(due - self.now_ms());
        }
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::Request { client_ip } => {
                // Failures are already logged by the request simulator
                let _ = self.submit_request(client_ip.as_deref());
            }
            Task::Complete { server_id, serial } => self.complete(&server_id, serial),
            Task::AutoscaleTick { generation } => {
                if !self.autoscale_enabled || generation != self.autoscale_generation {
                    return;
                }
                self.autoscale_tick();
                let due = self.now_ms() + self.autoscale.interval_ms();
                self.tasks.schedule(due, Task::AutoscaleTick { generation });
            }
        }
    }

    pub(crate) fn record_routed(&mut self, index: usize, id: ServerId) {
        self.history.push(RoutingHistoryEntry {
            timestamp_ms: self.now_ms(),
            server_id: id,
            server_index: index,
        });
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(&SimConfig::default())
    }
}
