//! Simulator actor.
//!
//! # Responsibilities
//! - Own the `SimulationState` on a single tokio task
//! - Apply operator commands in arrival order
//! - Advance the logical clock from real time at a fixed resolution
//! - Publish a fresh snapshot after every change
//!
//! # Design Decisions
//! - All pool mutation is serialized through one command channel
//! - Readers never block the actor; they load the latest published snapshot
//! - The actor hands its final state back when it stops

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::SimConfig;
use crate::load_balancer::Algorithm;
use crate::simulation::{SimulationSnapshot, SimulationState};

/// An operator action sent to the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SubmitRequest {
        client_ip: Option<String>,
    },
    SubmitBatch {
        count: usize,
        delay_ms: u64,
        client_ip: Option<String>,
    },
    SendToServer {
        index: usize,
    },
    AddServer,
    RemoveServer,
    SetWeight {
        index: usize,
        weight: u32,
    },
    SetResponseTime {
        index: usize,
        ms: u64,
    },
    ToggleUp {
        index: usize,
    },
    SetAutoscale(bool),
    SetAlgorithm(Algorithm),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulatorError {
    #[error("simulator has stopped")]
    Closed,
}

/// Cloneable front door to a running simulator.
#[derive(Debug, Clone)]
pub struct SimulatorHandle {
    tx: mpsc::UnboundedSender<Command>,
    snapshot: Arc<ArcSwap<SimulationSnapshot>>,
}

impl SimulatorHandle {
    pub fn send(&self, command: Command) -> Result<(), SimulatorError> {
        self.tx.send(command).map_err(|_| SimulatorError::Closed)
    }

    pub fn submit_request(&self, client_ip: Option<String>) -> Result<(), SimulatorError> {
        self.send(Command::SubmitRequest { client_ip })
    }

    pub fn submit_batch(&self, count: usize, delay_ms: u64) -> Result<(), SimulatorError> {
        self.send(Command::SubmitBatch {
            count,
            delay_ms,
            client_ip: None,
        })
    }

    pub fn send_to_server(&self, index: usize) -> Result<(), SimulatorError> {
        self.send(Command::SendToServer { index })
    }

    pub fn add_server(&self) -> Result<(), SimulatorError> {
        self.send(Command::AddServer)
    }

    pub fn remove_server(&self) -> Result<(), SimulatorError> {
        self.send(Command::RemoveServer)
    }

    pub fn set_server_weight(&self, index: usize, weight: u32) -> Result<(), SimulatorError> {
        self.send(Command::SetWeight { index, weight })
    }

    pub fn set_server_response_time(&self, index: usize, ms: u64) -> Result<(), SimulatorError> {
        self.send(Command::SetResponseTime { index, ms })
    }

    pub fn toggle_server_up(&self, index: usize) -> Result<(), SimulatorError> {
        self.send(Command::ToggleUp { index })
    }

    pub fn set_autoscale_enabled(&self, enabled: bool) -> Result<(), SimulatorError> {
        self.send(Command::SetAutoscale(enabled))
    }

    pub fn set_algorithm(&self, algorithm: Algorithm) -> Result<(), SimulatorError> {
        self.send(Command::SetAlgorithm(algorithm))
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<SimulationSnapshot> {
        self.snapshot.load_full()
    }
}

/// Runs a `SimulationState` against the tokio clock.
#[derive(Debug)]
pub struct Simulator {
    state: SimulationState,
    resolution: Duration,
}

impl Simulator {
    pub fn new(state: SimulationState, resolution: Duration) -> Self {
        Self {
            state,
            resolution: resolution.max(Duration::from_millis(1)),
        }
    }

    /// Build state and resolution from configuration.
    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(
            SimulationState::new(config),
            Duration::from_millis(config.simulation.resolution_ms),
        )
    }

    /// Start the actor. The join handle yields the final state on shutdown.
    pub fn spawn(
        self,
        shutdown: broadcast::Receiver<()>,
    ) -> (SimulatorHandle, JoinHandle<SimulationState>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let snapshot = Arc::new(ArcSwap::from_pointee(self.state.snapshot()));
        let handle = SimulatorHandle {
            tx,
            snapshot: snapshot.clone(),
        };
        let task = tokio::spawn(self.run(rx, snapshot, shutdown));
        (handle, task)
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        snapshot: Arc<ArcSwap<SimulationSnapshot>>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> SimulationState {
        tracing::info!(
            resolution_ms = self.resolution.as_millis() as u64,
            pool_size = self.state.pool().len(),
            algorithm = %self.state.algorithm(),
            "Simulator starting"
        );

        let mut ticker = time::interval(self.resolution);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = Instant::now();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.catch_up(&mut last);
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        tracing::info!("All simulator handles dropped, exiting loop");
                        break;
                    };
                    self.catch_up(&mut last);
                    self.apply(command);
                }
                _ = shutdown.recv() => {
                    tracing::info!("Simulator received shutdown signal, exiting loop");
                    break;
                }
            }
            snapshot.store(Arc::new(self.state.snapshot()));
        }

        self.state
    }

    /// Advance the logical clock by the whole milliseconds elapsed since `last`.
    fn catch_up(&mut self, last: &mut Instant) {
        let elapsed_ms = last.elapsed().as_millis() as u64;
        if elapsed_ms > 0 {
            *last += Duration::from_millis(elapsed_ms);
            self.state.advance(elapsed_ms);
        }
    }

    fn apply(&mut self, command: Command) {
        tracing::trace!(?command, "Applying command");
        let state = &mut self.state;
        let result = match command {
            Command::SubmitRequest { client_ip } => {
                state.submit_request(client_ip.as_deref()).map(drop)
            }
            Command::SubmitBatch {
                count,
                delay_ms,
                client_ip,
            } => {
                state.submit_batch_from(count, delay_ms, client_ip.as_deref());
                Ok(())
            }
            Command::SendToServer { index } => state.send_to_server(index).map(drop),
            Command::AddServer => {
                state.add_server();
                Ok(())
            }
            Command::RemoveServer => state.remove_server().map(drop),
            Command::SetWeight { index, weight } => state.set_server_weight(index, weight),
            Command::SetResponseTime { index, ms } => state.set_server_response_time(index, ms),
            Command::ToggleUp { index } => state.toggle_server_up(index),
            Command::SetAutoscale(enabled) => {
                state.set_autoscale_enabled(enabled);
                Ok(())
            }
            Command::SetAlgorithm(algorithm) => {
                state.set_algorithm(algorithm);
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::debug!(error = %e, "Command not applied");
        }
    }
}
