//! Load-balancer dispatch simulator library.

pub mod autoscale;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;
pub mod runtime;
pub mod simulation;

pub use config::SimConfig;
pub use error::DispatchError;
pub use lifecycle::Shutdown;
pub use load_balancer::{Algorithm, Dispatcher, ServerId, ServerPool};
pub use runtime::{Simulator, SimulatorHandle};
pub use simulation::SimulationState;
