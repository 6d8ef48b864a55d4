//! Threaded host for the simulation.
//!
//! # Data Flow
//! ```text
//! SimulatorHandle (any task)
//!     → Command over mpsc
//!     → simulator.rs actor applies it to SimulationState
//!     → snapshot published via ArcSwap
//!
//! tokio interval (resolution_ms)
//!     → actor advances the logical clock by real elapsed time
//!     → completions and autoscale ticks fire
//! ```

pub mod simulator;

pub use simulator::{Command, Simulator, SimulatorError, SimulatorHandle};
