//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build SimulationState → Spawn simulator actor
//!
//! Shutdown (shutdown.rs):
//!     Ctrl-C or run duration elapsed → broadcast → actor returns final state
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
