//! Simulation subsystem.
//!
//! # Data Flow
//! ```text
//! Operator action / batch task
//!     → request.rs (dispatch, account connection, record history)
//!     → clock.rs (completion scheduled on the task queue)
//!
//! advance(ms)
//!     → clock.rs (pop due tasks in (due, sequence) order)
//!     → request.rs (complete) / state.rs (autoscale tick)
//!
//! Readers
//!     → snapshot.rs (serializable projection)
//! ```
//!
//! # Design Decisions
//! - One owned state struct, no globals
//! - Time is logical; nothing here sleeps or blocks
//! - Completions are keyed by server id, never by position

pub mod clock;
pub mod history;
pub mod request;
pub mod snapshot;
pub mod state;

pub use clock::{SimClock, Task, TaskQueue};
pub use history::{RequestLog, RoutingHistory, RoutingHistoryEntry};
pub use snapshot::{ServerSnapshot, SimulationSnapshot};
pub use state::SimulationState;
