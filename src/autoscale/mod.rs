//! Autoscaling subsystem.
//!
//! # Scaling Algorithm
//!
//! ```text
//! avg = sum(connections) / pool_size
//!
//! if avg > scale_up_threshold (0.9):
//!     add one server (next unused id, weight 1, random latency in [300, 1000))
//! else if avg < scale_down_threshold (0.25) and pool_size > 1:
//!     remove the last server
//! ```
//!
//! Each tick reacts to a single sample. There is no cooldown window, so a
//! bursty load makes the pool oscillate; that is expected.

pub mod policy;

pub use policy::{AutoscalePolicy, ScaleDecision};
