//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SimConfig (validated, immutable)
//!     → used once to build the SimulationState
//! ```
//!
//! # Design Decisions
//! - Config only seeds the simulation; runtime changes go through operator actions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::AutoscaleConfig;
pub use schema::HistoryConfig;
pub use schema::ObservabilityConfig;
pub use schema::ServerConfig;
pub use schema::SimConfig;
pub use schema::SimulationConfig;
