//! Error types for dispatch and operator actions.
//!
//! Every variant here is non-fatal: the simulation logs it as a request-log
//! line and carries on. Configuration errors live in `config::loader`.

use thiserror::Error;

use crate::load_balancer::server::ServerId;

/// Why a request or an operator action could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Every server in the pool is down.
    #[error("no servers available")]
    NoEligibleServer,

    /// A manual dispatch targeted a server that is down.
    #[error("server {id} is down, request rejected")]
    InvalidManualTarget { id: ServerId },

    /// The operator addressed a pool index that does not exist.
    #[error("no server at index {index}")]
    UnknownServer { index: usize },

    /// Removing another server would leave the pool below its floor.
    #[error("pool must keep at least {floor} server(s)")]
    PoolFloor { floor: usize },
}

impl DispatchError {
    /// Short label used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            DispatchError::NoEligibleServer => "no_eligible_server",
            DispatchError::InvalidManualTarget { .. } => "target_down",
            DispatchError::UnknownServer { .. } => "unknown_server",
            DispatchError::PoolFloor { .. } => "pool_floor",
        }
    }
}
