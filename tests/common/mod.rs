//! Shared helpers for integration tests.

use dispatch_sim::config::SimConfig;
use dispatch_sim::load_balancer::{Algorithm, ServerPool};
use dispatch_sim::SimulationState;

/// Pool built from `(weight, response_time_ms)` pairs, labelled A, B, C, ...
pub fn pool(specs: &[(u32, u64)]) -> ServerPool {
    let mut pool = ServerPool::default();
    for &(weight, rt) in specs {
        pool.add(weight, rt);
    }
    pool
}

/// The reference pool: A(w1, 400ms), B(w2, 250ms), C(w1, 700ms).
#[allow(dead_code)]
pub fn reference_pool() -> ServerPool {
    pool(&[(1, 400), (2, 250), (1, 700)])
}

/// Simulation over `pool` with default capacities and autoscale settings.
#[allow(dead_code)]
pub fn state_with(pool: ServerPool, algorithm: Algorithm) -> SimulationState {
    SimulationState::with_pool(pool, algorithm, &SimConfig::default())
}

/// Ids of the servers in pool order.
#[allow(dead_code)]
pub fn ids(state: &SimulationState) -> Vec<String> {
    state
        .pool()
        .iter()
        .map(|s| s.id.as_str().to_string())
        .collect()
}
