//! Simulator actor driven on a paused tokio clock.

mod common;

use std::time::Duration;

use dispatch_sim::runtime::SimulatorError;
use dispatch_sim::{Algorithm, Shutdown, Simulator};

fn simulator(algorithm: Algorithm) -> Simulator {
    Simulator::new(
        common::state_with(common::reference_pool(), algorithm),
        Duration::from_millis(50),
    )
}

#[tokio::test(start_paused = true)]
async fn test_request_routes_then_completes() {
    let shutdown = Shutdown::new();
    let (handle, task) = simulator(Algorithm::RoundRobin).spawn(shutdown.subscribe());

    handle.submit_request(None).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.servers[0].connections, 1);
    assert_eq!(snapshot.servers[0].total_requests, 1);
    assert_eq!(snapshot.history.len(), 1);

    // A answers after 400ms of logical time
    tokio::time::sleep(Duration::from_millis(500)).await;
    let snapshot = handle.snapshot();
    assert!(snapshot.now_ms >= 400);
    assert_eq!(snapshot.servers[0].connections, 0);

    shutdown.trigger();
    let state = task.await.unwrap();
    assert_eq!(state.pool().total_connections(), 0);
    assert_eq!(state.history().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_commands_apply_in_order() {
    let shutdown = Shutdown::new();
    let (handle, task) = simulator(Algorithm::RoundRobin).spawn(shutdown.subscribe());

    handle.set_algorithm(Algorithm::WeightedRoundRobin).unwrap();
    handle.add_server().unwrap();
    handle.toggle_server_up(0).unwrap();
    handle.submit_batch(3, 0).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.algorithm, Algorithm::WeightedRoundRobin);
    assert_eq!(snapshot.servers.len(), 4);
    assert!(!snapshot.servers[0].up);
    let routed: Vec<&str> = snapshot.history.iter().map(|e| e.server_id.as_str()).collect();
    assert_eq!(routed, vec!["B", "B", "C"]);

    shutdown.trigger();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_batch_spreads_over_real_time() {
    let shutdown = Shutdown::new();
    let (handle, task) = simulator(Algorithm::RoundRobin).spawn(shutdown.subscribe());

    handle.submit_batch(5, 100).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(handle.snapshot().history.len(), 1);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(handle.snapshot().history.len(), 5);

    shutdown.trigger();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_autoscale_runs_on_actor_clock() {
    let shutdown = Shutdown::new();
    let (handle, task) = simulator(Algorithm::RoundRobin).spawn(shutdown.subscribe());

    handle.set_autoscale_enabled(true).unwrap();
    tokio::time::sleep(Duration::from_millis(2_100)).await;

    // Idle pool loses one server per second until the floor
    let snapshot = handle.snapshot();
    assert!(snapshot.autoscale_enabled);
    assert_eq!(snapshot.servers.len(), 1);

    shutdown.trigger();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_handle_errors_after_shutdown() {
    let shutdown = Shutdown::new();
    let (handle, task) = simulator(Algorithm::RoundRobin).spawn(shutdown.subscribe());

    shutdown.trigger();
    task.await.unwrap();

    assert_eq!(handle.submit_request(None), Err(SimulatorError::Closed));
    assert_eq!(handle.remove_server(), Err(SimulatorError::Closed));
}

#[tokio::test(start_paused = true)]
async fn test_exits_when_handles_dropped() {
    let shutdown = Shutdown::new();
    let (handle, task) = simulator(Algorithm::RoundRobin).spawn(shutdown.subscribe());

    handle.submit_request(None).unwrap();
    drop(handle);

    let state = task.await.unwrap();
    assert_eq!(state.history().len(), 1);
}
