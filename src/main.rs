//! Load-balancer dispatch simulator.
//!
//! # Architecture Overview
//!
//! ```text
//!    ┌──────────────────────────────────────────────────────────────┐
//!    │                     DISPATCH SIMULATOR                        │
//!    │                                                               │
//!    │  SimulatorHandle ──Command──▶ Simulator actor (runtime)       │
//!    │                                   │                           │
//!    │                                   ▼                           │
//!    │                            SimulationState                    │
//!    │            ┌──────────────┬───────┴───────┬──────────────┐    │
//!    │            ▼              ▼               ▼              ▼    │
//!    │     request.rs      load_balancer    history.rs     autoscale │
//!    │   (connections)    (Dispatcher +    (routing +     (threshold │
//!    │                     strategies)      request log)    policy)  │
//!    │            │                                                  │
//!    │            ▼                                                  │
//!    │   clock.rs task queue ──(completion / tick)──▶ state          │
//!    │                                                               │
//!    │  Cross-cutting: config (TOML), observability (tracing,        │
//!    │  metrics), lifecycle (shutdown)                               │
//!    └──────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use dispatch_sim::config::{load_config, SimConfig};
use dispatch_sim::load_balancer::Algorithm;
use dispatch_sim::observability::logging::init_logging;
use dispatch_sim::runtime::{Command, Simulator};
use dispatch_sim::Shutdown;

#[derive(Parser)]
#[command(name = "dispatch-sim")]
#[command(about = "Simulate load-balancer dispatch over an in-memory server pool", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Selection policy (round-robin, weighted-rr, least-connections, ip-hash,
    /// least-response-time, random)
    #[arg(short, long)]
    algorithm: Option<Algorithm>,

    /// Number of requests to submit
    #[arg(short = 'n', long, default_value_t = 20)]
    requests: usize,

    /// Spacing between requests in milliseconds
    #[arg(short, long, default_value_t = 100)]
    delay_ms: u64,

    /// Client IP attached to every request (used by ip-hash)
    #[arg(long)]
    client_ip: Option<String>,

    /// Enable autoscaling
    #[arg(long)]
    autoscale: bool,

    /// How long to run before printing the final state
    #[arg(long, default_value_t = 5)]
    duration_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SimConfig::default(),
    };
    if let Some(algorithm) = cli.algorithm {
        config.simulation.algorithm = algorithm;
    }
    if cli.autoscale {
        config.autoscale.enabled = true;
    }

    init_logging(&config.observability)?;

    tracing::info!(
        algorithm = %config.simulation.algorithm,
        servers = config.servers.len(),
        autoscale = config.autoscale.enabled,
        requests = cli.requests,
        delay_ms = cli.delay_ms,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let (handle, task) = Simulator::from_config(&config).spawn(shutdown.subscribe());

    handle.send(Command::SubmitBatch {
        count: cli.requests,
        delay_ms: cli.delay_ms,
        client_ip: cli.client_ip.clone(),
    })?;

    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(cli.duration_secs)) => {
            shutdown.trigger();
        }
        _ = shutdown.trigger_on_ctrl_c() => {}
    }

    let state = task.await?;
    println!("{}", serde_json::to_string_pretty(&state.snapshot())?);

    tracing::info!("Shutdown complete");
    Ok(())
}
