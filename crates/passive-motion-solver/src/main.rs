//! Passive motion solver entry point.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use passive_motion_solver::{wire, CycleDriver, SolverConfig, SolverEngine, TilePublisher};

/// Passive RF motion detection solver
#[derive(Parser, Debug)]
#[command(name = "passive-motion-solver")]
#[command(author, version, about = "Passive RF motion detection over link variance reports")]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the cycle period in milliseconds
    #[arg(long)]
    period_ms: Option<u64>,
}

/// Prints each published solution tile to stdout.
struct StdoutPublisher;

impl TilePublisher for StdoutPublisher {
    fn publish(&self, payload: &[u8]) {
        match wire::decode(payload) {
            Ok(records) => {
                for record in records {
                    println!(
                        "tile ({}, {}) ({}, {}): {}",
                        record.x1, record.y1, record.x2, record.y2, record.score
                    );
                }
            }
            Err(error) => tracing::error!(%error, "undecodable payload"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let mut config = match cli.config {
        Some(path) => SolverConfig::from_file(&path)?,
        None => SolverConfig::default(),
    };
    if let Some(period_ms) = cli.period_ms {
        config.update_period_ms = period_ms;
    }

    let period = Duration::from_millis(config.update_period_ms);
    let engine = Arc::new(SolverEngine::new(&config, Box::new(StdoutPublisher)));
    let driver = Arc::new(CycleDriver::new(engine, period));

    let task = {
        let driver = Arc::clone(&driver);
        tokio::spawn(async move { driver.run().await })
    };

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    driver.stop();
    task.await?;

    Ok(())
}
