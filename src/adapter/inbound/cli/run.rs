//! Handlers for the `run` and `seed` commands.

use std::time::Duration;

use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use crate::adapter::inbound::cli::command::RunArgs;
use crate::error::Result;
use crate::infrastructure::bootstrap::{self, RunOptions};
use crate::infrastructure::config::Config;

/// Execute the run command: poll until interrupted.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let config = Config::load_or_default(&args.config)?;
    config.init_logging();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "slotwatch starting"
    );

    let orchestrator = bootstrap::build_orchestrator(&config, &run_options(args))?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        let _ = shutdown_tx.send(true);
    });

    let result = orchestrator.run(args.seed, shutdown_rx).await;
    if let Err(e) = &result {
        error!(error = %e, "Fatal error");
    }
    info!("slotwatch stopped");
    result
}

/// Execute the seed command: record baselines once and exit.
pub async fn execute_seed(args: &RunArgs) -> Result<()> {
    let config = Config::load_or_default(&args.config)?;
    config.init_logging();

    let orchestrator = bootstrap::build_orchestrator(&config, &run_options(args))?;
    info!("Seeding store with current appointments");
    let report = orchestrator.seed().await?;
    info!(
        clinics = report.clinics,
        scraper_failures = report.scraper_failures,
        "Done seeding store"
    );
    Ok(())
}

fn run_options(args: &RunArgs) -> RunOptions {
    RunOptions {
        scrapers: args.scraper_names(),
        interval: args.interval.map(Duration::from_secs),
        fail_fast: args.fail_fast,
    }
}
