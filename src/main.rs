//! Binary entry point: load configuration, derive the operator wallet, and
//! run the adjustment cycle on a fixed interval.

use std::time::Duration;

use anyhow::Context;
use tokio::time::{self, MissedTickBehavior};
use tracing_subscriber::EnvFilter;

use xagpeg::{config, run_cycle, Config, CycleOutcome, XrplLedger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("loading configuration")?;
    let seed = config::seed_from_env().context("reading signing seed")?;
    let ledger = XrplLedger::new(&seed, &config).context("setting up ledger client")?;

    tracing::info!(
        address = ledger.address(),
        endpoint = %config.rpc_url,
        premium = config.premium,
        interval_secs = config.cycle_interval_secs,
        "peg bot started"
    );

    // First tick fires immediately; later ticks are delayed, never stacked,
    // while a cycle is still in flight.
    let mut ticker = time::interval(Duration::from_secs(config.cycle_interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match run_cycle(&ledger, &config).await {
            Ok(CycleOutcome::Held { deviation, .. }) => {
                tracing::info!(deviation_pct = deviation * 100.0, "within threshold, no adjustment");
            }
            Ok(CycleOutcome::Deposited { xrp, .. }) => {
                tracing::info!(xrp, "cycle complete: deposited");
            }
            Ok(CycleOutcome::Withdrew { xrp, .. }) => {
                tracing::info!(xrp, "cycle complete: withdrew");
            }
            Ok(CycleOutcome::SeededPool) => {
                tracing::info!("cycle complete: pool created, fund the XAG side to enable pricing");
            }
            Err(err) => {
                tracing::error!(class = ?err.classify(), "cycle failed: {}", err);
            }
        }
    }
}
