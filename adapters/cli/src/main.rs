#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a gym floor day without a window.

mod config;
mod simulation;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{config::SimulationConfig, simulation::Simulation};

/// Runs the gym floor simulation headless and prints a summary.
#[derive(Debug, Parser)]
#[command(name = "gym-floor", version, about)]
struct Args {
    /// TOML file with seed, layout, odds, timings and schedule.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Seed overriding the configuration.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
    /// Simulated seconds overriding the configuration.
    #[arg(long, value_name = "SECS")]
    duration: Option<u64>,
    /// Tracing filter such as `gym_floor=debug`; falls back to `RUST_LOG`.
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
}

/// Entry point for the gym floor command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log.as_deref())?;

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(duration) = args.duration {
        config.duration_secs = duration;
    }

    info!(
        seed = config.seed,
        duration_secs = config.duration_secs,
        ticks_per_second = config.ticks_per_second,
        "starting simulation"
    );
    let summary = Simulation::new(&config)?.run(config.total_ticks());
    println!("{summary}");
    Ok(())
}

fn init_tracing(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter {directives:?}"))?,
        None => EnvFilter::from_default_env().add_directive("gym_floor=info".parse()?),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
    Ok(())
}
