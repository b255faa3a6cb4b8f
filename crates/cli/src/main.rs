//! Runs a warm-started XY-model temperature sweep and appends one CSV row
//! per temperature.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use xy_cli::{DEFAULT_OUTPUT, Settings};
use xy_core::Observer;
use xy_metropolis::MetropolisSampler;
use xy_observers::{CsvSink, ProgressLogger, StopOnWarning};
use xy_sweep::{Action, Event, Status};

#[derive(Parser)]
#[command(name = "xy-sweep")]
#[command(version)]
#[command(about = "Warm-started temperature sweep of the 2D XY model")]
struct Cli {
    /// Settings file (TOML); missing keys keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output CSV file [default: energy_data.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Base seed; temperature i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Stop the sweep after this many unconverged temperatures
    #[arg(long)]
    stop_after_warnings: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(seed) = cli.seed {
        settings.seed = seed;
    }
    let config = settings.to_config().context("invalid sweep settings")?;

    let output = cli
        .output
        .or(settings.output)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let mut sink = CsvSink::open(&output)
        .with_context(|| format!("opening output {}", output.display()))?;

    let mut progress = ProgressLogger::new();
    let mut stop = cli.stop_after_warnings.map(StopOnWarning::new);
    let observer = |event: &Event<'_>| -> Option<Action> {
        let _: Option<Action> = progress.observe(event);
        stop.as_mut().and_then(|stop| stop.observe(event))
    };

    let solution = xy_sweep::run(&MetropolisSampler::new(), &mut sink, &config, observer)
        .context("sweep failed")?;

    let unconverged = solution
        .results
        .iter()
        .filter(|r| !r.is_converged())
        .count();
    info!(
        temperatures = solution.results.len(),
        unconverged,
        rows = sink.rows(),
        output = %output.display(),
        "done"
    );
    if solution.status == Status::StoppedByObserver {
        info!(
            remaining = config.schedule().len() - solution.iters,
            "stopped early"
        );
    }

    Ok(())
}
