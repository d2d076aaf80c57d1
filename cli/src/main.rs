//! Terminal driver for the pizza shop engine
//!
//! Prints every snapshot as one JSON line on stdout; logs go to stderr.

mod play;

use std::io::Write;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pizza_shop_core_rs::{EngineConfig, ManualScheduler, SimulationEngine, SinkError, Snapshot};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Parser)]
#[clap(author, about, version)]
struct Cli {
    #[clap(flatten)]
    engine: EngineArgs,

    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct EngineArgs {
    /// JSON file with engine config overrides
    #[clap(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// RNG seed (overrides the config file)
    #[clap(long, value_name = "SEED", global = true)]
    seed: Option<u64>,

    /// Tick period in milliseconds (overrides the config file)
    #[clap(long, value_name = "MS", global = true)]
    interval_ms: Option<u64>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the shop and let it tick on its own
    Run {
        /// Number of ticks to run before stopping
        #[clap(long, default_value_t = 20)]
        ticks: u64,

        /// Do not sleep between ticks
        #[clap(long)]
        fast: bool,
    },

    /// Read player commands from stdin
    Play,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "pizza_shop=info,pizza_shop_core_rs=info".into()),
        1 => tracing_subscriber::EnvFilter::new("debug"),
        _ => tracing_subscriber::EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(args: &EngineArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            EngineConfig::from_json_str(&raw)
                .with_context(|| format!("invalid config in {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }
    if let Some(interval_ms) = args.interval_ms {
        config.interval_ms = interval_ms;
    }
    Ok(config)
}

fn print_snapshot(snapshot: &Snapshot) -> Result<(), SinkError> {
    let line = serde_json::to_string(snapshot).map_err(|e| SinkError::Rejected(e.to_string()))?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", line)?;
    Ok(())
}

fn build_engine(config: EngineConfig, scheduler: &ManualScheduler) -> Result<SimulationEngine> {
    let engine = SimulationEngine::new(config)
        .context("failed to create engine")?
        .with_scheduler(scheduler.clone())
        .with_sink(print_snapshot);
    Ok(engine)
}

/// Tick the engine in real time until `ticks` have elapsed
fn run(engine: &mut SimulationEngine, scheduler: &ManualScheduler, ticks: u64, fast: bool) {
    engine.start();

    while engine.current_tick() < ticks {
        let Some(period_ms) = scheduler.period_ms() else {
            break;
        };
        if !fast {
            thread::sleep(Duration::from_millis(period_ms));
        }

        for _ in 0..scheduler.advance(period_ms) {
            engine.step();
        }
    }

    engine.stop();
    info!(
        tick = engine.current_tick(),
        money = engine.money(),
        reputation = engine.reputation(),
        "run finished"
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli.engine)?;
    let scheduler = ManualScheduler::new();
    let mut engine = build_engine(config, &scheduler)?;

    match cli.command {
        Command::Run { ticks, fast } => run(&mut engine, &scheduler, ticks, fast),
        Command::Play => play::play(&mut engine, &scheduler, std::io::stdin().lock())?,
    }

    Ok(())
}
