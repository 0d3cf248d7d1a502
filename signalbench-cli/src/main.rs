//! SignalBench CLI: run the strategy comparison and list strategies.
//!
//! Commands:
//! - `run`: load config and CSV data, run every enabled strategy, print the
//!   summary table and optionally export artifacts
//! - `strategies`: list strategy keys with their default parameters

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use signalbench_runner::{
    format_summary, load_bars, run_comparison, write_artifacts, BacktestConfig, StrategyKind,
};

#[derive(Parser)]
#[command(
    name = "signalbench",
    about = "SignalBench CLI: discrete-signal strategy backtester"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest every enabled strategy over one daily price series.
    Run {
        /// Path to a TOML config file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// CSV data file (overrides `data_file` from the config).
        #[arg(long)]
        data: Option<PathBuf>,

        /// Initial capital (overrides `initial_capital` from the config).
        #[arg(long)]
        capital: Option<f64>,

        /// Strategy key to run; repeat to run several. Overrides `strategies.enabled`.
        #[arg(long = "strategy")]
        strategies: Vec<String>,

        /// Directory for per-strategy result CSVs and metrics.json.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// List strategy keys and their default parameters.
    Strategies,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data,
            capital,
            strategies,
            output_dir,
        } => run_cmd(config, data, capital, strategies, output_dir),
        Commands::Strategies => {
            list_strategies();
            Ok(())
        }
    }
}

fn run_cmd(
    config_path: Option<PathBuf>,
    data: Option<PathBuf>,
    capital: Option<f64>,
    strategies: Vec<String>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => BacktestConfig::from_file(path)?,
        None => BacktestConfig::default(),
    };

    if let Some(path) = data {
        config.data_file = path;
    }
    if let Some(capital) = capital {
        config.initial_capital = capital;
    }
    if !strategies.is_empty() {
        config.strategies.enabled = strategies
            .iter()
            .map(|s| s.parse::<StrategyKind>())
            .collect::<Result<Vec<_>, _>>()?;
    }
    config.validate()?;

    // Data failures are fatal before any strategy runs.
    let loaded = load_bars(&config.data_file)
        .with_context(|| format!("Failed to load data from {}", config.data_file.display()))?;
    println!("Successfully loaded {} bars", loaded.bars.len());

    let report = run_comparison(&config, &loaded.bars);
    println!();
    print!("{}", format_summary(&report));

    if let Some(dir) = output_dir {
        let paths = write_artifacts(&dir, &report, &loaded.dataset_hash)?;
        info!(
            metrics = %paths.metrics_json.display(),
            results = paths.results_csv.len(),
            "artifacts written"
        );
        println!("Artifacts saved to: {}", dir.display());
    }

    if report.all_failed() {
        bail!("all {} strategies failed", report.outcomes.len());
    }
    Ok(())
}

fn list_strategies() {
    let defaults = BacktestConfig::default();
    for kind in StrategyKind::ALL {
        let params = defaults
            .component_config(kind)
            .params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("{:<24} {:<32} {}", kind.key(), kind.display_name(), params);
    }
}
