//! SignalBench Runner: configuration, data loading, metrics, comparison
//! harness and reporting.
//!
//! This crate builds on `signalbench-core` to provide:
//! - TOML configuration with validated defaults and the strategy registry
//! - CSV data source with column/unit normalization and a dataset hash
//! - Metrics calculator (return, paired win rate, max drawdown)
//! - Single-strategy runner and parallel, failure-isolating comparison
//! - Console summary and CSV/JSON artifacts for external renderers

pub mod config;
pub mod data_loader;
pub mod metrics;
pub mod reporting;
pub mod runner;

pub use config::{BacktestConfig, ConfigError, StrategyKind};
pub use data_loader::{load_bars, parse_bars, LoadError, LoadedData};
pub use metrics::{Metrics, MetricsError};
pub use reporting::{format_summary, write_artifacts, ArtifactPaths, MetricsDocument};
pub use runner::{
    run_comparison, run_strategy, Backtest, ComparisonReport, RunError, StrategyOutcome,
    StrategyRun,
};
