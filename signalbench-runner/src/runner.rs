//! Backtest runner: wires together signal generation, simulation and metrics.
//!
//! Three entry points:
//! - `Backtest`: one generator over one bar series, run then measured.
//! - `run_strategy()`: builds a configured strategy and runs it to metrics.
//! - `run_comparison()`: runs every enabled strategy in parallel over the
//!   shared bars, isolating per-strategy failures.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use signalbench_core::components::factory::{create_signal, FactoryError};
use signalbench_core::components::signal::{SignalError, SignalGenerator};
use signalbench_core::domain::Bar;
use signalbench_core::engine::{run_simulation, SimulationResult};

use crate::config::{BacktestConfig, ConfigError, StrategyKind};
use crate::data_loader::LoadError;
use crate::metrics::{Metrics, MetricsError};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("composition error: {0}")]
    Composition(#[from] FactoryError),
    #[error("signal error: {0}")]
    Signal(#[from] SignalError),
    #[error("metrics error: {0}")]
    Metrics(#[from] MetricsError),
}

// ─── Single backtest ────────────────────────────────────────────────

/// One generator run over one bar series.
///
/// Metrics are only available after `run()` has completed.
pub struct Backtest<'a> {
    bars: &'a [Bar],
    generator: Box<dyn SignalGenerator>,
    initial_capital: f64,
    result: Option<SimulationResult>,
}

impl<'a> Backtest<'a> {
    pub fn new(bars: &'a [Bar], generator: Box<dyn SignalGenerator>, initial_capital: f64) -> Self {
        Self {
            bars,
            generator,
            initial_capital,
            result: None,
        }
    }

    /// Generate signals and simulate. Re-running replaces the previous result.
    pub fn run(&mut self) -> Result<&SimulationResult, RunError> {
        let signals = self.generator.generate(self.bars)?;
        let result = run_simulation(self.bars, &signals, self.initial_capital);
        Ok(self.result.insert(result))
    }

    pub fn result(&self) -> Option<&SimulationResult> {
        self.result.as_ref()
    }

    pub fn metrics(&self) -> Result<Metrics, MetricsError> {
        self.result
            .as_ref()
            .map(Metrics::compute)
            .ok_or(MetricsError::NotYetRun)
    }

    pub fn into_result(self) -> Option<SimulationResult> {
        self.result
    }
}

// ─── Configured strategies ──────────────────────────────────────────

/// Completed run of one configured strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyRun {
    pub kind: StrategyKind,
    pub result: SimulationResult,
    pub metrics: Metrics,
}

/// Per-strategy outcome inside a comparison.
#[derive(Debug, Clone)]
pub enum StrategyOutcome {
    Completed(StrategyRun),
    Failed { kind: StrategyKind, error: String },
}

impl StrategyOutcome {
    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyOutcome::Completed(run) => run.kind,
            StrategyOutcome::Failed { kind, .. } => *kind,
        }
    }

    pub fn run(&self) -> Option<&StrategyRun> {
        match self {
            StrategyOutcome::Completed(run) => Some(run),
            StrategyOutcome::Failed { .. } => None,
        }
    }
}

/// Outcomes of every enabled strategy, in configured order.
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub initial_capital: f64,
    pub bar_count: usize,
    pub outcomes: Vec<StrategyOutcome>,
}

impl ComparisonReport {
    pub fn completed(&self) -> impl Iterator<Item = &StrategyRun> {
        self.outcomes.iter().filter_map(StrategyOutcome::run)
    }

    pub fn failures(&self) -> impl Iterator<Item = (StrategyKind, &str)> {
        self.outcomes.iter().filter_map(|o| match o {
            StrategyOutcome::Failed { kind, error } => Some((*kind, error.as_str())),
            StrategyOutcome::Completed(_) => None,
        })
    }

    /// True when at least one strategy was attempted and none completed.
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.completed().next().is_none()
    }
}

/// Build and run one configured strategy to metrics.
pub fn run_strategy(
    kind: StrategyKind,
    config: &BacktestConfig,
    bars: &[Bar],
) -> Result<StrategyRun, RunError> {
    info!(strategy = kind.key(), bars = bars.len(), "running strategy");
    let generator = create_signal(&config.component_config(kind))?;

    let mut backtest = Backtest::new(bars, generator, config.initial_capital);
    backtest.run()?;
    let metrics = backtest.metrics()?;
    let result = backtest.into_result().ok_or(MetricsError::NotYetRun)?;

    info!(
        strategy = kind.key(),
        total_return_pct = metrics.total_return_pct,
        trades = metrics.trade_count,
        "strategy finished"
    );
    Ok(StrategyRun {
        kind,
        result,
        metrics,
    })
}

/// Run every enabled strategy over the shared, read-only bars.
///
/// Strategies run in parallel; a failing strategy is recorded and never
/// aborts the others. Duplicate kinds in the enabled list run once.
pub fn run_comparison(config: &BacktestConfig, bars: &[Bar]) -> ComparisonReport {
    let mut kinds: Vec<StrategyKind> = Vec::new();
    for &kind in &config.strategies.enabled {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    let outcomes = kinds
        .par_iter()
        .map(|&kind| match run_strategy(kind, config, bars) {
            Ok(run) => StrategyOutcome::Completed(run),
            Err(e) => {
                warn!(strategy = kind.key(), error = %e, "strategy failed");
                StrategyOutcome::Failed {
                    kind,
                    error: e.to_string(),
                }
            }
        })
        .collect();

    ComparisonReport {
        initial_capital: config.initial_capital,
        bar_count: bars.len(),
        outcomes,
    }
}
