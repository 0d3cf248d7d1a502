//! Performance metrics: pure functions that compute strategy statistics.
//!
//! Every metric is a pure function: equity curve and/or signal entries in,
//! scalar out. Values are kept unrounded; rounding happens only for display.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use signalbench_core::domain::Signal;
use signalbench_core::engine::{SimulationEntry, SimulationResult};

/// Errors from metric computation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricsError {
    #[error("backtest not yet executed")]
    NotYetRun,
}

/// Summary statistics of one completed simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub initial_capital: f64,
    pub final_equity: f64,
    pub total_return_pct: f64,
    /// Buys and sells counted individually.
    pub trade_count: usize,
    pub winning_trades: usize,
    pub paired_trades: usize,
    pub win_rate_pct: f64,
    pub max_drawdown_pct: f64,
}

impl Metrics {
    /// Compute all metrics from a finished simulation.
    pub fn compute(result: &SimulationResult) -> Self {
        let equity = result.equity_curve();
        let pair_returns = paired_trade_returns(&result.entries);
        let winning_trades = pair_returns.iter().filter(|r| **r > 0.0).count();
        let final_equity = result.final_equity();

        Self {
            initial_capital: result.initial_capital,
            final_equity,
            total_return_pct: total_return_pct(result.initial_capital, final_equity),
            trade_count: trade_count(&result.entries),
            winning_trades,
            paired_trades: pair_returns.len(),
            win_rate_pct: win_rate_pct(winning_trades, pair_returns.len()),
            max_drawdown_pct: max_drawdown_pct(&equity),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return in percent: (final - initial) / initial * 100.
pub fn total_return_pct(initial_capital: f64, final_equity: f64) -> f64 {
    if initial_capital <= 0.0 {
        return 0.0;
    }
    (final_equity - initial_capital) / initial_capital * 100.0
}

/// Number of bars whose signal is not Hold.
pub fn trade_count(entries: &[SimulationEntry]) -> usize {
    entries.iter().filter(|e| e.signal.is_trade()).count()
}

/// Fractional return of each positional Buy/Sell pair.
///
/// The i-th Buy signal is paired with the i-th Sell signal, by order of
/// appearance, whatever their chronological order. A pair whose buy price is
/// not positive contributes a zero return.
pub fn paired_trade_returns(entries: &[SimulationEntry]) -> Vec<f64> {
    let prices_for = |wanted: Signal| -> Vec<f64> {
        entries
            .iter()
            .filter(|e| e.signal == wanted)
            .map(|e| e.close)
            .collect()
    };
    let buys = prices_for(Signal::Buy);
    let sells = prices_for(Signal::Sell);

    buys.iter()
        .zip(&sells)
        .map(|(&buy, &sell)| if buy > 0.0 { (sell - buy) / buy } else { 0.0 })
        .collect()
}

/// Winning pairs over all pairs, in percent. Zero when there are no pairs.
pub fn win_rate_pct(winning_trades: usize, paired_trades: usize) -> f64 {
    if paired_trades == 0 {
        return 0.0;
    }
    winning_trades as f64 / paired_trades as f64 * 100.0
}

/// Maximum peak-to-trough drawdown in percent (a value <= 0).
///
/// Zero for an empty curve. Bars whose running peak is not positive
/// contribute no drawdown.
pub fn max_drawdown_pct(equity_curve: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &eq in equity_curve {
        peak = peak.max(eq);
        if peak > 0.0 {
            worst = worst.min((eq - peak) / peak);
        }
    }
    worst * 100.0
}

/// Round to two decimals for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
