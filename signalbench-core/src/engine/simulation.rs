//! Per-bar simulation loop and its result types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Bar, PortfolioState, Signal};

/// One recorded bar of a simulation, taken after that bar's transition.
///
/// Invariant: `equity == cash + shares * close`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEntry {
    pub date: NaiveDate,
    pub close: f64,
    pub signal: Signal,
    pub cash: f64,
    pub shares: u64,
    pub equity: f64,
}

/// Complete output of one strategy run: one entry per input bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub initial_capital: f64,
    pub entries: Vec<SimulationEntry>,
}

impl SimulationResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Equity of the last entry, or the initial capital when nothing ran.
    pub fn final_equity(&self) -> f64 {
        self.entries
            .last()
            .map(|e| e.equity)
            .unwrap_or(self.initial_capital)
    }

    pub fn equity_curve(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.equity).collect()
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.entries.iter().map(|e| e.signal).collect()
    }
}

/// Run the simulation.
///
/// `signals[i]` applies to `bars[i]`; bars past the end of `signals` are Hold.
/// Extra trailing signals are ignored.
pub fn run_simulation(bars: &[Bar], signals: &[Signal], initial_capital: f64) -> SimulationResult {
    let mut portfolio = PortfolioState::new(initial_capital);
    let mut entries = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let signal = signals.get(i).copied().unwrap_or_default();
        let price = bar.close;

        match signal {
            Signal::Buy if portfolio.cash > 0.0 => {
                let bought = portfolio.buy_all(price);
                if bought > 0 {
                    debug!(
                        date = %bar.date,
                        price,
                        shares = bought,
                        cash = portfolio.cash,
                        "buy"
                    );
                }
            }
            Signal::Sell if portfolio.shares > 0 => {
                let sold = portfolio.sell_all(price);
                debug!(
                    date = %bar.date,
                    price,
                    shares = sold,
                    cash = portfolio.cash,
                    "sell"
                );
            }
            _ => {}
        }

        entries.push(SimulationEntry {
            date: bar.date,
            close: price,
            signal,
            cash: portfolio.cash,
            shares: portfolio.shares,
            equity: portfolio.equity(price),
        });
    }

    SimulationResult {
        initial_capital,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn buy_hold_sell_scenario() {
        let bars = make_bars(&[100.0, 110.0, 90.0]);
        let signals = [Signal::Buy, Signal::Hold, Signal::Sell];
        let result = run_simulation(&bars, &signals, 1000.0);

        assert_eq!(result.len(), 3);
        let e = &result.entries;
        assert_eq!((e[0].shares, e[0].cash, e[0].equity), (10, 0.0, 1000.0));
        assert_eq!((e[1].shares, e[1].equity), (10, 1100.0));
        assert_eq!((e[2].shares, e[2].cash, e[2].equity), (0, 900.0, 900.0));
        assert_eq!(result.final_equity(), 900.0);
    }

    #[test]
    fn missing_signals_are_hold() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0]);
        let result = run_simulation(&bars, &[Signal::Buy], 100.0);
        assert_eq!(result.len(), 4);
        assert_eq!(result.entries[3].signal, Signal::Hold);
        assert_eq!(result.entries[3].shares, 10);
        assert_approx(result.entries[3].equity, 130.0, DEFAULT_EPSILON);
    }

    #[test]
    fn repeated_buy_with_leftover_cash_tops_up() {
        let bars = make_bars(&[30.0, 20.0]);
        let result = run_simulation(&bars, &[Signal::Buy, Signal::Buy], 100.0);
        // 3 shares at 30 leaves 10 cash, not enough for a share at 20.
        assert_eq!(result.entries[0].shares, 3);
        assert_eq!(result.entries[1].shares, 3);
        assert_approx(result.entries[1].cash, 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sell_when_flat_is_noop() {
        let bars = make_bars(&[10.0, 12.0]);
        let result = run_simulation(&bars, &[Signal::Sell, Signal::Sell], 50.0);
        assert!(result.entries.iter().all(|e| e.shares == 0 && e.cash == 50.0));
    }

    #[test]
    fn empty_bars_give_empty_result() {
        let result = run_simulation(&[], &[Signal::Buy], 1000.0);
        assert!(result.is_empty());
        assert_eq!(result.final_equity(), 1000.0);
    }

    #[test]
    fn deterministic() {
        let bars = make_bars(&[5.0, 6.0, 4.0, 7.0, 3.0]);
        let signals = [Signal::Buy, Signal::Sell, Signal::Buy, Signal::Hold, Signal::Sell];
        assert_eq!(
            run_simulation(&bars, &signals, 77.0),
            run_simulation(&bars, &signals, 77.0)
        );
    }
}
