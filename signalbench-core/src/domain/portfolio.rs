//! Portfolio: cash plus a whole number of shares of the single traded series.

use serde::{Deserialize, Serialize};

/// Mutable account state owned by one simulation run.
///
/// The equity accounting identity must hold at every bar:
/// `equity == cash + shares * close`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioState {
    pub cash: f64,
    pub shares: u64,
}

impl PortfolioState {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            cash: initial_capital,
            shares: 0,
        }
    }

    /// Equity marked at `price`.
    pub fn equity(&self, price: f64) -> f64 {
        self.cash + self.shares as f64 * price
    }

    pub fn is_flat(&self) -> bool {
        self.shares == 0
    }

    /// Spend all available cash on whole shares at `price`.
    ///
    /// Returns the number of shares bought (0 if cash does not cover one share).
    pub fn buy_all(&mut self, price: f64) -> u64 {
        if self.cash <= 0.0 || price <= 0.0 || !price.is_finite() {
            return 0;
        }
        let shares = (self.cash / price).floor() as u64;
        if shares > 0 {
            self.shares += shares;
            self.cash -= shares as f64 * price;
        }
        shares
    }

    /// Liquidate the whole position at `price`. Returns the shares sold.
    pub fn sell_all(&mut self, price: f64) -> u64 {
        let shares = self.shares;
        if shares > 0 {
            self.cash += shares as f64 * price;
            self.shares = 0;
        }
        shares
    }
}
