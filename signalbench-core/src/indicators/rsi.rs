//! Relative Strength Index (RSI), simple rolling-mean form.
//!
//! gain = rolling mean of positive close deltas over `period`,
//! loss = rolling mean of the magnitude of negative deltas over `period`,
//! RSI = 100 - 100 / (1 + gain / loss).
//! The undefined first delta counts as zero movement, so the first RSI value
//! sits at index period-1. A loss of exactly zero is replaced by
//! `RSI_LOSS_EPSILON`; a flat window therefore reads 0, not 50.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

use super::sma::sma_of_series;

/// Denominator substituted for a zero average loss.
pub const RSI_LOSS_EPSILON: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        rsi_of_series(&closes, self.period)
    }
}

/// RSI of an arbitrary price series.
pub fn rsi_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut gains = vec![0.0; n];
    let mut losses = vec![0.0; n];
    for i in 1..n {
        let delta = values[i] - values[i - 1];
        if delta > 0.0 {
            gains[i] = delta;
        } else if delta < 0.0 {
            losses[i] = -delta;
        }
    }

    let avg_gain = sma_of_series(&gains, period);
    let avg_loss = sma_of_series(&losses, period);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&gain, &loss)| {
            if gain.is_nan() || loss.is_nan() {
                return f64::NAN;
            }
            let denominator = if loss == 0.0 { RSI_LOSS_EPSILON } else { loss };
            100.0 - 100.0 / (1.0 + gain / denominator)
        })
        .collect()
}
