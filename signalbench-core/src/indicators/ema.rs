//! Exponential Moving Average (EMA), recursive unadjusted form.
//!
//! EMA[0] = x[0]; EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1],
//! alpha = 2 / (span + 1). Seeded on the first observation, so there is no
//! warm-up. This is not the bias-adjusted (weighted) EMA and the two differ
//! numerically on every bar after the first.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: format!("ema_{span}"),
        }
    }

    pub fn alpha(&self) -> f64 {
        2.0 / (self.span as f64 + 1.0)
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_of_series(&closes, self.span)
    }
}

/// Recursive EMA of an arbitrary series, seeded on its first value.
pub fn ema_of_series(values: &[f64], span: usize) -> Vec<f64> {
    let mut result = Vec::with_capacity(values.len());
    let Some(&first) = values.first() else {
        return result;
    };

    let alpha = 2.0 / (span.max(1) as f64 + 1.0);
    let mut prev = first;
    result.push(prev);
    for &x in &values[1..] {
        prev = alpha * x + (1.0 - alpha) * prev;
        result.push(prev);
    }
    result
}
