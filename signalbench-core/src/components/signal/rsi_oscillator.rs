//! RSI threshold signal: oversold entry buys, overbought entry sells.
//!
//! Buy on the bar where RSI moves from >= oversold to < oversold; Sell on the
//! bar where it moves from <= overbought to > overbought. Comparisons against
//! an undefined (NaN) RSI are false, so warm-up bars and the first defined bar
//! are Hold.

use crate::components::indicator::Indicator;
use crate::domain::{Bar, Signal};
use crate::indicators::Rsi;

use super::{SignalError, SignalGenerator};

#[derive(Debug, Clone)]
pub struct RsiOscillator {
    rsi: Rsi,
    pub oversold: f64,
    pub overbought: f64,
}

impl RsiOscillator {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Result<Self, SignalError> {
        if period < 1 {
            return Err(SignalError::InvalidParameter("period must be >= 1".into()));
        }
        if !(oversold < overbought) {
            return Err(SignalError::InvalidParameter(format!(
                "oversold ({oversold}) must be below overbought ({overbought})"
            )));
        }
        Ok(Self {
            rsi: Rsi::new(period),
            oversold,
            overbought,
        })
    }
}

impl RsiOscillator {
    pub fn period(&self) -> usize {
        self.rsi.period()
    }
}

impl Default for RsiOscillator {
    fn default() -> Self {
        Self {
            rsi: Rsi::new(6),
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

impl SignalGenerator for RsiOscillator {
    fn name(&self) -> &str {
        "rsi"
    }

    fn warmup_bars(&self) -> usize {
        self.rsi.period()
    }

    fn generate(&self, bars: &[Bar]) -> Result<Vec<Signal>, SignalError> {
        let rsi = self.rsi.compute(bars);
        Ok(threshold_entry_signals(&rsi, self.oversold, self.overbought))
    }
}

/// Threshold-entry signals over an RSI series.
pub fn threshold_entry_signals(rsi: &[f64], oversold: f64, overbought: f64) -> Vec<Signal> {
    let mut signals = vec![Signal::Hold; rsi.len()];
    for t in 1..rsi.len() {
        let (prev, cur) = (rsi[t - 1], rsi[t]);
        if cur < oversold && prev >= oversold {
            signals[t] = Signal::Buy;
        } else if cur > overbought && prev <= overbought {
            signals[t] = Signal::Sell;
        }
    }
    signals
}
