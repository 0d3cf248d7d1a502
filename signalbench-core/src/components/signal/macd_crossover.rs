//! MACD crossover signal.
//!
//! MACD line = EMA(fast) - EMA(slow); signal line = EMA(signal span) of the
//! MACD line; histogram = MACD - signal. All EMAs are seeded on the first value
//! (no warm-up), so every bar has defined values.
//!
//! Crossings are tested against the *current* signal line: Buy when
//! `macd[t] > signal[t]` and `macd[t-1] <= signal[t]`, Sell when
//! `macd[t] < signal[t]` and `macd[t-1] >= signal[t]`. Bar 0 is always Hold.

use crate::domain::{closes, Bar, Signal};
use crate::indicators::ema_of_series;

use super::{SignalError, SignalGenerator};

#[derive(Debug, Clone)]
pub struct MacdCrossover {
    pub fast_span: usize,
    pub slow_span: usize,
    pub signal_span: usize,
}

/// The three MACD series, one value per bar.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdCrossover {
    pub fn new(fast_span: usize, slow_span: usize, signal_span: usize) -> Result<Self, SignalError> {
        if fast_span < 1 || signal_span < 1 {
            return Err(SignalError::InvalidParameter(
                "MACD spans must be >= 1".into(),
            ));
        }
        if fast_span >= slow_span {
            return Err(SignalError::InvalidParameter(
                "fast_span must be < slow_span".into(),
            ));
        }
        Ok(Self {
            fast_span,
            slow_span,
            signal_span,
        })
    }

    pub fn lines(&self, bars: &[Bar]) -> MacdLines {
        macd_lines(&closes(bars), self.fast_span, self.slow_span, self.signal_span)
    }
}

impl Default for MacdCrossover {
    fn default() -> Self {
        Self {
            fast_span: 4,
            slow_span: 8,
            signal_span: 2,
        }
    }
}

impl SignalGenerator for MacdCrossover {
    fn name(&self) -> &str {
        "macd"
    }

    fn warmup_bars(&self) -> usize {
        1
    }

    fn generate(&self, bars: &[Bar]) -> Result<Vec<Signal>, SignalError> {
        let lines = self.lines(bars);
        Ok(crossover_signals(&lines.macd, &lines.signal))
    }
}

pub fn macd_lines(closes: &[f64], fast: usize, slow: usize, signal_span: usize) -> MacdLines {
    let fast_ema = ema_of_series(closes, fast);
    let slow_ema = ema_of_series(closes, slow);
    let macd: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
    let signal = ema_of_series(&macd, signal_span);
    let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();
    MacdLines {
        macd,
        signal,
        histogram,
    }
}

pub fn crossover_signals(macd: &[f64], signal_line: &[f64]) -> Vec<Signal> {
    let n = macd.len().min(signal_line.len());
    let mut signals = vec![Signal::Hold; n];
    for t in 1..n {
        let (prev, cur, sig) = (macd[t - 1], macd[t], signal_line[t]);
        if cur > sig && prev <= sig {
            signals[t] = Signal::Buy;
        } else if cur < sig && prev >= sig {
            signals[t] = Signal::Sell;
        }
    }
    signals
}
