//! Moving average crossover signal: golden cross and death cross detection.
//!
//! The raw state of a bar is sign(short SMA - long SMA), or 0 while either
//! average is still warming up. A signal is emitted only on a change of raw
//! state: a change to +1 is a Buy, a change to -1 is a Sell, anything else
//! (including a change back to 0) is a Hold. The state before the first bar
//! counts as 0, so the first bar at which the long window fills can emit a
//! signal without a real cross having happened.

use crate::components::indicator::Indicator;
use crate::domain::{Bar, Signal};
use crate::indicators::Sma;

use super::{SignalError, SignalGenerator};

/// Moving average crossover signal generator over closing prices.
#[derive(Debug, Clone)]
pub struct MaCrossover {
    short: Sma,
    long: Sma,
}

impl MaCrossover {
    pub fn new(short_window: usize, long_window: usize) -> Result<Self, SignalError> {
        if short_window < 1 {
            return Err(SignalError::InvalidParameter(
                "short_window must be >= 1".into(),
            ));
        }
        if long_window <= short_window {
            return Err(SignalError::InvalidParameter(
                "long_window must be > short_window".into(),
            ));
        }
        Ok(Self {
            short: Sma::new(short_window),
            long: Sma::new(long_window),
        })
    }

    pub fn short_window(&self) -> usize {
        self.short.period()
    }

    pub fn long_window(&self) -> usize {
        self.long.period()
    }

    /// Per-bar raw state in {-1, 0, 1}.
    pub fn raw_states(&self, bars: &[Bar]) -> Vec<i8> {
        let short = self.short.compute(bars);
        let long = self.long.compute(bars);
        short
            .iter()
            .zip(&long)
            .map(|(&s, &l)| {
                if s > l {
                    1
                } else if s < l {
                    -1
                } else {
                    0
                }
            })
            .collect()
    }
}

impl Default for MaCrossover {
    fn default() -> Self {
        Self {
            short: Sma::new(3),
            long: Sma::new(5),
        }
    }
}

impl SignalGenerator for MaCrossover {
    fn name(&self) -> &str {
        "ma_crossover"
    }

    fn warmup_bars(&self) -> usize {
        self.long.lookback()
    }

    fn generate(&self, bars: &[Bar]) -> Result<Vec<Signal>, SignalError> {
        Ok(state_change_signals(&self.raw_states(bars)))
    }
}

/// Edge-detect a raw state series (previous state before index 0 is 0).
pub fn state_change_signals(states: &[i8]) -> Vec<Signal> {
    let mut prev = 0;
    states
        .iter()
        .map(|&state| {
            let signal = if state == prev {
                Signal::Hold
            } else {
                match state {
                    1 => Signal::Buy,
                    -1 => Signal::Sell,
                    _ => Signal::Hold,
                }
            };
            prev = state;
            signal
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn state_changes_emit_once() {
        let states = [0, 0, 1, 1, 1, -1, -1, 0, 1];
        let signals = state_change_signals(&states);
        assert_eq!(
            signals,
            vec![
                Signal::Hold,
                Signal::Hold,
                Signal::Buy,
                Signal::Hold,
                Signal::Hold,
                Signal::Sell,
                Signal::Hold,
                Signal::Hold, // -1 -> 0 is not a buy
                Signal::Buy,
            ]
        );
    }

    #[test]
    fn first_bar_compares_against_zero() {
        assert_eq!(state_change_signals(&[1, 1]), vec![Signal::Buy, Signal::Hold]);
        assert_eq!(state_change_signals(&[-1]), vec![Signal::Sell]);
    }

    #[test]
    fn golden_cross_fires_single_buy() {
        // Falling then rising: short SMA drops below long, then crosses above.
        let closes = [
            20.0, 19.0, 18.0, 17.0, 16.0, 15.0, 14.0, 16.0, 19.0, 23.0, 28.0, 34.0, 41.0,
        ];
        let bars = make_bars(&closes);
        let sig = MaCrossover::new(3, 5).unwrap();
        let signals = sig.generate(&bars).unwrap();

        assert_eq!(signals.len(), closes.len());
        // Warm-up: nothing before the long window fills.
        assert!(signals[..4].iter().all(|s| *s == Signal::Hold));
        // Long window fills at index 4 in a downtrend: literal edge gives a Sell.
        assert_eq!(signals[4], Signal::Sell);

        let buys: Vec<usize> = signals
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Signal::Buy)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(buys.len(), 1, "expected a single golden-cross buy: {signals:?}");

        let states = sig.raw_states(&bars);
        let cross = buys[0];
        assert_eq!(states[cross], 1);
        assert_eq!(states[cross - 1], -1);
        // No repeated buy while short stays above long.
        assert!(states[cross..].iter().all(|&s| s == 1));
    }

    #[test]
    fn too_short_series_is_all_hold() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        let signals = MaCrossover::default().generate(&bars).unwrap();
        assert_eq!(signals, vec![Signal::Hold; 3]);
    }

    #[test]
    fn rejects_bad_windows() {
        assert!(MaCrossover::new(5, 3).is_err());
        assert!(MaCrossover::new(0, 3).is_err());
        assert!(MaCrossover::new(3, 3).is_err());
    }

    #[test]
    fn name_and_warmup() {
        let sig = MaCrossover::default();
        assert_eq!(sig.name(), "ma_crossover");
        assert_eq!((sig.short_window(), sig.long_window()), (3, 5));
        assert_eq!(sig.warmup_bars(), 4);
    }

    #[test]
    fn averages_meeting_on_flat_stretch_hold() {
        // Rally then a flat run: short and long SMA become exactly equal.
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 6.0, 6.0, 6.0, 6.0, 6.0]);
        let sig = MaCrossover::default();

        let states = sig.raw_states(&bars);
        assert_eq!(states[8], 1);
        assert_eq!(states[9], 0);

        let signals = sig.generate(&bars).unwrap();
        assert_eq!(signals[4], Signal::Buy);
        // 1 -> 0 is a Hold, not a Sell
        assert_eq!(signals[9], Signal::Hold);
        assert_eq!(signals.iter().filter(|s| s.is_trade()).count(), 1);
    }
}
