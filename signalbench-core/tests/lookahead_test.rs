//! Look-ahead contamination tests for indicators and causal signals.
//!
//! Invariant: no indicator value or crossover/oscillator signal at bar t may
//! depend on price data from bar t+1 or later.
//!
//! Method: compute on truncated series (bars 0..100) and full series (bars 0..200).
//! Assert bars 0..100 are identical between both runs. Regression signals are
//! excluded: they are fitted in-sample on targets built from the next close.

use chrono::NaiveDate;
use signalbench_core::components::indicator::Indicator;
use signalbench_core::components::signal::{MacdCrossover, MaCrossover, RsiOscillator, SignalGenerator};
use signalbench_core::domain::Bar;
use signalbench_core::indicators::*;

/// Generate N bars of synthetic OHLCV data with realistic variation.
fn make_test_bars(n: usize) -> Vec<Bar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price: f64 = 100.0;

    for i in 0..n {
        // Deterministic pseudo-random walk using a simple LCG
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05; // -5.0 to +5.0
        let prev = price;
        price = (price + change).max(10.0);

        bars.push(Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open: prev,
            high: prev.max(price) + 2.0,
            low: prev.min(price) - 2.0,
            close: price,
            volume: 1000.0 + i as f64 * 100.0,
            pct_change: price / prev - 1.0,
        });
    }

    bars
}

/// Assert that the indicator produces identical values for bars 0..truncated_len
/// whether computed on a truncated or full series.
fn assert_no_lookahead(indicator: &dyn Indicator, full_bars: &[Bar], truncated_len: usize) {
    let truncated = &full_bars[..truncated_len];
    let full_result = indicator.compute(full_bars);
    let truncated_result = indicator.compute(truncated);

    assert_eq!(
        truncated_result.len(),
        truncated_len,
        "{}: truncated result length mismatch",
        indicator.name()
    );

    for i in 0..truncated_len {
        let t = truncated_result[i];
        let f = full_result[i];
        if t.is_nan() {
            assert!(f.is_nan(), "{}: bar {i} NaN only in truncated run", indicator.name());
        } else {
            assert!(
                (t - f).abs() < 1e-12,
                "{}: look-ahead at bar {i}: truncated={t}, full={f}",
                indicator.name()
            );
        }
    }
}

fn assert_signals_causal(sig: &dyn SignalGenerator, full_bars: &[Bar], truncated_len: usize) {
    let full = sig.generate(full_bars).unwrap();
    let truncated = sig.generate(&full_bars[..truncated_len]).unwrap();
    assert_eq!(&full[..truncated_len], &truncated[..], "{}", sig.name());
}

#[test]
fn sma_no_lookahead() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Sma::new(20), &bars, 100);
}

#[test]
fn ema_no_lookahead() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Ema::new(12), &bars, 100);
}

#[test]
fn rsi_no_lookahead() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Rsi::new(14), &bars, 100);
}

#[test]
fn causal_signals_no_lookahead() {
    let bars = make_test_bars(200);
    assert_signals_causal(&MaCrossover::new(5, 20).unwrap(), &bars, 100);
    assert_signals_causal(&RsiOscillator::default(), &bars, 100);
    assert_signals_causal(&MacdCrossover::default(), &bars, 100);
}
