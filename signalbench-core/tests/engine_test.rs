//! Engine integration tests: signal generator output fed through the
//! simulation, checked against hand-computed portfolios.

use chrono::NaiveDate;
use signalbench_core::components::signal::{MaCrossover, SignalGenerator};
use signalbench_core::domain::{Bar, Signal};
use signalbench_core::engine::run_simulation;

fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    let base_date = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
            pct_change: 0.0,
        })
        .collect()
}

#[test]
fn buy_hold_sell_scenario() {
    let bars = bars_from_closes(&[100.0, 110.0, 90.0]);
    let result = run_simulation(&bars, &[Signal::Buy, Signal::Hold, Signal::Sell], 1000.0);

    let e = &result.entries;
    assert_eq!((e[0].cash, e[0].shares, e[0].equity), (0.0, 10, 1000.0));
    assert_eq!(e[1].equity, 1100.0);
    assert_eq!((e[2].cash, e[2].shares, e[2].equity), (900.0, 0, 900.0));
    assert_eq!(e[2].date, NaiveDate::from_ymd_opt(2023, 3, 3).unwrap());
}

#[test]
fn crossover_round_trip_books_profit() {
    // Dip then rally then slump: one golden cross then one death cross.
    let closes = [
        30.0, 29.0, 28.0, 27.0, 26.0, 25.0, 27.0, 30.0, 34.0, 38.0, 40.0, 39.0, 36.0, 32.0,
        28.0, 25.0,
    ];
    let bars = bars_from_closes(&closes);
    let signals = MaCrossover::new(2, 4).unwrap().generate(&bars).unwrap();
    let result = run_simulation(&bars, &signals, 10_000.0);

    let buy = signals.iter().position(|s| *s == Signal::Buy).unwrap();
    let sell = signals.iter().rposition(|s| *s == Signal::Sell).unwrap();
    assert!(buy < sell);
    assert!(closes[sell] > closes[buy]);
    assert!(result.final_equity() > 10_000.0);
    assert_eq!(result.entries.last().unwrap().shares, 0);
}

#[test]
fn equity_identity_holds_every_bar() {
    let closes: Vec<f64> = (0..50).map(|i| 20.0 + ((i * 7) % 11) as f64).collect();
    let bars = bars_from_closes(&closes);
    let signals: Vec<Signal> = (0..50)
        .map(|i| match i % 5 {
            0 => Signal::Buy,
            3 => Signal::Sell,
            _ => Signal::Hold,
        })
        .collect();
    let result = run_simulation(&bars, &signals, 5_000.0);
    for e in &result.entries {
        assert_eq!(e.equity, e.cash + e.shares as f64 * e.close);
    }
}
