//! Summary statistics table for the console.

use crate::metrics::round2;
use crate::runner::ComparisonReport;

/// One display row, values rounded to two decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub name: &'static str,
    pub total_return_pct: f64,
    pub trade_count: usize,
    pub win_rate_pct: f64,
    pub max_drawdown_pct: f64,
}

impl SummaryRow {
    pub fn rows(report: &ComparisonReport) -> Vec<Self> {
        report
            .completed()
            .map(|run| Self {
                name: run.kind.display_name(),
                total_return_pct: round2(run.metrics.total_return_pct),
                trade_count: run.metrics.trade_count,
                win_rate_pct: round2(run.metrics.win_rate_pct),
                max_drawdown_pct: round2(run.metrics.max_drawdown_pct),
            })
            .collect()
    }
}

/// Render the comparison as a fixed-width table, failures listed last.
pub fn format_summary(report: &ComparisonReport) -> String {
    let mut out = String::new();
    out.push_str("Strategy Comparison Summary:\n");
    out.push_str(&format!(
        "{:<32} {:>16} {:>8} {:>12} {:>16}\n",
        "Strategy Name", "Total Return(%)", "Trades", "Win Rate(%)", "Max Drawdown(%)"
    ));
    out.push_str(&"-".repeat(88));
    out.push('\n');

    for row in SummaryRow::rows(report) {
        out.push_str(&format!(
            "{:<32} {:>16.2} {:>8} {:>12.2} {:>16.2}\n",
            row.name, row.total_return_pct, row.trade_count, row.win_rate_pct, row.max_drawdown_pct
        ));
    }

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        out.push_str("\nFailed strategies:\n");
        for (kind, error) in failures {
            out.push_str(&format!("  {}: {}\n", kind.display_name(), error));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyKind;
    use crate::metrics::Metrics;
    use crate::runner::{StrategyOutcome, StrategyRun};
    use signalbench_core::engine::SimulationResult;

    fn report() -> ComparisonReport {
        let metrics = Metrics {
            initial_capital: 1000.0,
            final_equity: 900.0,
            total_return_pct: -10.0,
            trade_count: 2,
            winning_trades: 0,
            paired_trades: 1,
            win_rate_pct: 0.0,
            max_drawdown_pct: -18.181818,
        };
        ComparisonReport {
            initial_capital: 1000.0,
            bar_count: 3,
            outcomes: vec![
                StrategyOutcome::Completed(StrategyRun {
                    kind: StrategyKind::MovingAverage,
                    result: SimulationResult {
                        initial_capital: 1000.0,
                        entries: vec![],
                    },
                    metrics,
                }),
                StrategyOutcome::Failed {
                    kind: StrategyKind::RandomForest,
                    error: "insufficient data".into(),
                },
            ],
        }
    }

    #[test]
    fn rows_are_rounded() {
        let rows = SummaryRow::rows(&report());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].max_drawdown_pct, -18.18);
        assert_eq!(rows[0].name, "Moving Average Strategy");
    }

    #[test]
    fn table_lists_runs_and_failures() {
        let text = format_summary(&report());
        assert!(text.contains("Moving Average Strategy"));
        assert!(text.contains("-18.18"));
        assert!(text.contains("-10.00"));
        assert!(text.contains("Failed strategies:"));
        assert!(text.contains("Random Forest Strategy: insufficient data"));
    }
}
