//! Artifact export: `<key>_results.csv` per strategy and `metrics.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::metrics::Metrics;
use crate::runner::ComparisonReport;

/// Paths written by one export.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub metrics_json: PathBuf,
    pub results_csv: Vec<PathBuf>,
}

/// Contents of `metrics.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsDocument {
    pub initial_capital: f64,
    pub dataset_hash: String,
    pub bar_count: usize,
    pub strategies: Vec<StrategyMetrics>,
    pub failures: Vec<StrategyFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategyMetrics {
    pub key: String,
    pub name: String,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategyFailure {
    pub key: String,
    pub error: String,
}

impl MetricsDocument {
    pub fn from_report(report: &ComparisonReport, dataset_hash: &str) -> Self {
        Self {
            initial_capital: report.initial_capital,
            dataset_hash: dataset_hash.to_string(),
            bar_count: report.bar_count,
            strategies: report
                .completed()
                .map(|run| StrategyMetrics {
                    key: run.kind.key().to_string(),
                    name: run.kind.display_name().to_string(),
                    metrics: run.metrics.clone(),
                })
                .collect(),
            failures: report
                .failures()
                .map(|(kind, error)| StrategyFailure {
                    key: kind.key().to_string(),
                    error: error.to_string(),
                })
                .collect(),
        }
    }
}

/// Write every artifact of `report` into `dir` (created if missing).
pub fn write_artifacts(dir: &Path, report: &ComparisonReport, dataset_hash: &str) -> Result<ArtifactPaths> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut results_csv = Vec::new();
    for run in report.completed() {
        let path = dir.join(format!("{}_results.csv", run.kind.key()));
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create results CSV {}", path.display()))?;
        for entry in &run.result.entries {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        results_csv.push(path);
    }

    let metrics_json = dir.join("metrics.json");
    let doc = MetricsDocument::from_report(report, dataset_hash);
    let json = serde_json::to_string_pretty(&doc).context("Failed to serialize metrics")?;
    std::fs::write(&metrics_json, json)
        .with_context(|| format!("Failed to write {}", metrics_json.display()))?;

    Ok(ArtifactPaths {
        metrics_json,
        results_csv,
    })
}
