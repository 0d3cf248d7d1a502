//! Reporting and artifact export pipeline.
//!
//! - `summary`: console comparison table
//! - `artifacts`: per-strategy result CSVs and a metrics JSON for external
//!   renderers (price/signal markers, equity curves, comparative bars)

pub mod artifacts;
pub mod summary;

pub use artifacts::{write_artifacts, ArtifactPaths, MetricsDocument};
pub use summary::{format_summary, SummaryRow};
