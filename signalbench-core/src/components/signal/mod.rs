//! Signal generation: turns a bar history into one discrete decision per bar.
//!
//! Signals are portfolio-agnostic: generators receive bar history only, never
//! portfolio or position state. Each variant is an independent type behind
//! the `SignalGenerator` trait; `factory::create_signal` selects one by name.

pub mod ma_crossover;
pub mod macd_crossover;
pub mod regression;
pub mod rsi_oscillator;

use crate::domain::{Bar, Signal};
use crate::models::ModelError;
use thiserror::Error;

/// Errors raised while generating signals.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SignalError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("insufficient data: need at least {needed} bars, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

/// Trait for signal generators.
///
/// # Architecture invariant
/// `generate` returns exactly one signal per input bar. Bars inside a
/// generator's warm-up window (or dropped from a regression's feature set)
/// are `Signal::Hold`. Consumers still treat a missing trailing entry as Hold.
pub trait SignalGenerator: Send + Sync {
    /// Machine-readable name (e.g., "ma_crossover").
    fn name(&self) -> &str;

    /// Number of leading bars that can only ever be Hold.
    fn warmup_bars(&self) -> usize;

    /// Produce the signal sequence for `bars`.
    fn generate(&self, bars: &[Bar]) -> Result<Vec<Signal>, SignalError>;
}

/// Null signal: always Hold. Used as a stub in tests that don't need real
/// signal generation.
pub struct NullSignal;

impl SignalGenerator for NullSignal {
    fn name(&self) -> &str {
        "null"
    }

    fn warmup_bars(&self) -> usize {
        0
    }

    fn generate(&self, bars: &[Bar]) -> Result<Vec<Signal>, SignalError> {
        Ok(vec![Signal::Hold; bars.len()])
    }
}

// Re-export concrete signal types.
pub use ma_crossover::{state_change_signals, MaCrossover};
pub use macd_crossover::{crossover_signals, macd_lines, MacdCrossover, MacdLines};
pub use regression::{lag_dataset, LagDataset, RegressionModel, RegressionOutput, RegressionPredictor};
pub use rsi_oscillator::{threshold_entry_signals, RsiOscillator};
