//! Factory: converts a `ComponentConfig` into a boxed `SignalGenerator`.
//!
//! Strategy keys: `moving_average`, `rsi`, `macd`, `linear_regression`,
//! `polynomial_regression`, `random_forest`. Missing parameters fall back to
//! the defaults below.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::ForestConfig;

use super::signal::{
    MacdCrossover, MaCrossover, RegressionPredictor, RsiOscillator, SignalError, SignalGenerator,
};

/// Configuration of a single signal component.
///
/// Uses `BTreeMap` for deterministic key ordering during serialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentConfig {
    pub component_type: String,
    pub params: BTreeMap<String, f64>,
}

impl ComponentConfig {
    pub fn new(component_type: impl Into<String>) -> Self {
        Self {
            component_type: component_type.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, name: &str, value: f64) -> Self {
        self.params.insert(name.to_string(), value);
        self
    }
}

// ─── Error type ──────────────────────────────────────────────────────

/// Errors that can occur during component construction.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum FactoryError {
    #[error("Unknown signal type: {0}")]
    UnknownSignal(String),
    #[error("Invalid {component}: {source}")]
    Invalid {
        component: String,
        #[source]
        source: SignalError,
    },
}

// ─── Helpers ─────────────────────────────────────────────────────────

/// Extract a named f64 parameter from a `ComponentConfig`, falling back to `default`.
fn param(config: &ComponentConfig, name: &str, default: f64) -> f64 {
    config.params.get(name).copied().unwrap_or(default)
}

/// Extract a named usize parameter from a `ComponentConfig`, falling back to `default`.
fn param_usize(config: &ComponentConfig, name: &str, default: usize) -> usize {
    config
        .params
        .get(name)
        .copied()
        .map(|v| v as usize)
        .unwrap_or(default)
}

// ─── Signal factory ──────────────────────────────────────────────────

fn boxed<S: SignalGenerator + 'static>(signal: S) -> Box<dyn SignalGenerator> {
    Box::new(signal)
}

/// Create a signal generator from a `ComponentConfig`.
pub fn create_signal(config: &ComponentConfig) -> Result<Box<dyn SignalGenerator>, FactoryError> {
    let built: Result<Box<dyn SignalGenerator>, SignalError> = match config.component_type.as_str()
    {
        "moving_average" => {
            let short_window = param_usize(config, "short_window", 3);
            let long_window = param_usize(config, "long_window", 5);
            MaCrossover::new(short_window, long_window).map(boxed)
        }
        "rsi" => {
            let period = param_usize(config, "period", 6);
            let oversold = param(config, "oversold_level", 30.0);
            let overbought = param(config, "overbought_level", 70.0);
            RsiOscillator::new(period, oversold, overbought).map(boxed)
        }
        "macd" => {
            let fast = param_usize(config, "fast_period", 4);
            let slow = param_usize(config, "slow_period", 8);
            let signal = param_usize(config, "signal_period", 2);
            MacdCrossover::new(fast, slow, signal).map(boxed)
        }
        "linear_regression" => {
            let window = param_usize(config, "window", 5);
            RegressionPredictor::linear(window).map(boxed)
        }
        "polynomial_regression" => {
            let window = param_usize(config, "window", 5);
            let degree = param_usize(config, "degree", 2);
            RegressionPredictor::polynomial(window, degree).map(boxed)
        }
        "random_forest" => {
            let window = param_usize(config, "window", 5);
            let forest = ForestConfig {
                n_estimators: param_usize(config, "n_estimators", 100),
                max_depth: param_usize(config, "max_depth", 5),
                seed: param(config, "seed", 42.0) as u64,
            };
            let cv_folds = param_usize(config, "cv_folds", 5);
            RegressionPredictor::random_forest(window, forest, cv_folds).map(boxed)
        }
        other => return Err(FactoryError::UnknownSignal(other.to_string())),
    };

    built.map_err(|source| FactoryError::Invalid {
        component: config.component_type.clone(),
        source,
    })
}
