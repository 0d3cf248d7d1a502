//! Serializable backtest configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config.
//! Parameters are validated once after parsing and then passed explicitly to
//! each strategy; there is no process-wide configuration state.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use signalbench_core::components::ComponentConfig;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("unknown strategy '{0}' (expected one of: {keys})", keys = StrategyKind::keys().join(", "))]
    UnknownStrategy(String),
}

// ─── Strategy registry ──────────────────────────────────────────────

/// The six configurable strategies, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    MovingAverage,
    Rsi,
    Macd,
    LinearRegression,
    PolynomialRegression,
    RandomForest,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 6] = [
        StrategyKind::MovingAverage,
        StrategyKind::Rsi,
        StrategyKind::Macd,
        StrategyKind::LinearRegression,
        StrategyKind::PolynomialRegression,
        StrategyKind::RandomForest,
    ];

    /// Stable key used in config files, CLI flags and artifact names.
    pub fn key(self) -> &'static str {
        match self {
            StrategyKind::MovingAverage => "moving_average",
            StrategyKind::Rsi => "rsi",
            StrategyKind::Macd => "macd",
            StrategyKind::LinearRegression => "linear_regression",
            StrategyKind::PolynomialRegression => "polynomial_regression",
            StrategyKind::RandomForest => "random_forest",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            StrategyKind::MovingAverage => "Moving Average Strategy",
            StrategyKind::Rsi => "RSI Strategy",
            StrategyKind::Macd => "MACD Strategy",
            StrategyKind::LinearRegression => "Linear Regression Strategy",
            StrategyKind::PolynomialRegression => "Polynomial Regression Strategy",
            StrategyKind::RandomForest => "Random Forest Strategy",
        }
    }

    pub fn keys() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.key()).collect()
    }

    pub fn is_regression(self) -> bool {
        matches!(
            self,
            StrategyKind::LinearRegression
                | StrategyKind::PolynomialRegression
                | StrategyKind::RandomForest
        )
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.key() == s)
            .ok_or_else(|| ConfigError::UnknownStrategy(s.to_string()))
    }
}

// ─── Config sections ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovingAverageParams {
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for MovingAverageParams {
    fn default() -> Self {
        Self {
            short_window: 3,
            long_window: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RsiParams {
    pub period: usize,
    pub oversold_level: f64,
    pub overbought_level: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self {
            period: 6,
            oversold_level: 30.0,
            overbought_level: 70.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MacdParams {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 4,
            slow_period: 8,
            signal_period: 2,
        }
    }
}

/// Shared parameters of the three regression strategies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MlParams {
    pub window: usize,
    /// Polynomial regression only.
    pub degree: usize,
    /// Random forest only.
    pub n_estimators: usize,
    /// Random forest only.
    pub max_depth: usize,
    /// Random forest only.
    pub cv_folds: usize,
    /// Random forest only. At most `MAX_SEED`.
    pub seed: u64,
}

/// Largest seed that survives the `f64` component parameter map unchanged.
pub const MAX_SEED: u64 = 1 << 53;

impl Default for MlParams {
    fn default() -> Self {
        Self {
            window: 5,
            degree: 2,
            n_estimators: 100,
            max_depth: 5,
            cv_folds: 5,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrategiesConfig {
    pub enabled: Vec<StrategyKind>,
    pub moving_average: MovingAverageParams,
    pub rsi: RsiParams,
    pub macd: MacdParams,
    pub ml: MlParams,
}

impl Default for StrategiesConfig {
    fn default() -> Self {
        Self {
            enabled: StrategyKind::ALL.to_vec(),
            moving_average: MovingAverageParams::default(),
            rsi: RsiParams::default(),
            macd: MacdParams::default(),
            ml: MlParams::default(),
        }
    }
}

// ─── Top-level config ───────────────────────────────────────────────

/// Complete configuration for a comparison run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BacktestConfig {
    pub data_file: PathBuf,
    pub initial_capital: f64,
    pub strategies: StrategiesConfig,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("600016.csv"),
            initial_capital: 100_000.0,
            strategies: StrategiesConfig::default(),
        }
    }
}

impl BacktestConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return invalid("initial_capital must be a positive number");
        }

        let ma = &self.strategies.moving_average;
        if ma.short_window < 1 || ma.long_window < 1 {
            return invalid("moving_average windows must be >= 1");
        }
        if ma.short_window >= ma.long_window {
            return invalid("moving_average.short_window must be < long_window");
        }

        let rsi = &self.strategies.rsi;
        if rsi.period < 1 {
            return invalid("rsi.period must be >= 1");
        }
        if !(rsi.oversold_level < rsi.overbought_level) {
            return invalid("rsi.oversold_level must be < overbought_level");
        }

        let macd = &self.strategies.macd;
        if macd.fast_period < 1 || macd.slow_period < 1 || macd.signal_period < 1 {
            return invalid("macd periods must be >= 1");
        }
        if macd.fast_period >= macd.slow_period {
            return invalid("macd.fast_period must be < slow_period");
        }

        let ml = &self.strategies.ml;
        if ml.window < 1 {
            return invalid("ml.window must be >= 1");
        }
        if ml.degree < 1 {
            return invalid("ml.degree must be >= 1");
        }
        if ml.n_estimators < 1 || ml.max_depth < 1 {
            return invalid("ml.n_estimators and ml.max_depth must be >= 1");
        }
        if ml.cv_folds < 2 {
            return invalid("ml.cv_folds must be >= 2");
        }
        if ml.seed > MAX_SEED {
            return invalid("ml.seed must be <= 2^53");
        }

        Ok(())
    }

    /// Signal component config for one strategy, fed to `create_signal`.
    pub fn component_config(&self, kind: StrategyKind) -> ComponentConfig {
        let s = &self.strategies;
        let config = ComponentConfig::new(kind.key());
        match kind {
            StrategyKind::MovingAverage => config
                .with_param("short_window", s.moving_average.short_window as f64)
                .with_param("long_window", s.moving_average.long_window as f64),
            StrategyKind::Rsi => config
                .with_param("period", s.rsi.period as f64)
                .with_param("oversold_level", s.rsi.oversold_level)
                .with_param("overbought_level", s.rsi.overbought_level),
            StrategyKind::Macd => config
                .with_param("fast_period", s.macd.fast_period as f64)
                .with_param("slow_period", s.macd.slow_period as f64)
                .with_param("signal_period", s.macd.signal_period as f64),
            StrategyKind::LinearRegression => config.with_param("window", s.ml.window as f64),
            StrategyKind::PolynomialRegression => config
                .with_param("window", s.ml.window as f64)
                .with_param("degree", s.ml.degree as f64),
            StrategyKind::RandomForest => config
                .with_param("window", s.ml.window as f64)
                .with_param("n_estimators", s.ml.n_estimators as f64)
                .with_param("max_depth", s.ml.max_depth as f64)
                .with_param("cv_folds", s.ml.cv_folds as f64)
                .with_param("seed", s.ml.seed as f64),
        }
    }
}
