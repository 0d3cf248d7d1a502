//! Regression-based signals: predict the next close-to-close change from
//! lagged closes and trade on its sign.
//!
//! For each bar `t` with `window <= t < n - 1` the feature row is
//! `[close[t-1], close[t-2], ..., close[t-window]]` and the target is
//! `close[t+1] - close[t]`. Bars without a complete row or target are Hold.
//! The model is fitted on every complete row and predicts on the same rows.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::{closes, Bar, Signal};
use crate::models::{
    cross_val_r2, CvSummary, ForestConfig, LinearRegression, PolynomialRegression, RandomForest,
    Regressor,
};

use super::{SignalError, SignalGenerator};

/// Model family behind a `RegressionPredictor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum RegressionModel {
    Linear,
    Polynomial {
        degree: usize,
    },
    RandomForest {
        n_estimators: usize,
        max_depth: usize,
        cv_folds: usize,
        seed: u64,
    },
}

#[derive(Debug, Clone)]
pub struct RegressionPredictor {
    pub window: usize,
    pub model: RegressionModel,
}

/// Lagged-close design matrix plus the bar index each row belongs to.
#[derive(Debug, Clone)]
pub struct LagDataset {
    pub rows: Vec<usize>,
    pub features: Array2<f64>,
    pub target: Array1<f64>,
}

/// Fitted predictions, aligned with `rows`, and the optional CV diagnostic.
#[derive(Debug, Clone)]
pub struct RegressionOutput {
    pub rows: Vec<usize>,
    pub predictions: Vec<f64>,
    pub cv: Option<CvSummary>,
}

impl RegressionPredictor {
    pub fn new(window: usize, model: RegressionModel) -> Result<Self, SignalError> {
        if window < 1 {
            return Err(SignalError::InvalidParameter("window must be >= 1".into()));
        }
        match &model {
            RegressionModel::Linear => {}
            RegressionModel::Polynomial { degree } => {
                if *degree < 1 {
                    return Err(SignalError::InvalidParameter("degree must be >= 1".into()));
                }
            }
            RegressionModel::RandomForest {
                n_estimators,
                max_depth,
                cv_folds,
                ..
            } => {
                if *n_estimators < 1 || *max_depth < 1 {
                    return Err(SignalError::InvalidParameter(
                        "n_estimators and max_depth must be >= 1".into(),
                    ));
                }
                if *cv_folds < 2 {
                    return Err(SignalError::InvalidParameter("cv_folds must be >= 2".into()));
                }
            }
        }
        Ok(Self { window, model })
    }

    pub fn linear(window: usize) -> Result<Self, SignalError> {
        Self::new(window, RegressionModel::Linear)
    }

    pub fn polynomial(window: usize, degree: usize) -> Result<Self, SignalError> {
        Self::new(window, RegressionModel::Polynomial { degree })
    }

    pub fn random_forest(window: usize, config: ForestConfig, cv_folds: usize) -> Result<Self, SignalError> {
        Self::new(
            window,
            RegressionModel::RandomForest {
                n_estimators: config.n_estimators,
                max_depth: config.max_depth,
                cv_folds,
                seed: config.seed,
            },
        )
    }

    /// Fit on the lag dataset of `bars` and predict in-sample.
    pub fn fit_predict(&self, bars: &[Bar]) -> Result<RegressionOutput, SignalError> {
        let data = lag_dataset(&closes(bars), self.window);
        if data.rows.is_empty() {
            return Err(SignalError::InsufficientData {
                needed: self.window + 2,
                got: bars.len(),
            });
        }

        let (predictions, cv) = match &self.model {
            RegressionModel::Linear => {
                (fit_and_predict(LinearRegression::new(), &data)?, None)
            }
            RegressionModel::Polynomial { degree } => {
                (fit_and_predict(PolynomialRegression::new(*degree), &data)?, None)
            }
            RegressionModel::RandomForest {
                n_estimators,
                max_depth,
                cv_folds,
                seed,
            } => {
                let config = ForestConfig {
                    n_estimators: *n_estimators,
                    max_depth: *max_depth,
                    seed: *seed,
                };
                let cv = match cross_val_r2(
                    || RandomForest::new(config.clone()),
                    &data.features,
                    &data.target,
                    *cv_folds,
                ) {
                    Ok(summary) => {
                        info!(
                            folds = *cv_folds,
                            scores = ?summary.scores,
                            mean_r2 = summary.mean,
                            two_sigma = 2.0 * summary.std,
                            "random forest cross-validation"
                        );
                        Some(summary)
                    }
                    Err(e) => {
                        warn!(error = %e, "skipping random forest cross-validation");
                        None
                    }
                };
                (fit_and_predict(RandomForest::new(config), &data)?, cv)
            }
        };

        Ok(RegressionOutput {
            rows: data.rows,
            predictions,
            cv,
        })
    }

    fn model_name(&self) -> &'static str {
        match self.model {
            RegressionModel::Linear => "linear_regression",
            RegressionModel::Polynomial { .. } => "polynomial_regression",
            RegressionModel::RandomForest { .. } => "random_forest",
        }
    }
}

impl SignalGenerator for RegressionPredictor {
    fn name(&self) -> &str {
        self.model_name()
    }

    fn warmup_bars(&self) -> usize {
        self.window
    }

    fn generate(&self, bars: &[Bar]) -> Result<Vec<Signal>, SignalError> {
        let output = self.fit_predict(bars)?;
        let mut signals = vec![Signal::Hold; bars.len()];
        for (&t, &pred) in output.rows.iter().zip(&output.predictions) {
            signals[t] = Signal::from_sign(pred);
        }
        Ok(signals)
    }
}

fn fit_and_predict<M: Regressor>(mut model: M, data: &LagDataset) -> Result<Vec<f64>, SignalError> {
    model.fit(&data.features, &data.target)?;
    Ok(model.predict(&data.features)?.to_vec())
}

/// Build the lagged-close dataset. Empty when `closes.len() < window + 2`.
pub fn lag_dataset(closes: &[f64], window: usize) -> LagDataset {
    let n = closes.len();
    let rows: Vec<usize> = if window >= 1 && n >= window + 2 {
        (window..n - 1).collect()
    } else {
        Vec::new()
    };

    let mut features = Array2::zeros((rows.len(), window));
    let mut target = Array1::zeros(rows.len());
    for (r, &t) in rows.iter().enumerate() {
        for lag in 1..=window {
            features[[r, lag - 1]] = closes[t - lag];
        }
        target[r] = closes[t + 1] - closes[t];
    }

    LagDataset {
        rows,
        features,
        target,
    }
}
