//! Regression models used by the regression-predictor signal family.
//!
//! All models share the `Regressor` trait: fit on a feature matrix and a
//! target vector, then predict one value per row. Fitting is deterministic;
//! the random forest draws its bootstrap samples from seeded generators.

pub mod cross_validation;
pub mod decision_tree;
pub mod linear;
pub mod polynomial;
pub mod random_forest;

use ndarray::{Array1, Array2};
use thiserror::Error;

pub use cross_validation::{cross_val_r2, kfold_indices, CvSummary};
pub use decision_tree::{RegressionTree, TreeConfig};
pub use linear::LinearRegression;
pub use polynomial::{PolynomialFeatures, PolynomialRegression};
pub use random_forest::{ForestConfig, RandomForest};

/// Errors from model fitting and prediction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("model has not been fitted yet")]
    NotFitted,

    #[error("cannot split {samples} samples into {folds} folds")]
    TooFewSamples { folds: usize, samples: usize },
}

/// A supervised regression model.
pub trait Regressor: Send + Sync {
    /// Short model name used in logs.
    fn name(&self) -> &str;

    /// Fit the model on `x` (one row per sample) and `y`.
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError>;

    /// Predict one value per row of `x`.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError>;
}

/// Shared shape checks for `fit`.
pub(crate) fn check_training_set(x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
    if x.nrows() != y.len() {
        return Err(ModelError::DimensionMismatch {
            expected: x.nrows(),
            got: y.len(),
        });
    }
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(ModelError::EmptyTrainingSet);
    }
    Ok(())
}

/// Coefficient of determination.
///
/// A constant target scores 1.0 when predicted exactly and 0.0 otherwise.
pub fn r2_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let n = y_true.len();
    if n == 0 {
        return 0.0;
    }
    let mean = y_true.sum() / n as f64;
    let ss_tot: f64 = y_true.iter().map(|y| (y - mean).powi(2)).sum();
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(y, p)| (y - p).powi(2))
        .sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}
