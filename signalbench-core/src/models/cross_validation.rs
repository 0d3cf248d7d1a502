//! K-fold cross-validation scored by R².
//!
//! Folds are contiguous and unshuffled: the first `n % k` folds hold one
//! extra sample. Scores are diagnostics only.

use ndarray::{Array1, Array2, Axis};

use super::{r2_score, ModelError, Regressor};

/// Mean and spread of a set of fold scores.
#[derive(Debug, Clone, PartialEq)]
pub struct CvSummary {
    pub scores: Vec<f64>,
    pub mean: f64,
    pub std: f64,
}

impl CvSummary {
    pub fn from_scores(scores: Vec<f64>) -> Self {
        let n = scores.len().max(1) as f64;
        let mean = scores.iter().sum::<f64>() / n;
        let var = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        Self {
            scores,
            mean,
            std: var.sqrt(),
        }
    }
}

/// `(train, test)` index sets for each of `folds` contiguous folds.
pub fn kfold_indices(
    n_samples: usize,
    folds: usize,
) -> Result<Vec<(Vec<usize>, Vec<usize>)>, ModelError> {
    if folds < 2 || folds > n_samples {
        return Err(ModelError::TooFewSamples {
            folds,
            samples: n_samples,
        });
    }
    let base = n_samples / folds;
    let extra = n_samples % folds;

    let mut splits = Vec::with_capacity(folds);
    let mut start = 0;
    for fold in 0..folds {
        let size = base + usize::from(fold < extra);
        let end = start + size;
        let test: Vec<usize> = (start..end).collect();
        let train: Vec<usize> = (0..start).chain(end..n_samples).collect();
        splits.push((train, test));
        start = end;
    }
    Ok(splits)
}

/// Fit a fresh model per fold and score it on the held-out rows.
pub fn cross_val_r2<M, F>(
    make_model: F,
    x: &Array2<f64>,
    y: &Array1<f64>,
    folds: usize,
) -> Result<CvSummary, ModelError>
where
    M: Regressor,
    F: Fn() -> M,
{
    let mut scores = Vec::with_capacity(folds);
    for (train, test) in kfold_indices(x.nrows(), folds)? {
        let mut model = make_model();
        model.fit(&x.select(Axis(0), &train), &y.select(Axis(0), &train))?;
        let pred = model.predict(&x.select(Axis(0), &test))?;
        scores.push(r2_score(&y.select(Axis(0), &test), &pred));
    }
    Ok(CvSummary::from_scores(scores))
}
