//! Ordinary least squares with an intercept.
//!
//! Columns and target are centred, columns scaled to unit norm, and the
//! system solved with Householder QR. A column whose remaining norm falls
//! below `RANK_TOLERANCE` is treated as linearly dependent and gets a zero
//! coefficient, so collinear lag features do not blow up the fit.

use ndarray::{Array1, Array2, Axis};

use super::{check_training_set, ModelError, Regressor};

const RANK_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    coefficients: Option<Array1<f64>>,
    intercept: f64,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.coefficients.as_ref()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Regressor for LinearRegression {
    fn name(&self) -> &str {
        "linear_regression"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        check_training_set(x, y)?;

        let n = x.nrows() as f64;
        let x_mean = x.sum_axis(Axis(0)) / n;
        let y_mean = y.sum() / n;

        let centred_x = x - &x_mean;
        let centred_y = y - y_mean;

        let beta = least_squares(&centred_x, &centred_y);
        self.intercept = y_mean - x_mean.dot(&beta);
        self.coefficients = Some(beta);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let beta = self.coefficients.as_ref().ok_or(ModelError::NotFitted)?;
        if x.ncols() != beta.len() {
            return Err(ModelError::DimensionMismatch {
                expected: beta.len(),
                got: x.ncols(),
            });
        }
        Ok(x.dot(beta) + self.intercept)
    }
}

/// Solve `min ||a * beta - b||` by Householder QR, skipping dependent columns.
pub(crate) fn least_squares(a: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let (m, n) = a.dim();
    let mut beta = Array1::<f64>::zeros(n);

    let scales: Vec<f64> = a
        .axis_iter(Axis(1))
        .map(|col| col.dot(&col).sqrt())
        .collect();

    let mut r = a.clone();
    for (j, &scale) in scales.iter().enumerate() {
        if scale > 0.0 {
            r.column_mut(j).mapv_inplace(|v| v / scale);
        }
    }
    let mut qtb = b.clone();

    // (column, pivot row) of every column kept in the triangular system
    let mut pivots: Vec<(usize, usize)> = Vec::with_capacity(n.min(m));
    let mut row = 0;
    for col in 0..n {
        if row >= m {
            break;
        }
        if scales[col] == 0.0 {
            continue;
        }
        let norm = (row..m).map(|i| r[[i, col]].powi(2)).sum::<f64>().sqrt();
        if norm <= RANK_TOLERANCE {
            continue;
        }

        let alpha = if r[[row, col]] > 0.0 { -norm } else { norm };
        let mut v: Vec<f64> = (row..m).map(|i| r[[i, col]]).collect();
        v[0] -= alpha;
        let v_norm2: f64 = v.iter().map(|x| x * x).sum();

        if v_norm2 > 0.0 {
            for j in col..n {
                let dot: f64 = v.iter().enumerate().map(|(k, vk)| vk * r[[row + k, j]]).sum();
                let factor = 2.0 * dot / v_norm2;
                for (k, vk) in v.iter().enumerate() {
                    r[[row + k, j]] -= factor * vk;
                }
            }
            let dot: f64 = v.iter().enumerate().map(|(k, vk)| vk * qtb[row + k]).sum();
            let factor = 2.0 * dot / v_norm2;
            for (k, vk) in v.iter().enumerate() {
                qtb[row + k] -= factor * vk;
            }
        }

        pivots.push((col, row));
        row += 1;
    }

    for k in (0..pivots.len()).rev() {
        let (col, prow) = pivots[k];
        let mut s = qtb[prow];
        for &(later, _) in &pivots[k + 1..] {
            s -= r[[prow, later]] * beta[later];
        }
        beta[col] = s / r[[prow, col]];
    }

    for (j, &scale) in scales.iter().enumerate() {
        if scale > 0.0 {
            beta[j] /= scale;
        }
    }
    beta
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn recovers_exact_linear_relation() {
        // y = 3 + 2*x1 - x2
        let x = array![[1.0, 0.0], [2.0, 1.0], [3.0, 5.0], [4.0, 2.0], [0.5, -1.0]];
        let y = x.map_axis(Axis(1), |row| 3.0 + 2.0 * row[0] - row[1]);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let coef = model.coefficients().unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-9);
        assert!((coef[1] + 1.0).abs() < 1e-9);
        assert!((model.intercept() - 3.0).abs() < 1e-9);

        let pred = model.predict(&x).unwrap();
        for (p, t) in pred.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-9);
        }
    }

    #[test]
    fn duplicated_column_gets_zero_weight() {
        let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 4.0]];
        let y = array![2.0, 4.0, 6.0, 8.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let pred = model.predict(&x).unwrap();
        for (p, t) in pred.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-9);
        }
        let coef = model.coefficients().unwrap();
        assert_eq!(coef[1], 0.0);
    }

    #[test]
    fn constant_feature_predicts_mean() {
        let x = array![[7.0], [7.0], [7.0]];
        let y = array![1.0, 2.0, 6.0];
        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();
        let pred = model.predict(&x).unwrap();
        assert!(pred.iter().all(|p| (p - 3.0).abs() < 1e-12));
    }

    #[test]
    fn predict_before_fit_fails() {
        let model = LinearRegression::new();
        assert_eq!(
            model.predict(&array![[1.0]]).unwrap_err(),
            ModelError::NotFitted
        );
    }

    #[test]
    fn predict_checks_width() {
        let mut model = LinearRegression::new();
        model
            .fit(&array![[1.0, 2.0], [2.0, 1.0], [3.0, 3.0]], &array![1.0, 2.0, 3.0])
            .unwrap();
        assert!(matches!(
            model.predict(&array![[1.0]]),
            Err(ModelError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }
}
