//! Polynomial feature expansion followed by least squares.

use ndarray::{Array1, Array2};

use super::linear::LinearRegression;
use super::{ModelError, Regressor};

/// Expands each row into every monomial of total degree `1..=degree`.
///
/// Terms are ordered by degree, then lexicographically by feature index
/// (x0, x1, x0², x0·x1, x1², ...). The constant term is left to the
/// intercept of the downstream linear model.
#[derive(Debug, Clone)]
pub struct PolynomialFeatures {
    degree: usize,
}

impl PolynomialFeatures {
    pub fn new(degree: usize) -> Self {
        assert!(degree >= 1, "polynomial degree must be >= 1");
        Self { degree }
    }

    /// Index tuples of every output term for `n_features` inputs.
    pub fn terms(&self, n_features: usize) -> Vec<Vec<usize>> {
        let mut terms = Vec::new();
        for d in 1..=self.degree {
            let mut current = Vec::with_capacity(d);
            push_combinations(n_features, d, 0, &mut current, &mut terms);
        }
        terms
    }

    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        let terms = self.terms(x.ncols());
        Array2::from_shape_fn((x.nrows(), terms.len()), |(i, t)| {
            terms[t].iter().map(|&j| x[[i, j]]).product()
        })
    }
}

/// Combinations with replacement of `k` indices from `0..n`, non-decreasing.
fn push_combinations(
    n: usize,
    k: usize,
    start: usize,
    current: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if current.len() == k {
        out.push(current.clone());
        return;
    }
    for j in start..n {
        current.push(j);
        push_combinations(n, k, j, current, out);
        current.pop();
    }
}

#[derive(Debug, Clone)]
pub struct PolynomialRegression {
    features: PolynomialFeatures,
    linear: LinearRegression,
}

impl PolynomialRegression {
    pub fn new(degree: usize) -> Self {
        Self {
            features: PolynomialFeatures::new(degree),
            linear: LinearRegression::new(),
        }
    }
}

impl Regressor for PolynomialRegression {
    fn name(&self) -> &str {
        "polynomial_regression"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        let expanded = self.features.transform(x);
        self.linear.fit(&expanded, y)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let expanded = self.features.transform(x);
        self.linear.predict(&expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Axis};

    #[test]
    fn degree_two_term_order() {
        let terms = PolynomialFeatures::new(2).terms(2);
        assert_eq!(
            terms,
            vec![vec![0], vec![1], vec![0, 0], vec![0, 1], vec![1, 1]]
        );
    }

    #[test]
    fn term_count_for_five_lags() {
        // 5 linear + 15 quadratic
        assert_eq!(PolynomialFeatures::new(2).terms(5).len(), 20);
    }

    #[test]
    fn transform_values() {
        let x = array![[2.0, 3.0]];
        let out = PolynomialFeatures::new(2).transform(&x);
        assert_eq!(out, array![[2.0, 3.0, 4.0, 6.0, 9.0]]);
    }

    #[test]
    fn fits_quadratic_exactly() {
        // y = 1 + x - 0.5 x²
        let x = array![[-2.0], [-1.0], [0.0], [1.0], [2.0], [3.0]];
        let y = x.map_axis(Axis(1), |r| 1.0 + r[0] - 0.5 * r[0] * r[0]);
        let mut model = PolynomialRegression::new(2);
        model.fit(&x, &y).unwrap();
        let pred = model.predict(&x).unwrap();
        for (p, t) in pred.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-9, "pred {p} target {t}");
        }
    }
}
