//! CART regression tree (mean-squared-error splits).

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::{check_training_set, ModelError, Regressor};

/// Decision tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of tree (root is depth 0)
    pub max_depth: usize,
    /// Minimum samples required to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf node
    pub min_samples_leaf: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn predict(&self, row: &[f64]) -> f64 {
        match self {
            Node::Leaf(value) => *value,
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if row[*feature] <= *threshold {
                    left.predict(row)
                } else {
                    right.predict(row)
                }
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct RegressionTree {
    config: TreeConfig,
    n_features: usize,
    root: Option<Node>,
}

impl RegressionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            n_features: 0,
            root: None,
        }
    }

    /// Fit on the rows of `x` selected by `indices` (repeats allowed).
    pub fn fit_indices(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
    ) -> Result<(), ModelError> {
        check_training_set(x, y)?;
        if indices.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        self.n_features = x.ncols();
        self.root = Some(self.build(x, y, indices, 0));
        Ok(())
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, Node::depth)
    }

    pub(crate) fn predict_row(&self, row: &[f64]) -> Result<f64, ModelError> {
        let root = self.root.as_ref().ok_or(ModelError::NotFitted)?;
        Ok(root.predict(row))
    }

    fn build(&self, x: &Array2<f64>, y: &Array1<f64>, indices: &[usize], depth: usize) -> Node {
        let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64;

        if depth >= self.config.max_depth || indices.len() < self.config.min_samples_split {
            return Node::Leaf(mean);
        }

        match self.best_split(x, y, indices) {
            Some(split) => Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left: Box::new(self.build(x, y, &split.left, depth + 1)),
                right: Box::new(self.build(x, y, &split.right, depth + 1)),
            },
            None => Node::Leaf(mean),
        }
    }

    /// Scan every feature with running sums; the split with the largest
    /// reduction in squared error wins. Ties keep the earliest candidate.
    fn best_split(&self, x: &Array2<f64>, y: &Array1<f64>, indices: &[usize]) -> Option<BestSplit> {
        let n = indices.len();
        let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();
        let parent_sse = total_sq - total_sum * total_sum / n as f64;
        if parent_sse <= 1e-12 {
            return None;
        }

        let min_leaf = self.config.min_samples_leaf.max(1);
        let mut best: Option<(usize, f64, f64)> = None; // (feature, threshold, sse)

        for feature in 0..x.ncols() {
            let mut order = indices.to_vec();
            order.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for k in 0..n - 1 {
                let yi = y[order[k]];
                left_sum += yi;
                left_sq += yi * yi;

                let here = x[[order[k], feature]];
                let next = x[[order[k + 1], feature]];
                if here == next {
                    continue;
                }
                let n_left = k + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / n_left as f64)
                    + (right_sq - right_sum * right_sum / n_right as f64);

                if best.map_or(true, |(_, _, b)| sse < b) {
                    best = Some((feature, (here + next) / 2.0, sse));
                }
            }
        }

        let (feature, threshold, sse) = best?;
        if sse >= parent_sse {
            return None;
        }
        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, feature]] <= threshold);
        if left.is_empty() || right.is_empty() {
            return None;
        }
        Some(BestSplit {
            feature,
            threshold,
            left,
            right,
        })
    }
}

impl Regressor for RegressionTree {
    fn name(&self) -> &str {
        "regression_tree"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        let indices: Vec<usize> = (0..x.nrows()).collect();
        self.fit_indices(x, y, &indices)
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        if self.root.is_none() {
            return Err(ModelError::NotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                got: x.ncols(),
            });
        }
        x.rows()
            .into_iter()
            .map(|row| self.predict_row(&row.to_vec()))
            .collect::<Result<Vec<f64>, _>>()
            .map(Array1::from)
    }
}
