//! Random forest regressor: bootstrap-sampled regression trees, averaged.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::decision_tree::{RegressionTree, TreeConfig};
use super::{check_training_set, ModelError, Regressor};

/// Random Forest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub n_estimators: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Base seed; tree `i` draws its bootstrap sample from `seed + i`
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 5,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        assert!(config.n_estimators >= 1, "n_estimators must be >= 1");
        Self {
            config,
            trees: Vec::new(),
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for RandomForest {
    fn name(&self) -> &str {
        "random_forest"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        check_training_set(x, y)?;
        let n = x.nrows();
        let tree_config = TreeConfig {
            max_depth: self.config.max_depth,
            ..TreeConfig::default()
        };

        // Tree seeds depend only on the tree index.
        self.trees = (0..self.config.n_estimators)
            .into_par_iter()
            .map(|i| -> Result<RegressionTree, ModelError> {
                let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(i as u64));
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                let mut tree = RegressionTree::new(tree_config.clone());
                tree.fit_indices(x, y, &sample)?;
                Ok(tree)
            })
            .collect::<Result<Vec<_>, ModelError>>()?;
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted);
        }
        let mut total = Array1::<f64>::zeros(x.nrows());
        for tree in &self.trees {
            total += &tree.predict(x)?;
        }
        Ok(total / self.trees.len() as f64)
    }
}
