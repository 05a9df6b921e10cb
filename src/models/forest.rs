//! Bagged regression trees

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::tree::{RegressionTree, TreeParams};
use super::{ModelKind, Regressor, check_training_data, running_mean};
use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};

/// Random forest regressor
///
/// Each tree is grown on a bootstrap sample drawn with its own
/// `ChaCha8Rng` seeded from `seed + tree_index`, so the fitted forest is the
/// same whatever the thread count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::from_config(&ForecastConfig::default())
    }
}

impl RandomForest {
    pub fn new(n_estimators: usize) -> Self {
        Self {
            n_estimators,
            ..Self::default()
        }
    }

    pub fn from_config(config: &ForecastConfig) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators: config.n_estimators,
            max_depth: config.max_depth,
            min_samples_leaf: config.min_samples_leaf,
            seed: config.seed,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for RandomForest {
    fn kind(&self) -> ModelKind {
        ModelKind::RandomForest
    }

    fn fit(&mut self, x: &[f64], y: &[f64]) -> Result<()> {
        check_training_data(self.kind(), x, y)?;
        if self.n_estimators == 0 {
            return Err(ForecastError::model_fit(
                self.kind().as_str(),
                "forest needs at least one tree",
            ));
        }

        let n_samples = x.len();
        let params = TreeParams {
            max_depth: self.max_depth,
            min_samples_leaf: self.min_samples_leaf.max(1),
        };
        let base_seed = self.seed;

        self.trees = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_idx| {
                let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(tree_idx as u64));
                let (x_boot, y_boot): (Vec<f64>, Vec<f64>) = (0..n_samples)
                    .map(|_| {
                        let i = rng.gen_range(0..n_samples);
                        (x[i], y[i])
                    })
                    .unzip();
                RegressionTree::grow(&x_boot, &y_boot, params)
            })
            .collect();

        Ok(())
    }

    fn predict(&self, x: f64) -> Result<f64> {
        if self.trees.is_empty() {
            return Err(ForecastError::model_fit(
                self.kind().as_str(),
                "model has not been fitted",
            ));
        }
        Ok(running_mean(self.trees.iter().map(|tree| tree.predict(x))))
    }
}
