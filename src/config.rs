//! Configuration for the forecast engine

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// Number of future steps projected past the last observed record
pub const FORECAST_HORIZON: usize = 3;

/// Decimal places kept in forecast values and confidence
pub const ROUNDING_DECIMALS: i32 = 2;

/// How the reported confidence is computed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfidenceMode {
    /// Fixed constant per model family
    #[default]
    Heuristic,
    /// In-sample coefficient of determination of the fitted model
    Residual,
}

/// Configuration for forecasting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForecastConfig {
    pub confidence_mode: ConfidenceMode,

    /// Trees in the random forest
    pub n_estimators: usize,

    /// Maximum depth per tree (None = grow until pure)
    pub max_depth: Option<usize>,

    /// Minimum samples in a tree leaf
    pub min_samples_leaf: usize,

    /// Base seed for bootstrap sampling
    pub seed: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            confidence_mode: ConfidenceMode::Heuristic,
            n_estimators: 100,
            max_depth: None,
            min_samples_leaf: 1,
            seed: 42,
        }
    }
}

impl ForecastConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ForecastConfigBuilder {
        ForecastConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(ForecastError::Config(
                "nEstimators must be at least 1".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(ForecastError::Config(
                "minSamplesLeaf must be at least 1".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(ForecastError::Config(
                "maxDepth must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for ForecastConfig
#[derive(Debug, Default)]
pub struct ForecastConfigBuilder {
    config: ForecastConfig,
}

impl ForecastConfigBuilder {
    pub fn confidence_mode(mut self, mode: ConfidenceMode) -> Self {
        self.config.confidence_mode = mode;
        self
    }

    /// Set the number of trees (at least 1)
    pub fn n_estimators(mut self, n: usize) -> Self {
        self.config.n_estimators = n.max(1);
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = Some(depth.max(1));
        self
    }

    /// Set the minimum leaf size (at least 1)
    pub fn min_samples_leaf(mut self, n: usize) -> Self {
        self.config.min_samples_leaf = n.max(1);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn build(self) -> ForecastConfig {
        self.config
    }
}
