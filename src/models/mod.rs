//! Model families for index → value regression
//!
//! Every family implements [`Regressor`]. [`ModelKind`] names the family and
//! parses the free-form selectors the dashboard sends ("Linear Regression",
//! "Random Forest (Demo)", ...).

mod forest;
mod linear;
mod tree;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use forest::RandomForest;
pub use linear::LinearRegression;
pub use tree::{RegressionTree, TreeNode, TreeParams};

use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};

/// Regression model family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    /// Ordinary least squares trend line
    #[default]
    Linear,
    /// Bagged regression trees
    RandomForest,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::Linear, ModelKind::RandomForest];

    /// Canonical selector name
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Linear => "linear",
            ModelKind::RandomForest => "random-forest",
        }
    }

    /// Fixed confidence reported in heuristic mode
    pub fn heuristic_confidence(&self) -> f64 {
        match self {
            ModelKind::Linear => 0.85,
            ModelKind::RandomForest => 0.92,
        }
    }

    /// Parse a selector, ignoring case, separators and a trailing
    /// parenthesized note such as "(Demo)"
    ///
    /// Returns None for unrecognized selectors.
    pub fn from_selector(selector: &str) -> Option<ModelKind> {
        let base = selector.split('(').next().unwrap_or_default();
        let normalized = base
            .to_lowercase()
            .replace(['-', '_'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        match normalized.as_str() {
            "linear" | "linear regression" | "lr" | "ols" => Some(ModelKind::Linear),
            "random forest" | "randomforest" | "random forest regressor" | "rf" | "forest" => {
                Some(ModelKind::RandomForest)
            }
            _ => None,
        }
    }

    /// Instantiate an unfitted regressor of this family
    pub fn build(&self, config: &ForecastConfig) -> Box<dyn Regressor> {
        match self {
            ModelKind::Linear => Box::new(LinearRegression::new()),
            ModelKind::RandomForest => Box::new(RandomForest::from_config(config)),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A regression model mapping one feature to one target
pub trait Regressor: Send + Sync {
    fn kind(&self) -> ModelKind;

    /// Fit on paired samples
    fn fit(&mut self, x: &[f64], y: &[f64]) -> Result<()>;

    /// Predict the target at `x`
    fn predict(&self, x: f64) -> Result<f64>;

    fn predict_many(&self, xs: &[f64]) -> Result<Vec<f64>> {
        xs.iter().map(|&x| self.predict(x)).collect()
    }
}

/// Shared preconditions for every family
pub(crate) fn check_training_data(kind: ModelKind, x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(ForecastError::model_fit(
            kind.as_str(),
            format!("feature length {} != target length {}", x.len(), y.len()),
        ));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(ForecastError::model_fit(
            kind.as_str(),
            "training data contains non-finite values",
        ));
    }
    let Some(&first) = x.first() else {
        return Err(ForecastError::model_fit(kind.as_str(), "no training samples"));
    };
    if x.iter().all(|&v| v == first) {
        return Err(ForecastError::model_fit(
            kind.as_str(),
            format!(
                "degenerate input: need at least 2 distinct index values, got {} sample(s)",
                x.len()
            ),
        ));
    }
    Ok(())
}

/// Arithmetic mean that stays finite for finite inputs near `f64::MAX`
pub(crate) fn running_mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut mean = 0.0;
    for (i, v) in values.into_iter().enumerate() {
        mean += (v - mean) / (i + 1) as f64;
    }
    mean
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_parsing() {
        assert_eq!(ModelKind::from_selector("linear"), Some(ModelKind::Linear));
        assert_eq!(
            ModelKind::from_selector("Linear Regression"),
            Some(ModelKind::Linear)
        );
        assert_eq!(
            ModelKind::from_selector("Random Forest (Demo)"),
            Some(ModelKind::RandomForest)
        );
        assert_eq!(
            ModelKind::from_selector("random_forest"),
            Some(ModelKind::RandomForest)
        );
        assert_eq!(
            ModelKind::from_selector("  RANDOM-FOREST "),
            Some(ModelKind::RandomForest)
        );
        assert_eq!(ModelKind::from_selector("quantum-forecast"), None);
        assert_eq!(ModelKind::from_selector("Forecasting (Arima - Demo)"), None);
        assert_eq!(ModelKind::from_selector(""), None);
    }

    #[test]
    fn test_canonical_names_round_trip() {
        for kind in ModelKind::ALL {
            assert_eq!(ModelKind::from_selector(kind.as_str()), Some(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_heuristic_confidence_in_range() {
        for kind in ModelKind::ALL {
            let c = kind.heuristic_confidence();
            assert!((0.0..=1.0).contains(&c));
        }
        assert_eq!(ModelKind::default(), ModelKind::Linear);
    }

    #[test]
    fn test_check_training_data() {
        assert!(check_training_data(ModelKind::Linear, &[0.0, 1.0], &[1.0, 2.0]).is_ok());
        assert!(check_training_data(ModelKind::Linear, &[0.0, 1.0], &[1.0]).is_err());
        assert!(check_training_data(ModelKind::Linear, &[], &[]).is_err());
        assert!(check_training_data(ModelKind::Linear, &[2.0, 2.0], &[1.0, 2.0]).is_err());
        assert!(check_training_data(ModelKind::Linear, &[0.0, 1.0], &[1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_build_matches_kind() {
        let config = ForecastConfig::default();
        for kind in ModelKind::ALL {
            assert_eq!(kind.build(&config).kind(), kind);
        }
    }
}
