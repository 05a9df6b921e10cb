//! Ordinary least squares over a single feature
//!
//! Fits `y = intercept + slope * x`. With a synthetic index as `x` this is a
//! straight trend line through the series.

use serde::{Deserialize, Serialize};

use super::{ModelKind, Regressor, check_training_data};
use crate::confidence;
use crate::error::{ForecastError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearRegression {
    intercept: f64,
    slope: f64,
    r_squared: f64,
    fitted: bool,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// In-sample coefficient of determination
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }
}

impl Regressor for LinearRegression {
    fn kind(&self) -> ModelKind {
        ModelKind::Linear
    }

    fn fit(&mut self, x: &[f64], y: &[f64]) -> Result<()> {
        check_training_data(self.kind(), x, y)?;

        let n = x.len() as f64;
        let mean_x = x.iter().sum::<f64>() / n;
        let mean_y = y.iter().sum::<f64>() / n;

        let sxx: f64 = x.iter().map(|&xi| (xi - mean_x).powi(2)).sum();
        let sxy: f64 = x
            .iter()
            .zip(y)
            .map(|(&xi, &yi)| (xi - mean_x) * (yi - mean_y))
            .sum();

        if sxx.abs() < 1e-12 {
            return Err(ForecastError::model_fit(
                self.kind().as_str(),
                "singular design: the index has a single distinct value",
            ));
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        if !slope.is_finite() || !intercept.is_finite() {
            return Err(ForecastError::model_fit(
                self.kind().as_str(),
                "coefficients are not finite",
            ));
        }

        let fitted: Vec<f64> = x.iter().map(|&xi| intercept + slope * xi).collect();

        self.slope = slope;
        self.intercept = intercept;
        self.r_squared = confidence::r_squared(y, &fitted);
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, x: f64) -> Result<f64> {
        if !self.fitted {
            return Err(ForecastError::model_fit(
                self.kind().as_str(),
                "model has not been fitted",
            ));
        }
        Ok(self.intercept + self.slope * x)
    }
}
