//! Error types for the forecast engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while building or running a forecast
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// No records supplied
    #[error("Data is empty: no records provided")]
    EmptyInput,

    /// Records cannot be reconciled into a rectangular table
    #[error("Malformed input at record {record}: {message}")]
    MalformedInput { record: usize, message: String },

    /// Input envelope is not a record list
    #[error("Invalid input data format: {0}")]
    InvalidEnvelope(String),

    /// No column is numeric across every record
    #[error("No numeric target column found for prediction")]
    NoNumericTarget,

    /// The selected model family could not be fit
    #[error("Model '{model}' could not be fit: {message}")]
    ModelFit { model: String, message: String },

    /// Configuration rejected before fitting
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Stable, serializable classification of a [`ForecastError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastErrorKind {
    EmptyInput,
    MalformedInput,
    NoNumericTarget,
    ModelFit,
    Config,
}

impl ForecastError {
    /// Classify this error
    pub fn kind(&self) -> ForecastErrorKind {
        match self {
            ForecastError::EmptyInput => ForecastErrorKind::EmptyInput,
            ForecastError::MalformedInput { .. } | ForecastError::InvalidEnvelope(_) => {
                ForecastErrorKind::MalformedInput
            }
            ForecastError::NoNumericTarget => ForecastErrorKind::NoNumericTarget,
            ForecastError::ModelFit { .. } => ForecastErrorKind::ModelFit,
            ForecastError::Config(_) => ForecastErrorKind::Config,
        }
    }

    pub(crate) fn malformed(record: usize, message: impl Into<String>) -> Self {
        ForecastError::MalformedInput {
            record,
            message: message.into(),
        }
    }

    pub(crate) fn model_fit(model: impl Into<String>, message: impl Into<String>) -> Self {
        ForecastError::ModelFit {
            model: model.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(e: serde_json::Error) -> Self {
        ForecastError::InvalidEnvelope(e.to_string())
    }
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(ForecastError::EmptyInput.kind(), ForecastErrorKind::EmptyInput);
        assert_eq!(
            ForecastError::InvalidEnvelope("x".into()).kind(),
            ForecastErrorKind::MalformedInput
        );
        assert_eq!(
            ForecastError::model_fit("linear", "singular").kind(),
            ForecastErrorKind::ModelFit
        );
    }

    #[test]
    fn test_display_messages() {
        let err = ForecastError::malformed(3, "duplicate field 'a'");
        assert_eq!(
            err.to_string(),
            "Malformed input at record 3: duplicate field 'a'"
        );
        assert!(
            ForecastError::NoNumericTarget
                .to_string()
                .contains("No numeric target column")
        );
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ForecastErrorKind::NoNumericTarget).unwrap();
        assert_eq!(json, "\"no_numeric_target\"");
    }
}
