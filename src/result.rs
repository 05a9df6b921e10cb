//! Forecast result values handed back to callers

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ForecastErrorKind};
use crate::models::ModelKind;

/// Prefix on every failure message
pub const ERROR_PREFIX: &str = "Forecast engine error: ";

/// One projected point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// 1-based distance past the last observed record
    pub step: usize,
    pub value: f64,
}

/// Non-fatal conditions normalized during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForecastWarning {
    /// The selector was not recognized and the default family was used
    UnknownModelSelector {
        requested: String,
        substituted: ModelKind,
    },
}

/// A successful forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub model_type: ModelKind,
    pub target_column: String,
    pub forecast: Vec<ForecastPoint>,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ForecastWarning>,
}

/// A failed forecast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastFailure {
    pub error: String,
    pub error_kind: ForecastErrorKind,
}

impl From<&ForecastError> for ForecastFailure {
    fn from(err: &ForecastError) -> Self {
        Self {
            error: format!("{}{}", ERROR_PREFIX, err),
            error_kind: err.kind(),
        }
    }
}

/// Outcome of a forecast run: projected points or a diagnostic, never both
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForecastResult {
    Success(Forecast),
    Failure(ForecastFailure),
}

impl ForecastResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ForecastResult::Success(_))
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        match self {
            ForecastResult::Success(f) => Some(f),
            ForecastResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ForecastResult::Success(_) => None,
            ForecastResult::Failure(f) => Some(&f.error),
        }
    }

    pub fn error_kind(&self) -> Option<ForecastErrorKind> {
        match self {
            ForecastResult::Success(_) => None,
            ForecastResult::Failure(f) => Some(f.error_kind),
        }
    }

    pub fn confidence(&self) -> Option<f64> {
        self.forecast().map(|f| f.confidence)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({
                "error": format!("{}result serialization failed: {}", ERROR_PREFIX, e),
                "error_kind": ForecastErrorKind::ModelFit,
            })
        })
    }
}

impl From<Result<Forecast, ForecastError>> for ForecastResult {
    fn from(result: Result<Forecast, ForecastError>) -> Self {
        match result {
            Ok(forecast) => ForecastResult::Success(forecast),
            Err(err) => ForecastResult::Failure(ForecastFailure::from(&err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Forecast {
        Forecast {
            model_type: ModelKind::Linear,
            target_column: "sales".to_string(),
            forecast: vec![
                ForecastPoint { step: 1, value: 2170.0 },
                ForecastPoint { step: 2, value: 2347.14 },
                ForecastPoint { step: 3, value: 2524.29 },
            ],
            confidence: 0.85,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_success_shape() {
        let json = ForecastResult::Success(sample()).to_json();
        assert_eq!(json["model_type"], "linear");
        assert_eq!(json["target_column"], "sales");
        assert_eq!(json["forecast"][1], json!({"step": 2, "value": 2347.14}));
        assert!(json.get("error").is_none());
        assert!(json.get("warnings").is_none());
    }

    #[test]
    fn test_failure_shape() {
        let result = ForecastResult::from(Err(ForecastError::EmptyInput));
        let json = result.to_json();
        assert!(json["error"].as_str().unwrap().starts_with(ERROR_PREFIX));
        assert_eq!(json["error_kind"], "empty_input");
        assert!(json.get("forecast").is_none());
    }

    #[test]
    fn test_untagged_deserialize() {
        let ok: ForecastResult =
            serde_json::from_value(ForecastResult::Success(sample()).to_json()).unwrap();
        assert_eq!(ok, ForecastResult::Success(sample()));

        let failed: ForecastResult = serde_json::from_value(json!({
            "error": "Forecast engine error: Data is empty: no records provided",
            "error_kind": "empty_input"
        }))
        .unwrap();
        assert_eq!(failed.error_kind(), Some(ForecastErrorKind::EmptyInput));
    }

    #[test]
    fn test_warning_serialization() {
        let warning = ForecastWarning::UnknownModelSelector {
            requested: "quantum-forecast".to_string(),
            substituted: ModelKind::Linear,
        };
        assert_eq!(
            serde_json::to_value(&warning).unwrap(),
            json!({
                "kind": "unknown_model_selector",
                "requested": "quantum-forecast",
                "substituted": "linear"
            })
        );
    }
}
