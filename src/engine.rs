//! The forecast engine
//!
//! Records are ingested into a [`Table`], the first eligible numeric column
//! is regressed against the synthetic record index, and the next
//! [`FORECAST_HORIZON`] positions are projected.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::confidence;
use crate::config::{FORECAST_HORIZON, ForecastConfig, ROUNDING_DECIMALS};
use crate::error::{ForecastError, Result};
use crate::models::ModelKind;
use crate::result::{Forecast, ForecastPoint, ForecastResult, ForecastWarning};
use crate::table::{Record, Table, records_from_json};

/// Stateless forecast engine
///
/// Holds only configuration; every call works on its own input, so one
/// engine can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    config: ForecastConfig,
}

impl ForecastEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast, converting every failure into the result value
    pub fn forecast(&self, records: &[Record], model_selector: &str) -> ForecastResult {
        let result = self.try_forecast(records, model_selector);
        if let Err(ref e) = result {
            warn!(selector = %model_selector, error = %e, "Forecast failed");
        }
        ForecastResult::from(result)
    }

    /// Forecast from a JSON array or `{"values": [...]}` envelope
    pub fn forecast_json(&self, input: &Value, model_selector: &str) -> ForecastResult {
        let result = records_from_json(input)
            .and_then(|records| self.try_forecast(&records, model_selector));
        if let Err(ref e) = result {
            warn!(selector = %model_selector, error = %e, "Forecast failed");
        }
        ForecastResult::from(result)
    }

    /// Forecast, propagating failures as errors
    pub fn try_forecast(&self, records: &[Record], model_selector: &str) -> Result<Forecast> {
        self.config.validate()?;

        let (kind, warnings) = resolve_selector(model_selector);
        let table = Table::from_records(records)?;
        let target = table.schema().select_target()?;
        let y = table
            .series(&target.name)
            .ok_or(ForecastError::NoNumericTarget)?;
        let x = table.synthetic_index();

        debug!(
            model = kind.as_str(),
            target = %target.name,
            records = x.len(),
            "Fitting model"
        );

        let mut model = kind.build(&self.config);
        model.fit(&x, y)?;

        let last_index = (x.len() - 1) as f64;
        let forecast = (1..=FORECAST_HORIZON)
            .map(|step| {
                let value = model.predict(last_index + step as f64)?;
                if !value.is_finite() {
                    return Err(ForecastError::model_fit(
                        kind.as_str(),
                        "prediction is not finite",
                    ));
                }
                Ok(ForecastPoint {
                    step,
                    value: confidence::round_to(value, ROUNDING_DECIMALS),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let confidence = confidence::score(self.config.confidence_mode, model.as_ref(), &x, y)?;

        info!(
            model = kind.as_str(),
            target = %target.name,
            confidence,
            "Forecast complete"
        );

        Ok(Forecast {
            model_type: kind,
            target_column: target.name.clone(),
            forecast,
            confidence,
            warnings,
        })
    }
}

/// Map a selector to a model family, substituting the default when unknown
pub fn resolve_selector(model_selector: &str) -> (ModelKind, Vec<ForecastWarning>) {
    match ModelKind::from_selector(model_selector) {
        Some(kind) => (kind, Vec::new()),
        None => {
            let substituted = ModelKind::default();
            warn!(
                selector = %model_selector,
                substituted = substituted.as_str(),
                "Unknown model selector"
            );
            (
                substituted,
                vec![ForecastWarning::UnknownModelSelector {
                    requested: model_selector.to_string(),
                    substituted,
                }],
            )
        }
    }
}

/// Forecast with the default configuration
pub fn forecast(records: &[Record], model_selector: &str) -> ForecastResult {
    ForecastEngine::new().forecast(records, model_selector)
}

/// Forecast JSON input with the default configuration
pub fn forecast_json(input: &Value, model_selector: &str) -> ForecastResult {
    ForecastEngine::new().forecast_json(input, model_selector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfidenceMode;
    use crate::error::ForecastErrorKind;

    fn sales() -> Vec<Record> {
        [1200, 1350, 1250, 1600, 1800, 2100]
            .iter()
            .enumerate()
            .map(|(i, &s)| Record::new().with("month", i as i64 + 1).with("sales", s))
            .collect()
    }

    #[test]
    fn test_linear_happy_path_values() {
        let forecast = ForecastEngine::new().try_forecast(&sales(), "linear").unwrap();

        assert_eq!(forecast.model_type, ModelKind::Linear);
        assert_eq!(forecast.target_column, "sales");
        assert_eq!(forecast.confidence, 0.85);
        let values: Vec<f64> = forecast.forecast.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![2170.0, 2347.14, 2524.29]);
    }

    #[test]
    fn test_resolve_selector_warns_on_unknown() {
        let (kind, warnings) = resolve_selector("quantum-forecast");
        assert_eq!(kind, ModelKind::Linear);
        assert_eq!(warnings.len(), 1);

        let (kind, warnings) = resolve_selector("Random Forest");
        assert_eq!(kind, ModelKind::RandomForest);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_single_record_is_fit_error() {
        let records = vec![Record::new().with("sales", 10)];
        let err = ForecastEngine::new()
            .try_forecast(&records, "linear")
            .unwrap_err();
        assert!(matches!(err, ForecastError::ModelFit { .. }));
    }

    #[test]
    fn test_residual_confidence() {
        let engine = ForecastEngine::with_config(
            ForecastConfig::builder()
                .confidence_mode(ConfidenceMode::Residual)
                .build(),
        );
        let forecast = engine.try_forecast(&sales(), "linear").unwrap();
        // R² of the sales trend is 0.8857...
        assert_eq!(forecast.confidence, 0.89);
    }

    #[test]
    fn test_invalid_config_becomes_error_result() {
        let engine = ForecastEngine::with_config(ForecastConfig {
            n_estimators: 0,
            ..ForecastConfig::default()
        });
        let result = engine.forecast(&sales(), "random-forest");
        assert_eq!(result.error_kind(), Some(ForecastErrorKind::Config));
    }

    #[test]
    fn test_values_near_float_max_stay_finite() {
        let records: Vec<Record> = [1e306, 2e306, 3e306]
            .iter()
            .map(|&v| Record::new().with("v", v))
            .collect();
        let forecast = ForecastEngine::new().try_forecast(&records, "linear").unwrap();
        assert!(forecast.forecast.iter().all(|p| p.value.is_finite()));
        assert!(forecast.forecast[0].value > 3e306);
    }

    #[test]
    fn test_non_finite_prediction_is_fit_error() {
        // slope and intercept fit, but the third step overflows
        let records: Vec<Record> = [0.0, f64::MAX / 2.0]
            .iter()
            .map(|&v| Record::new().with("v", v))
            .collect();
        let err = ForecastEngine::new()
            .try_forecast(&records, "linear")
            .unwrap_err();
        assert!(matches!(err, ForecastError::ModelFit { .. }));
    }

    #[test]
    fn test_forecast_json_envelope() {
        let input = serde_json::json!({"values": [{"x": 1, "y": 10}, {"x": 2, "y": 20}]});
        let result = forecast_json(&input, "Linear Regression");
        let forecast = result.forecast().unwrap();
        assert_eq!(forecast.target_column, "y");
        let values: Vec<f64> = forecast.forecast.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![30.0, 40.0, 50.0]);
    }
}
