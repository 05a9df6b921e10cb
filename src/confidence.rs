//! Confidence scoring for fitted models

use crate::config::{ConfidenceMode, ROUNDING_DECIMALS};
use crate::error::Result;
use crate::models::{Regressor, running_mean};

/// Score a fitted model against the series it was trained on
///
/// Heuristic mode returns the family constant and never looks at the data.
/// Residual mode returns the in-sample R², clamped to `[0, 1]`.
pub fn score(mode: ConfidenceMode, model: &dyn Regressor, x: &[f64], y: &[f64]) -> Result<f64> {
    let raw = match mode {
        ConfidenceMode::Heuristic => model.kind().heuristic_confidence(),
        ConfidenceMode::Residual => {
            let fitted = model.predict_many(x)?;
            let r2 = r_squared(y, &fitted);
            if r2.is_nan() { 0.0 } else { r2.clamp(0.0, 1.0) }
        }
    };
    Ok(round_to(raw, ROUNDING_DECIMALS))
}

/// Coefficient of determination
///
/// A constant series scores 1.0 when reproduced exactly and 0.0 otherwise.
/// Both series are scaled by the largest observed magnitude first, so values
/// near `f64::MAX` do not overflow the sums of squares.
pub fn r_squared(actual: &[f64], fitted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let scale = actual.iter().fold(0.0f64, |m, a| m.max(a.abs()));
    let scale = if scale > 0.0 && scale.is_finite() { scale } else { 1.0 };

    let mean = running_mean(actual.iter().map(|a| a / scale));
    let ss_tot: f64 = actual.iter().map(|a| (a / scale - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(fitted)
        .map(|(a, f)| (a / scale - f / scale).powi(2))
        .sum();

    if ss_tot <= f64::EPSILON {
        return if ss_res <= 1e-9 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// Round half away from zero to `decimals` places
///
/// Magnitudes too large to scale are already integral and pass through.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    let rounded = scaled.round() / factor;
    // avoid "-0.0" in serialized output
    if rounded == 0.0 { 0.0 } else { rounded }
}
