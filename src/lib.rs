//! Tabular Forecast - stateless short-horizon forecasting for uploaded tables
//!
//! Provides:
//! - Record ingestion with explicit schema inference
//! - Target column selection against a synthetic record index
//! - Model families (linear trend, seeded random forest)
//! - Fixed three-step projection with a confidence score
//! - Caller-context plumbing for services that persist predictions
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use tabular_forecast::forecast_json;
//!
//! let input = json!({"values": [
//!     {"month": 1, "sales": 1200}, {"month": 2, "sales": 1350},
//!     {"month": 3, "sales": 1250}, {"month": 4, "sales": 1600},
//! ]});
//! let result = forecast_json(&input, "linear");
//! let forecast = result.forecast().unwrap();
//! assert_eq!(forecast.target_column, "sales");
//! assert_eq!(forecast.forecast.len(), 3);
//! ```
//!
//! ## Thread safety
//!
//! Every public type is `Send + Sync` and calls share no mutable state. The
//! random forest fits trees on the global `rayon` pool; output does not
//! depend on the number of worker threads.

pub mod confidence;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod models;
pub mod result;
pub mod table;

pub use config::{ConfidenceMode, FORECAST_HORIZON, ForecastConfig, ForecastConfigBuilder};
pub use context::{
    CallerContext, CallerId, PredictionRecord, PredictionRequest, PredictionStatus, run_prediction,
};
pub use engine::{ForecastEngine, forecast, forecast_json, resolve_selector};
pub use error::{ForecastError, ForecastErrorKind};
pub use models::{ModelKind, Regressor};
pub use result::{Forecast, ForecastFailure, ForecastPoint, ForecastResult, ForecastWarning};
pub use table::{Record, Scalar, Table, TableSchema};
