//! Caller context and persistable prediction records
//!
//! The engine itself never sees who is calling. Services that store
//! predictions pass a [`CallerContext`] explicitly into [`run_prediction`],
//! which returns a flat [`PredictionRecord`] keyed by foreign-key ids. The
//! record carries no references to user or data objects; the caller's store
//! looks those up by id.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::engine::ForecastEngine;
use crate::result::ForecastResult;
use crate::table::{Record, VALUES_KEY};

/// Identity of an authenticated caller, issued by the session store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(pub Uuid);

impl CallerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CallerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Per-request context threaded through service calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerContext {
    pub caller: CallerId,
    pub request_id: Uuid,
}

impl CallerContext {
    pub fn new(caller: CallerId) -> Self {
        Self {
            caller,
            request_id: Uuid::new_v4(),
        }
    }
}

/// Outcome of a stored prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Completed,
    Failed,
}

/// A named forecast request
#[derive(Debug, Clone)]
pub struct PredictionRequest {
    pub name: Option<String>,
    /// Selector as the user chose it
    pub model_type: String,
    pub records: Vec<Record>,
}

impl PredictionRequest {
    pub fn new(model_type: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            name: None,
            model_type: model_type.into(),
            records,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Row a caller persists after running a prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: Uuid,
    /// Foreign key to the caller
    pub user_id: CallerId,
    pub request_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Selector as requested, before normalization
    pub model_type: String,
    pub input_data: Value,
    pub output_data: ForecastResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub status: PredictionStatus,
    pub created_at: DateTime<Utc>,
}

/// Run a prediction on behalf of `ctx.caller`
pub fn run_prediction(
    engine: &ForecastEngine,
    ctx: &CallerContext,
    request: PredictionRequest,
) -> PredictionRecord {
    let output = engine.forecast(&request.records, &request.model_type);
    let status = if output.is_success() {
        PredictionStatus::Completed
    } else {
        PredictionStatus::Failed
    };

    let mut input_data = serde_json::Map::new();
    input_data.insert(
        VALUES_KEY.to_string(),
        Value::Array(request.records.iter().map(Record::to_json).collect()),
    );
    let record = PredictionRecord {
        id: Uuid::new_v4(),
        user_id: ctx.caller,
        request_id: ctx.request_id,
        name: request.name,
        model_type: request.model_type,
        input_data: Value::Object(input_data),
        confidence: output.confidence(),
        output_data: output,
        status,
        created_at: Utc::now(),
    };

    info!(
        prediction = %record.id,
        caller = %record.user_id,
        status = ?record.status,
        "Prediction finished"
    );
    record
}
