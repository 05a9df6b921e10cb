//! Validated rectangular table built from uploaded records

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use super::inferrer::SchemaInferrer;
use super::scalar::{Record, Scalar};
use super::types::TableSchema;
use crate::error::{ForecastError, Result};

/// Key of the dashboard upload envelope: `{"values": [...]}`
pub const VALUES_KEY: &str = "values";

/// Records after schema inference, with numeric columns extracted
#[derive(Debug, Clone)]
pub struct Table {
    schema: TableSchema,
    numeric: HashMap<String, Vec<f64>>,
}

impl Table {
    /// Infer the schema and build the table
    pub fn from_records(records: &[Record]) -> Result<Self> {
        if records.is_empty() {
            return Err(ForecastError::EmptyInput);
        }

        let mut inferrer = SchemaInferrer::new();
        inferrer.add_records(records)?;
        let schema = inferrer.finalize()?;

        let mut numeric = HashMap::new();
        for column in schema.numeric_columns() {
            let values: Option<Vec<f64>> = records
                .iter()
                .map(|r| r.get(&column.name).and_then(Scalar::as_f64))
                .collect();
            if let Some(values) = values {
                numeric.insert(column.name.clone(), values);
            }
        }

        debug!(
            records = schema.record_count,
            columns = schema.columns.len(),
            numeric = numeric.len(),
            "Built table"
        );

        Ok(Self { schema, numeric })
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.schema.record_count
    }

    pub fn is_empty(&self) -> bool {
        self.schema.record_count == 0
    }

    /// Values of a uniformly numeric column, in record order
    pub fn series(&self, column: &str) -> Option<&[f64]> {
        self.numeric.get(column).map(Vec::as_slice)
    }

    /// Synthetic position index `0..N`
    pub fn synthetic_index(&self) -> Vec<f64> {
        (0..self.len()).map(|i| i as f64).collect()
    }
}

/// Parse records from a JSON array or a `{"values": [...]}` envelope
pub fn records_from_json(value: &Value) -> Result<Vec<Record>> {
    let rows = match value {
        Value::Array(rows) => rows,
        Value::Object(obj) => match obj.get(VALUES_KEY) {
            Some(Value::Array(rows)) => rows,
            Some(other) => {
                return Err(ForecastError::InvalidEnvelope(format!(
                    "'{}' must be an array, found {}",
                    VALUES_KEY,
                    value_type_name(other)
                )));
            }
            None => {
                return Err(ForecastError::InvalidEnvelope(format!(
                    "expected {{\"{}\": [...]}}",
                    VALUES_KEY
                )));
            }
        },
        other => {
            return Err(ForecastError::InvalidEnvelope(format!(
                "expected array or object at root, found {}",
                value_type_name(other)
            )));
        }
    };

    rows.iter()
        .enumerate()
        .map(|(position, row)| record_from_json(position, row))
        .collect()
}

/// Parse records from a JSON string
pub fn records_from_json_str(json: &str) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(json)?;
    records_from_json(&value)
}

fn record_from_json(position: usize, row: &Value) -> Result<Record> {
    let Value::Object(fields) = row else {
        return Err(ForecastError::malformed(
            position,
            format!("expected object, found {}", value_type_name(row)),
        ));
    };

    let mut record = Record::new();
    for (name, value) in fields {
        let scalar = Scalar::from_json(value).ok_or_else(|| {
            ForecastError::malformed(
                position,
                format!(
                    "field '{}' holds a nested {}",
                    name,
                    value_type_name(value)
                ),
            )
        })?;
        record.push(name.clone(), scalar);
    }
    Ok(record)
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
