//! Column types and inferred table schemas

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ForecastError, Result};

/// Name reserved for the synthetic position index
pub const SYNTHETIC_INDEX: &str = "index";

/// Inferred column type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnType {
    /// Only null values seen
    Null,
    Boolean,
    /// Whole numbers
    Integer,
    /// Floating point numbers
    Number,
    String,
    /// Incompatible types across records
    Mixed { types: Vec<ColumnType> },
    /// No samples
    Unknown,
}

impl ColumnType {
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnType::Null => "null",
            ColumnType::Boolean => "boolean",
            ColumnType::Integer => "integer",
            ColumnType::Number => "number",
            ColumnType::String => "string",
            ColumnType::Mixed { .. } => "mixed",
            ColumnType::Unknown => "unknown",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Number)
    }

    /// Merge this type with another observed type
    pub fn merge_with(self, other: ColumnType) -> ColumnType {
        if self == other {
            return self;
        }

        match (self, other) {
            // Unknown + X = X
            (ColumnType::Unknown, other) | (other, ColumnType::Unknown) => other,

            // Null + X = X (nullability is tracked on the column)
            (ColumnType::Null, other) | (other, ColumnType::Null) => other,

            (ColumnType::Integer, ColumnType::Number)
            | (ColumnType::Number, ColumnType::Integer) => ColumnType::Number,

            (ColumnType::Mixed { mut types }, other) | (other, ColumnType::Mixed { mut types }) => {
                if !types.contains(&other) {
                    types.push(other);
                }
                ColumnType::Mixed { types }
            }

            (a, b) => ColumnType::Mixed { types: vec![a, b] },
        }
    }
}

/// Summary statistics for a numeric column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Inferred description of one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    pub name: String,
    pub column_type: ColumnType,
    /// Present in every record
    pub required: bool,
    /// At least one null value
    pub nullable: bool,
    /// Number of records the column appears in
    pub occurrences: usize,
    /// Integer values stepping by exactly +1 from record to record
    pub index_like: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericSummary>,
}

impl ColumnSchema {
    /// Numeric in every record, with no nulls and no gaps
    pub fn is_uniformly_numeric(&self) -> bool {
        self.required && !self.nullable && self.column_type.is_numeric()
    }
}

/// Schema inferred for a whole table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    /// Columns in first-seen declaration order
    pub columns: Vec<ColumnSchema>,
    pub record_count: usize,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns eligible as a forecast target, in declaration order
    pub fn numeric_columns(&self) -> impl Iterator<Item = &ColumnSchema> {
        self.columns
            .iter()
            .filter(|c| c.is_uniformly_numeric() && c.name != SYNTHETIC_INDEX)
    }

    /// Choose the column to forecast
    ///
    /// The first uniformly numeric column that does not merely restate the
    /// record position. If every numeric column is an ordinal axis, the first
    /// of them is used.
    pub fn select_target(&self) -> Result<&ColumnSchema> {
        let mut fallback = None;
        for column in self.numeric_columns() {
            if !column.index_like {
                debug!(column = %column.name, "Selected target column");
                return Ok(column);
            }
            debug!(column = %column.name, "Skipping ordinal column as target");
            fallback.get_or_insert(column);
        }

        match fallback {
            Some(column) => {
                debug!(
                    column = %column.name,
                    "Only ordinal numeric columns present"
                );
                Ok(column)
            }
            None => {
                let types: Vec<String> = self
                    .columns
                    .iter()
                    .map(|c| format!("{}:{}", c.name, c.column_type.type_name()))
                    .collect();
                debug!(columns = ?types, "No uniformly numeric column");
                Err(ForecastError::NoNumericTarget)
            }
        }
    }
}
