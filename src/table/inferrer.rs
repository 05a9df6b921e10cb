//! Schema inference over uploaded records

use std::collections::{HashMap, HashSet};

use super::scalar::{Record, Scalar};
use super::types::{ColumnSchema, ColumnType, NumericSummary, TableSchema};
use crate::error::{ForecastError, Result};

/// Per-column facts collected while records stream in
#[derive(Debug, Clone)]
struct ColumnFacts {
    column_type: ColumnType,
    occurrences: usize,
    nulls: usize,
    numeric: NumericStats,
    ordinal: OrdinalTracker,
}

impl ColumnFacts {
    fn new() -> Self {
        Self {
            column_type: ColumnType::Unknown,
            occurrences: 0,
            nulls: 0,
            numeric: NumericStats::default(),
            ordinal: OrdinalTracker::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct NumericStats {
    min: f64,
    max: f64,
    sum: f64,
    count: usize,
}

impl NumericStats {
    fn add(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.sum += value;
        self.count += 1;
    }

    fn summary(&self) -> Option<NumericSummary> {
        (self.count > 0).then(|| NumericSummary {
            min: self.min,
            max: self.max,
            mean: self.sum / self.count as f64,
        })
    }
}

/// Tracks whether a column restates the record position, counting up by
/// one from 0 or 1
#[derive(Debug, Clone)]
struct OrdinalTracker {
    last: Option<(usize, i64)>,
    stepping: bool,
}

impl Default for OrdinalTracker {
    fn default() -> Self {
        Self {
            last: None,
            stepping: true,
        }
    }
}

impl OrdinalTracker {
    fn observe(&mut self, position: usize, value: &Scalar) {
        if !self.stepping {
            return;
        }
        let Scalar::Integer(current) = *value else {
            self.stepping = false;
            return;
        };
        let aligned = match self.last {
            Some((last_position, last_value)) => {
                position == last_position + 1 && last_value.checked_add(1) == Some(current)
            }
            None => {
                let position = position as i64;
                current == position || current == position + 1
            }
        };
        if !aligned {
            self.stepping = false;
            return;
        }
        self.last = Some((position, current));
    }
}

/// Schema inference engine for tabular records
///
/// Columns are reported in the order they are first seen, which for the
/// first record is its declaration order.
#[derive(Debug, Default)]
pub struct SchemaInferrer {
    order: Vec<String>,
    columns: HashMap<String, ColumnFacts>,
    record_count: usize,
}

impl SchemaInferrer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and analyze one record
    pub fn add_record(&mut self, record: &Record) -> Result<()> {
        let position = self.record_count;

        if record.is_empty() {
            return Err(ForecastError::malformed(position, "record has no fields"));
        }

        let mut seen = HashSet::with_capacity(record.len());
        for (name, value) in record.fields() {
            if !seen.insert(name) {
                return Err(ForecastError::malformed(
                    position,
                    format!("duplicate field '{}'", name),
                ));
            }
            if let Scalar::Number(n) = value {
                if !n.is_finite() {
                    return Err(ForecastError::malformed(
                        position,
                        format!("field '{}' holds a non-finite number", name),
                    ));
                }
            }
        }

        for (name, value) in record.fields() {
            if !self.columns.contains_key(name) {
                self.order.push(name.to_string());
            }
            let facts = self
                .columns
                .entry(name.to_string())
                .or_insert_with(ColumnFacts::new);

            facts.occurrences += 1;
            let observed = infer_type(value);
            facts.column_type = std::mem::replace(&mut facts.column_type, ColumnType::Unknown)
                .merge_with(observed);
            if value.is_null() {
                facts.nulls += 1;
            }
            if let Some(n) = value.as_f64() {
                facts.numeric.add(n);
            }
            facts.ordinal.observe(position, value);
        }

        self.record_count += 1;
        Ok(())
    }

    /// Add a batch of records
    pub fn add_records(&mut self, records: &[Record]) -> Result<()> {
        for record in records {
            self.add_record(record)?;
        }
        Ok(())
    }

    /// Finalize inference and produce the table schema
    pub fn finalize(self) -> Result<TableSchema> {
        if self.record_count == 0 {
            return Err(ForecastError::EmptyInput);
        }

        let record_count = self.record_count;
        let mut columns = self.columns;
        let schema_columns = self
            .order
            .into_iter()
            .filter_map(|name| {
                let facts = columns.remove(&name)?;
                let required = facts.occurrences == record_count;
                let index_like = required
                    && record_count > 1
                    && facts.ordinal.stepping
                    && facts.column_type == ColumnType::Integer;
                Some(ColumnSchema {
                    name,
                    column_type: facts.column_type,
                    required,
                    nullable: facts.nulls > 0,
                    occurrences: facts.occurrences,
                    index_like,
                    numeric: facts.numeric.summary(),
                })
            })
            .collect();

        Ok(TableSchema {
            columns: schema_columns,
            record_count,
        })
    }
}

fn infer_type(value: &Scalar) -> ColumnType {
    match value {
        Scalar::Null => ColumnType::Null,
        Scalar::Bool(_) => ColumnType::Boolean,
        Scalar::Integer(_) => ColumnType::Integer,
        Scalar::Number(_) => ColumnType::Number,
        Scalar::Text(_) => ColumnType::String,
    }
}
