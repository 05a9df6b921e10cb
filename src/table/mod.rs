//! Record ingestion and schema inference
//!
//! Uploaded rows arrive as loosely-typed records. This module validates them
//! once, infers a column schema, and exposes the numeric series the models
//! are fit on.
//!
//! ## Example
//!
//! ```rust
//! use tabular_forecast::table::{Record, Table};
//!
//! let records = vec![
//!     Record::new().with("month", 1).with("sales", 1200),
//!     Record::new().with("month", 2).with("sales", 1350),
//! ];
//! let table = Table::from_records(&records).unwrap();
//! assert_eq!(table.schema().select_target().unwrap().name, "sales");
//! ```

mod frame;
mod inferrer;
mod scalar;
mod types;

pub use frame::{Table, VALUES_KEY, records_from_json, records_from_json_str};
pub use inferrer::SchemaInferrer;
pub use scalar::{Record, Scalar};
pub use types::{ColumnSchema, ColumnType, NumericSummary, SYNTHETIC_INDEX, TableSchema};
