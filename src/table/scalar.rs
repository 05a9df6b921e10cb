//! Scalar cell values and ordered records

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single cell value in an uploaded record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Numeric value, if this cell holds a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(i) => Some(*i as f64),
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Convert a JSON value; arrays and objects are rejected
    pub fn from_json(value: &Value) -> Option<Scalar> {
        match value {
            Value::Null => Some(Scalar::Null),
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Scalar::Integer(i))
                } else {
                    n.as_f64().map(Scalar::Number)
                }
            }
            Value::String(s) => Some(Scalar::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Integer(i) => Value::from(*i),
            Scalar::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Scalar::Text(s) => Value::String(s.clone()),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Integer(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Integer(v as i64)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Number(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Scalar::Null)
    }
}

/// One uploaded row: field name to value, in declaration order
///
/// Duplicate names are accepted here and rejected when the table is built,
/// so the error can point at the offending record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Scalar)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Scalar>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (name, value) in &self.fields {
            map.insert(name.clone(), value.to_json());
        }
        Value::Object(map)
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(Scalar::from_json(&json!(5)), Some(Scalar::Integer(5)));
        assert_eq!(Scalar::from_json(&json!(2.5)), Some(Scalar::Number(2.5)));
        assert_eq!(Scalar::from_json(&json!("a")), Some(Scalar::Text("a".into())));
        assert_eq!(Scalar::from_json(&json!(null)), Some(Scalar::Null));
        assert_eq!(Scalar::from_json(&json!([1, 2])), None);
        assert_eq!(Scalar::from_json(&json!({"a": 1})), None);
    }

    #[test]
    fn test_booleans_are_not_numeric() {
        assert_eq!(Scalar::Bool(true).as_f64(), None);
        assert_eq!(Scalar::Integer(3).as_f64(), Some(3.0));
    }

    #[test]
    fn test_record_keeps_declaration_order() {
        let record = Record::new().with("zeta", 1).with("alpha", "x");
        let names: Vec<&str> = record.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(record.to_json(), json!({"zeta": 1, "alpha": "x"}));
    }

    #[test]
    fn test_option_converts_to_null() {
        let record = Record::new().with("a", None::<i64>);
        assert_eq!(record.get("a"), Some(&Scalar::Null));
    }
}
