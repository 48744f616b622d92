//! Result set data model.
//!
//! A query result is an ordered list of named series, each holding rows
//! whose keys keep their insertion order.

use serde_json::{Map, Value};

use crate::core::{InfluxcliError, Result};

/// A single row: column name to value, in insertion order.
pub type Row = Map<String, Value>;

/// A named group of rows sharing a schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Series {
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Series {
            name: name.into(),
            rows,
        }
    }
}

/// A complete query result. Series order is significant and preserved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    pub series: Vec<Series>,
}

impl QueryResult {
    pub fn new() -> Self {
        QueryResult::default()
    }

    /// Appends a series, keeping insertion order.
    pub fn push(&mut self, name: impl Into<String>, rows: Vec<Row>) {
        self.series.push(Series::new(name, rows));
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Parses the `{ "<series>": [ { "<column>": value, ... }, ... ] }` payload.
    ///
    /// A JSON `null` payload is an empty result.
    pub fn from_json(payload: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let object = match value {
            Value::Null => return Ok(QueryResult::new()),
            Value::Object(object) => object,
            other => {
                return Err(InfluxcliError::Result(format!(
                    "expected an object of series, found {}",
                    json_type_name(&other)
                )))
            }
        };

        let mut result = QueryResult::new();
        for (name, rows) in object {
            let rows = match rows {
                Value::Null => Vec::new(),
                Value::Array(rows) => rows
                    .into_iter()
                    .map(|row| match row {
                        Value::Object(row) => Ok(row),
                        other => Err(InfluxcliError::Result(format!(
                            "series '{}' contains a {} where a row object was expected",
                            name,
                            json_type_name(&other)
                        ))),
                    })
                    .collect::<Result<Vec<Row>>>()?,
                other => {
                    return Err(InfluxcliError::Result(format!(
                        "series '{}' should be an array of rows, found {}",
                        name,
                        json_type_name(&other)
                    )))
                }
            };
            result.push(name, rows);
        }
        Ok(result)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
