//! Typed values, raw tables, and the owning record set.
//!
//! `RawTable` is what comes off disk: trimmed headers and untyped text.
//! `RecordSet` is the cleaned, typed, uniquely named result that every view,
//! edit, and store operation works against.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::id::RecordId;
use crate::schema::{DataType, Schema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Str(String),
}

impl Value {
    /// Type of a present value. `Null` carries no type of its own.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(DataType::Boolean),
            Value::Int(_) => Some(DataType::Int64),
            Value::Float(_) => Some(DataType::Float64),
            Value::Date(_) => Some(DataType::Date),
            Value::Str(_) => Some(DataType::Utf8),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Str(s) => f.write_str(s),
        }
    }
}

/// Untyped rows as read from a delimited file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Case- and whitespace-insensitive header lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.headers
            .iter()
            .position(|h| h.trim().to_lowercase() == wanted)
    }

    /// Field text at (`row`, `col`); short rows read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub values: Vec<Value>,
}

/// The full, deduplicated, currently loaded collection of rows.
///
/// Source of truth for edits and persistence. Cloning a `RecordSet` yields an
/// independent snapshot; background work must only ever receive one of those.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    schema: Schema,
    records: Vec<Record>,
    name_col: usize,
}

impl RecordSet {
    /// Build a set whose name column is `name_column`. Records are renumbered
    /// `1..=N` in the order given.
    pub fn new(
        schema: Schema,
        rows: Vec<Vec<Value>>,
        name_column: &str,
    ) -> Result<Self, SchemaError> {
        let name_col = schema
            .find(name_column)
            .ok_or_else(|| SchemaError::MissingNameColumn(name_column.to_string()))?;
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(pos, values)| Record {
                id: RecordId::from_position(pos),
                values,
            })
            .collect();
        Ok(Self {
            schema,
            records,
            name_col,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn name_column(&self) -> usize {
        self.name_col
    }

    pub fn record(&self, pos: usize) -> Option<&Record> {
        self.records.get(pos)
    }

    pub fn value(&self, pos: usize, col: usize) -> Option<&Value> {
        self.records.get(pos).and_then(|r| r.values.get(col))
    }

    /// Name of the record at `pos`, if present and textual.
    pub fn name(&self, pos: usize) -> Option<&str> {
        self.value(pos, self.name_col).and_then(Value::as_str)
    }

    /// Overwrite one field. Returns the previous value.
    ///
    /// Callers are expected to have coerced `value` to the column's type.
    pub fn set_value(&mut self, pos: usize, col: usize, value: Value) -> Option<Value> {
        let slot = self.records.get_mut(pos)?.values.get_mut(col)?;
        Some(std::mem::replace(slot, value))
    }

    /// Independent copy for hand-off to background work.
    pub fn snapshot(&self) -> RecordSet {
        self.clone()
    }
}
