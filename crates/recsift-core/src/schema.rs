//! Logical schema types. Pure data.
//!
//! A column's `DataType` is settled once, when a table is loaded, and every
//! later edit is coerced back to it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int64,
    Float64,
    Date,
    Utf8,
}

impl DataType {
    /// Name shown to users when an edit is refused.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Boolean => "bool",
            DataType::Int64 => "int",
            DataType::Float64 => "float",
            DataType::Date => "date",
            DataType::Utf8 => "str",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Boolean" | "bool" | "boolean" => Ok(DataType::Boolean),
            "Int64" | "i64" | "int" | "integer" => Ok(DataType::Int64),
            "Float64" | "f64" | "float" | "real" => Ok(DataType::Float64),
            "Date" | "date" => Ok(DataType::Date),
            "Utf8" | "str" | "string" | "text" => Ok(DataType::Utf8),
            other => Err(SchemaError::UnknownType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Case- and surrounding-whitespace-insensitive lookup.
    pub fn find(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.fields
            .iter()
            .position(|f| f.name.trim().to_lowercase() == wanted)
    }

    pub fn names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }
}

/// Column key used for type declarations and storage: lower-cased with all
/// whitespace removed, so `"Date of Admission"` becomes `"dateofadmission"`.
pub fn storage_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Columns whose header mentions "date" always hold calendar dates.
pub fn is_date_column(name: &str) -> bool {
    name.to_lowercase().contains("date")
}
