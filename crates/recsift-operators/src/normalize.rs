//! Load-time cleaning: raw rows in, a deduplicated typed `RecordSet` out.
//!
//! Steps, in order:
//! 1. drop rows that repeat an earlier row field for field,
//! 2. drop rows whose title-cased name repeats an earlier one,
//! 3. title-case every name,
//! 4. number the survivors `1..=N`,
//! 5. coerce every column to its type; "date" columns become calendar dates.
//!
//! Unparseable values become `Value::Null` and are counted, never fatal.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use recsift_core::declaration::TypeDeclaration;
use recsift_core::error::SchemaError;
use recsift_core::hash::{record_digest, row_fingerprint, Hash256};
use recsift_core::schema::{is_date_column, DataType, Field, Schema};
use recsift_core::temporal::parse_date;
use recsift_core::types::{RawTable, RecordSet, Value};

use crate::error::OpError;

/// What a load did to the input, for logging and display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub initial_rows: usize,
    pub exact_duplicates: usize,
    pub name_duplicates: usize,
    pub final_rows: usize,
    /// Non-blank values per column that did not fit the column's type.
    pub coercion_failures: BTreeMap<String, usize>,
    pub digest: Hash256,
}

#[derive(Debug, Clone)]
pub struct Normalized {
    pub records: RecordSet,
    pub report: LoadReport,
}

pub struct Normalizer<'a> {
    declaration: &'a TypeDeclaration,
    name_column: String,
    infer_types: bool,
}

impl<'a> Normalizer<'a> {
    pub fn new(declaration: &'a TypeDeclaration) -> Self {
        Self {
            declaration,
            name_column: "Name".to_string(),
            infer_types: false,
        }
    }

    pub fn name_column(mut self, name: impl Into<String>) -> Self {
        self.name_column = name.into();
        self
    }

    /// Allow columns missing from the declaration; their type comes from the
    /// first non-blank value.
    pub fn infer_types(mut self, on: bool) -> Self {
        self.infer_types = on;
        self
    }

    /// Settle the type of every input column.
    pub fn resolve_schema(&self, raw: &RawTable) -> Result<Schema, SchemaError> {
        let name_idx = raw
            .column_index(&self.name_column)
            .ok_or_else(|| SchemaError::MissingNameColumn(self.name_column.clone()))?;

        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(raw.headers.len());
        for (idx, header) in raw.headers.iter().enumerate() {
            if !seen.insert(header.as_str()) {
                return Err(SchemaError::DuplicateColumn(header.clone()));
            }
            let data_type = if idx == name_idx {
                DataType::Utf8
            } else if is_date_column(header) {
                DataType::Date
            } else if let Some(dt) = self.declaration.lookup(header) {
                dt
            } else if self.infer_types {
                infer_column(raw, idx)
            } else {
                return Err(SchemaError::UndeclaredColumn(header.clone()));
            };
            fields.push(Field::new(header.clone(), data_type));
        }
        Ok(Schema::new(fields))
    }

    pub fn run(&self, raw: &RawTable) -> Result<Normalized, OpError> {
        let schema = self.resolve_schema(raw)?;
        let name_idx = schema
            .find(&self.name_column)
            .ok_or_else(|| SchemaError::MissingNameColumn(self.name_column.clone()))?;

        let initial_rows = raw.num_rows();

        // every row is read at header width; short rows read as blank cells
        let width = raw.headers.len();
        let cells: Vec<Vec<&str>> = (0..initial_rows)
            .map(|row| (0..width).map(|col| raw.cell(row, col)).collect())
            .collect();

        // 1. exact full-row duplicates
        let mut fingerprints = HashSet::with_capacity(initial_rows);
        let unique_rows: Vec<&Vec<&str>> = cells
            .iter()
            .filter(|row| fingerprints.insert(row_fingerprint(row.as_slice())))
            .collect();
        let exact_duplicates = initial_rows - unique_rows.len();

        // 2 + 3. unique by canonical name, first occurrence wins
        let mut names: HashSet<Option<String>> = HashSet::with_capacity(unique_rows.len());
        let mut kept: Vec<(Option<String>, &Vec<&str>)> = Vec::with_capacity(unique_rows.len());
        for row in unique_rows.iter().copied() {
            let name = canonical_name(row[name_idx]);
            if names.insert(name.clone()) {
                kept.push((name, row));
            }
        }
        let name_duplicates = unique_rows.len() - kept.len();

        // 5. typed values
        let mut coercion_failures: BTreeMap<String, usize> = BTreeMap::new();
        let mut rows = Vec::with_capacity(kept.len());
        for (name, raw_row) in kept {
            let mut values = Vec::with_capacity(schema.len());
            for (idx, field) in schema.fields.iter().enumerate() {
                if idx == name_idx {
                    values.push(name.clone().map(Value::Str).unwrap_or(Value::Null));
                    continue;
                }
                let text = raw_row[idx];
                match coerce(text, field.data_type) {
                    Some(v) => values.push(v),
                    None => {
                        if !text.trim().is_empty() {
                            *coercion_failures.entry(field.name.clone()).or_default() += 1;
                        }
                        values.push(Value::Null);
                    }
                }
            }
            rows.push(values);
        }

        // 4. fresh identifiers
        let name_header = schema.fields[name_idx].name.clone();
        let records = RecordSet::new(schema, rows, &name_header)?;
        let digest = record_digest(&records)?;

        for (column, count) in &coercion_failures {
            tracing::warn!(%column, count, "values did not fit the column type and were cleared");
        }
        tracing::info!(initial_rows, "initial length of the table");
        tracing::info!(final_rows = records.len(), "final length of the table");

        let report = LoadReport {
            initial_rows,
            exact_duplicates,
            name_duplicates,
            final_rows: records.len(),
            coercion_failures,
            digest,
        };
        Ok(Normalized { records, report })
    }
}

/// Title-cased name, or `None` for a blank field.
fn canonical_name(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(title_case(text))
    }
}

/// Title-case a name: a cased letter that follows another cased letter is
/// lower-cased, every other cased letter is upper-cased.
/// So `"o'neil"` becomes `"O'Neil"` and `"mary-jane"` becomes `"Mary-Jane"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_cased = false;
    for ch in text.chars() {
        let cased = ch.is_lowercase() || ch.is_uppercase();
        if cased && prev_cased {
            out.extend(ch.to_lowercase());
        } else if cased {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        prev_cased = cased;
    }
    out
}

/// Parse one raw field as `data_type`. `None` when blank or unparseable.
pub fn coerce(text: &str, data_type: DataType) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match data_type {
        DataType::Int64 => trimmed.parse::<i64>().ok().map(Value::Int),
        DataType::Float64 => trimmed.parse::<f64>().ok().map(Value::Float),
        DataType::Date => parse_date(trimmed).map(Value::Date),
        DataType::Boolean => match trimmed.to_lowercase().as_str() {
            "true" | "yes" => Some(Value::Bool(true)),
            "false" | "no" => Some(Value::Bool(false)),
            _ => None,
        },
        DataType::Utf8 => Some(Value::Str(text.to_string())),
    }
}

/// Type suggested by the first non-blank value of column `col`.
fn infer_column(raw: &RawTable, col: usize) -> DataType {
    let first = (0..raw.num_rows())
        .map(|row| raw.cell(row, col).trim())
        .find(|text| !text.is_empty());
    match first {
        Some(text) if text.parse::<i64>().is_ok() => DataType::Int64,
        Some(text) if text.parse::<f64>().is_ok() => DataType::Float64,
        _ => DataType::Utf8,
    }
}
