//! Destination table definition.
//!
//! Stored column names are the record set's headers lower-cased with spaces
//! removed (`storage_key`). The `id` column is an autoincrementing key that
//! is never written from a record set.

use recsift_core::schema::storage_key;

use crate::error::{Result, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Text,
    Date,
}

impl SqlType {
    fn ddl(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Text => "TEXT",
            SqlType::Date => "DATE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub sql_type: SqlType,
}

impl ColumnSpec {
    pub fn new(name: &str, sql_type: SqlType) -> Self {
        Self {
            name: name.to_string(),
            sql_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    name: String,
    columns: Vec<ColumnSpec>,
}

impl TableSpec {
    pub fn new(name: &str, columns: Vec<ColumnSpec>) -> Result<Self> {
        check_identifier(name)?;
        for col in &columns {
            check_identifier(&col.name)?;
        }
        Ok(Self {
            name: name.to_string(),
            columns,
        })
    }

    /// The admissions table.
    pub fn people(name: &str) -> Result<Self> {
        use SqlType::*;
        Self::new(
            name,
            vec![
                ColumnSpec::new("name", Text),
                ColumnSpec::new("age", Integer),
                ColumnSpec::new("gender", Text),
                ColumnSpec::new("bloodtype", Text),
                ColumnSpec::new("medicalcondition", Text),
                ColumnSpec::new("dateofadmission", Date),
                ColumnSpec::new("doctor", Text),
                ColumnSpec::new("hospital", Text),
                ColumnSpec::new("insuranceprovider", Text),
                ColumnSpec::new("billingamount", Integer),
                ColumnSpec::new("roomnumber", Integer),
                ColumnSpec::new("admissiontype", Text),
                ColumnSpec::new("dischargedate", Date),
                ColumnSpec::new("medication", Text),
                ColumnSpec::new("testresults", Text),
            ],
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Table column a record-set header maps to.
    pub fn column_for(&self, header: &str) -> Option<&ColumnSpec> {
        let key = storage_key(header);
        self.columns.iter().find(|c| c.name == key)
    }

    pub fn create_sql(&self) -> String {
        let cols: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.sql_type.ddl()))
            .collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY AUTOINCREMENT, {})",
            self.name,
            cols.join(", ")
        )
    }

    pub fn insert_sql(&self, columns: &[&str]) -> String {
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.name,
            columns.join(", "),
            placeholders.join(", ")
        )
    }

    pub fn select_sql(&self) -> String {
        let cols: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        format!(
            "SELECT id, {} FROM {} ORDER BY id",
            cols.join(", "),
            self.name
        )
    }
}

/// Identifiers are spliced into SQL text, so only `[A-Za-z_][A-Za-z0-9_]*`.
fn check_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}
