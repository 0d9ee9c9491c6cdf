#![forbid(unsafe_code)]
//! recsift-store: persistence gateway for cleaned record sets.
//!
//! A `RecordStore` accepts a whole record set at once and can read every
//! stored row back. `SqliteStore` is the only implementation; one send is one
//! transaction, so either every row of it lands or none does.

pub mod error;
pub mod sqlite;
pub mod table;

use std::collections::BTreeMap;

use recsift_core::types::{RecordSet, Value};

pub use error::{Result, StoreError};
pub use sqlite::SqliteStore;
pub use table::{ColumnSpec, SqlType, TableSpec};

/// One row as read back from storage, keyed by stored column name.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
    pub id: i64,
    pub values: BTreeMap<String, Value>,
}

impl StoredRow {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }
}

pub trait RecordStore: Send + Sync {
    /// Insert every record of `records`. Returns the number of rows written.
    fn insert_all(&self, records: &RecordSet) -> Result<usize>;

    /// Every stored row, in insertion order.
    fn fetch_all(&self) -> Result<Vec<StoredRow>>;

    /// Total number of stored rows.
    fn count(&self) -> Result<u64>;

    /// Log every stored row at debug level and return the total count.
    fn readback(&self) -> Result<u64> {
        for row in self.fetch_all()? {
            let fields: Vec<String> = row
                .values
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            tracing::debug!(id = row.id, row = %fields.join(", "), "stored row");
        }
        let total = self.count()?;
        tracing::info!(total, "stored row count");
        Ok(total)
    }
}
