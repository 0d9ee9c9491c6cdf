use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};

use recsift_core::temporal::parse_date;
use recsift_core::types::{RecordSet, Value};

use crate::error::{Result, StoreError};
use crate::table::{SqlType, TableSpec};
use crate::{RecordStore, StoredRow};

const BUSY_TIMEOUT_MS: u64 = 5_000;

/// SQLite-backed record store. Cheap to clone; clones share one connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    table: TableSpec,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("table", &self.table.name())
            .finish()
    }
}

impl SqliteStore {
    /// Open (or create) a database file and make sure the table exists.
    pub fn open_path(path: impl AsRef<Path>, table: TableSpec) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.busy_timeout(std::time::Duration::from_millis(BUSY_TIMEOUT_MS))?;
        tracing::debug!(path = %path.as_ref().display(), table = table.name(), "opened store");
        Self::init(conn, table)
    }

    pub fn open_in_memory(table: TableSpec) -> Result<Self> {
        Self::init(Connection::open_in_memory()?, table)
    }

    fn init(conn: Connection, table: TableSpec) -> Result<Self> {
        conn.execute_batch(&table.create_sql())?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            table,
        })
    }

    pub fn table(&self) -> &TableSpec {
        &self.table
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Destination column for every record-set column, in schema order.
    fn column_mapping(&self, records: &RecordSet) -> Result<Vec<&str>> {
        records
            .schema()
            .fields
            .iter()
            .map(|f| {
                self.table
                    .column_for(&f.name)
                    .map(|c| c.name.as_str())
                    .ok_or_else(|| StoreError::UnknownColumn(f.name.clone()))
            })
            .collect()
    }
}

impl RecordStore for SqliteStore {
    fn insert_all(&self, records: &RecordSet) -> Result<usize> {
        let columns = self.column_mapping(records)?;
        if records.is_empty() {
            return Ok(0);
        }

        let sql = self.table.insert_sql(&columns);
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(&sql)?;
            for record in records.records() {
                stmt.execute(params_from_iter(record.values.iter().map(to_sql)))?;
            }
        }
        tx.commit()?;

        tracing::info!(rows = records.len(), table = self.table.name(), "insert successful");
        Ok(records.len())
    }

    fn fetch_all(&self) -> Result<Vec<StoredRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&self.table.select_sql())?;
        let columns = self.table.columns();

        let rows = stmt.query_map([], |row| {
            let id: i64 = row.get(0)?;
            let mut values = std::collections::BTreeMap::new();
            for (i, col) in columns.iter().enumerate() {
                let raw: SqlValue = row.get(i + 1)?;
                values.insert(col.name.clone(), from_sql(raw, col.sql_type));
            }
            Ok(StoredRow { id, values })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn count(&self) -> Result<u64> {
        let conn = self.lock()?;
        let sql = format!("SELECT COUNT(*) FROM {}", self.table.name());
        let n: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(n.max(0) as u64)
    }
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Int(i) => SqlValue::Integer(*i),
        Value::Float(f) => SqlValue::Real(*f),
        Value::Date(d) => SqlValue::Text(d.format("%Y-%m-%d").to_string()),
        Value::Str(s) => SqlValue::Text(s.clone()),
    }
}

fn from_sql(raw: SqlValue, declared: SqlType) -> Value {
    match raw {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::Int(i),
        SqlValue::Real(f) => Value::Float(f),
        SqlValue::Text(s) if declared == SqlType::Date => {
            parse_date(&s).map(Value::Date).unwrap_or(Value::Str(s))
        }
        SqlValue::Text(s) => Value::Str(s),
        SqlValue::Blob(b) => Value::Str(String::from_utf8_lossy(&b).into_owned()),
    }
}
