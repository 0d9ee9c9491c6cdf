//! Application configuration that downstream crates can serialize/deserialize.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file the cleaned set is sent to.
    pub db_path: String,

    /// Table the records are inserted into.
    pub table: String,

    /// Header of the column that identifies a person.
    pub name_column: String,

    /// Quiet period before a changed search fragment is applied.
    pub search_debounce_ms: u64,

    /// Field delimiter of the input file.
    pub delimiter: u8,

    /// Infer undeclared column types from the first non-blank value.
    pub infer_types: bool,

    /// Optional YAML file with explicit column type declarations.
    pub schema_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: "healthcare.db".to_string(),
            table: "people".to_string(),
            name_column: "Name".to_string(),
            search_debounce_ms: 300,
            delimiter: b',',
            infer_types: false,
            schema_path: None,
        }
    }
}

impl AppConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `RECSIFT_DB_PATH`: SQLite database file
    /// - `RECSIFT_TABLE`: destination table
    /// - `RECSIFT_NAME_COLUMN`: header of the name column
    /// - `RECSIFT_DEBOUNCE_MS`: search debounce in milliseconds
    /// - `RECSIFT_DELIMITER`: single-byte field delimiter
    /// - `RECSIFT_INFER_TYPES`: `1`/`true` to infer undeclared column types
    /// - `RECSIFT_SCHEMA`: path to a YAML type declaration
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("RECSIFT_DB_PATH") {
            cfg.db_path = s;
        }

        if let Ok(s) = std::env::var("RECSIFT_TABLE") {
            cfg.table = s;
        }

        if let Ok(s) = std::env::var("RECSIFT_NAME_COLUMN") {
            cfg.name_column = s;
        }

        if let Ok(s) = std::env::var("RECSIFT_DEBOUNCE_MS") {
            if let Ok(v) = s.parse::<u64>() {
                cfg.search_debounce_ms = v;
            }
        }

        if let Ok(s) = std::env::var("RECSIFT_DELIMITER") {
            if let Some(b) = parse_delimiter(&s) {
                cfg.delimiter = b;
            }
        }

        if let Ok(s) = std::env::var("RECSIFT_INFER_TYPES") {
            cfg.infer_types = matches!(s.trim(), "1" | "true" | "yes");
        }

        if let Ok(s) = std::env::var("RECSIFT_SCHEMA") {
            cfg.schema_path = Some(s);
        }

        cfg
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

/// Accepts a single ASCII character, or the escapes `\t` and `tab`.
pub fn parse_delimiter(s: &str) -> Option<u8> {
    match s {
        "\\t" | "tab" => Some(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => s.bytes().next(),
        _ => None,
    }
}
