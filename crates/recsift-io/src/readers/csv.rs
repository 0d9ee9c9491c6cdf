//! Delimited-text reader.
//!
//! Headers are whitespace-trimmed. Rows shorter than the header are padded
//! with empty fields and longer rows are cut to the header width, so every
//! row in the resulting `RawTable` has exactly one field per column.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use recsift_core::types::RawTable;

use crate::error::{Error, Result};

pub struct CsvReader {
    delimiter: u8,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvReader {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<RawTable> {
        let f = File::open(path)?;
        self.read(f)
    }

    pub fn read<R: Read>(&self, reader: R) -> Result<RawTable> {
        let mut rdr = ::csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(Error::MissingHeader);
        }

        let width = headers.len();
        let mut rows = Vec::new();
        for rec in rdr.records() {
            let rec = rec?;
            let mut row: Vec<String> = rec.iter().take(width).map(str::to_string).collect();
            row.resize(width, String::new());
            rows.push(row);
        }

        Ok(RawTable::new(headers, rows))
    }
}
