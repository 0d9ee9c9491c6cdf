#![forbid(unsafe_code)]
//! recsift-io: readers that turn delimited files into `RawTable`s.
//!
//! Nothing here interprets values. Typing, dedup, and normalization happen in
//! `recsift-operators`.

pub mod error;
pub mod readers;

pub use error::{Error, Result};
pub use readers::csv::CsvReader;
