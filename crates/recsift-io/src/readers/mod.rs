//! Readers producing `RawTable`s.

pub mod csv;
