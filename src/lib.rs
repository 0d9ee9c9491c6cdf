//! recsift: load, clean, search, edit, and store tabular person records.
//!
//! This package re-exports the workspace crates under one roof.

pub use recsift_core as core;
pub use recsift_exec as exec;
pub use recsift_io as io;
pub use recsift_operators as operators;
pub use recsift_store as store;
