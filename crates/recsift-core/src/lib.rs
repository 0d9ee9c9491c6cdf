#![forbid(unsafe_code)]
//! recsift-core: values, schemas, record sets, and shared configuration.
//!
//! Everything here is pure data. Reading files, talking to SQLite, and
//! running background work live in the downstream crates.

pub mod config;
pub mod declaration;
pub mod error;
pub mod hash;
pub mod id;
pub mod prelude;
pub mod schema;
pub mod temporal;
pub mod types;
