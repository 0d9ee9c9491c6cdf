//! Convenient re-exports for downstream crates.

pub use crate::config::AppConfig;
pub use crate::declaration::TypeDeclaration;
pub use crate::error::{Error, Result, SchemaError};
pub use crate::id::RecordId;
pub use crate::schema::{storage_key, DataType, Field, Schema};
pub use crate::types::{RawTable, Record, RecordSet, Value};
