use recsift_core::error::{Error as CoreError, SchemaError};
use thiserror::Error;

use crate::validate::Rejection;

#[derive(Debug, Error)]
pub enum OpError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    Rejected(#[from] Rejection),

    #[error("no cell at row {row}, column {column}")]
    OutOfRange { row: usize, column: usize },

    #[error(transparent)]
    Core(#[from] CoreError),
}
