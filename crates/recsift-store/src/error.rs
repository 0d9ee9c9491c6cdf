use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("column '{0}' has no counterpart in the destination table")]
    UnknownColumn(String),

    #[error("'{0}' is not a valid table identifier")]
    InvalidIdentifier(String),

    #[error("store connection lock poisoned")]
    Poisoned,
}
