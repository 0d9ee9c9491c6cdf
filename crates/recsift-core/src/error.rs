use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Hashing error: {0}")]
    Hash(String),
}

/// Problems with the shape of an input table. Fatal to the load that hit them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("the '{0}' column is missing from the input")]
    MissingNameColumn(String),

    #[error("column '{0}' has no declared type")]
    UndeclaredColumn(String),

    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("unknown data type '{0}'")]
    UnknownType(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Hash(e.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Config(e.to_string())
    }
}
