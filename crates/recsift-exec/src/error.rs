use thiserror::Error;

use recsift_operators::OpError;
use recsift_store::StoreError;

use crate::worker::OperationKind;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a {0} is already in progress")]
    Busy(OperationKind),

    #[error("Please load a CSV file first!")]
    NotLoaded,

    #[error("read error: {0}")]
    Io(#[from] recsift_io::Error),

    #[error(transparent)]
    Op(#[from] OpError),

    #[error("config error: {0}")]
    Config(#[from] recsift_core::error::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("failed to start {kind} worker: {source}")]
    Spawn {
        kind: OperationKind,
        #[source]
        source: std::io::Error,
    },
}
