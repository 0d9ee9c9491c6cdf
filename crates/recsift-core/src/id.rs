//! Record identifiers.
//!
//! Identifiers are positional and 1-based. They are handed out fresh on every
//! load and are never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub const fn new(v: u64) -> Self {
        Self(v)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Identifier for the record at zero-based position `pos`.
    pub const fn from_position(pos: usize) -> Self {
        Self(pos as u64 + 1)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
