//! blake3 fingerprints used while cleaning a load.
//!
//! `row_fingerprint` keys the exact-duplicate pass over raw rows.
//! `record_digest` identifies a cleaned record set in its `LoadReport`: two
//! loads that clean to the same records report the same digest.

use std::fmt;

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::RecordSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Fingerprint of a whole raw row. Each field is length-prefixed so that
/// `["ab", "c"]` and `["a", "bc"]` never collide.
pub fn row_fingerprint<S: AsRef<str>>(fields: &[S]) -> Hash256 {
    let mut h = Hasher::new();
    h.update(&(fields.len() as u64).to_le_bytes());
    for field in fields {
        let bytes = field.as_ref().as_bytes();
        h.update(&(bytes.len() as u64).to_le_bytes());
        h.update(bytes);
    }
    Hash256(h.finalize().into())
}

/// Digest of a cleaned record set: schema, ids and typed values.
pub fn record_digest(records: &RecordSet) -> Result<Hash256> {
    let json = serde_json::to_vec(records)?;
    Ok(Hash256(blake3::hash(&json).into()))
}
