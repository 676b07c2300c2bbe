//! Cache Entry Module
//!
//! Defines the key/value pair shared by the slot table and the eviction list.

use crate::cache::MAX_KEY_LENGTH;
use crate::error::{CacheError, Result};

// == Cache Entry ==
/// A single resident key/value pair.
///
/// Both the slot table and the eviction list hold a copy of the same logical
/// entry; the store keeps the two in step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The cache key
    pub key: String,
    /// The stored value
    pub value: i64,
}

impl Entry {
    // == Constructor ==
    /// Creates a new entry.
    pub fn new(key: impl Into<String>, value: i64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

// == Key Validation ==
/// Checks that a key can be stored and written to the operation log.
///
/// Keys are comma separated fields of a line-oriented log, so separators and
/// line breaks are rejected along with empty and oversized keys.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidRequest(
            "Key cannot be empty".to_string(),
        ));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    if key.contains([',', '\n', '\r']) {
        return Err(CacheError::InvalidRequest(
            "Key cannot contain commas or line breaks".to_string(),
        ));
    }
    Ok(())
}
