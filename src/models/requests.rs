//! Request DTOs for the cache server API
//!
//! Defines the query parameters accepted by the cache endpoints.

use serde::Deserialize;

use crate::cache::validate_key;
use crate::error::CacheError;

/// Query parameters for the PUT operation (PUT /cache/put)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: The integer value to store
#[derive(Debug, Clone, Deserialize)]
pub struct PutParams {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: i64,
}

impl PutParams {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key).err().map(|err| match err {
            CacheError::InvalidRequest(msg) => msg,
            other => other.to_string(),
        })
    }
}

/// Query parameters naming a single key (GET /cache/get, DELETE /cache/del)
#[derive(Debug, Clone, Deserialize)]
pub struct KeyParams {
    /// The cache key
    pub key: String,
}

impl KeyParams {
    /// Validates the request data
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_params_deserialize() {
        let json = r#"{"key": "test", "value": 42}"#;
        let params: PutParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.key, "test");
        assert_eq!(params.value, 42);
    }

    #[test]
    fn test_validate_empty_key() {
        let params = PutParams {
            key: "".to_string(),
            value: 1,
        };
        assert!(params.validate().is_some());
        assert!(KeyParams { key: "".into() }.validate().is_some());
    }

    #[test]
    fn test_validate_key_with_separator() {
        let params = PutParams {
            key: "a,b".to_string(),
            value: 1,
        };
        assert!(params.validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        let params = PutParams {
            key: "valid_key".to_string(),
            value: -3,
        };
        assert!(params.validate().is_none());
        assert!(KeyParams { key: "valid_key".into() }.validate().is_none());
    }
}
