use async_trait::async_trait;
use thiserror::Error;

use crate::shared::validation::STORAGE_KEY_REGEX;

/// Errors raised by a key-value storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage quota exceeded writing '{key}': {needed} bytes needed, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("Storage I/O failed for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// String key-value storage with whole-value reads and writes
///
/// A `set` either replaces the stored value completely or fails and
/// leaves the previous value in place.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read the value under `key`, `None` when it was never set
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Reject keys that cannot be mapped safely onto a file name
pub(super) fn check_key(key: &str) -> Result<(), StorageError> {
    if STORAGE_KEY_REGEX.is_match(key) {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Bytes a single entry counts against the quota
pub(super) fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}
