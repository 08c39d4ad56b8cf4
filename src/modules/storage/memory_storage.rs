use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::key_value::{check_key, entry_size, KeyValueStorage, StorageError};

/// In-process key-value storage for tests
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that refuses writes pushing total usage above `quota_bytes`
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        check_key(key)?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        check_key(key)?;
        let mut entries = self.entries.write().await;

        if let Some(quota) = self.quota_bytes {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| entry_size(k, v))
                .sum();
            let needed = others + entry_size(key, value);
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unbounded_storage_accepts_writes() {
        let storage = MemoryStorage::new();
        storage.set("bmc_reports", "[]").await.unwrap();
        assert_eq!(
            storage.get("bmc_reports").await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_quota_is_enforced() {
        let storage = MemoryStorage::with_quota(16);
        assert!(storage.set("k", "small").await.is_ok());
        assert!(matches!(
            storage.set("k", &"z".repeat(32)).await,
            Err(StorageError::QuotaExceeded { .. })
        ));
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("small"));
    }
}
