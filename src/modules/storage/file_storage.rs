//! Disk-backed key-value storage
//!
//! Each key is stored as `<dir>/<key>.json`. Writes go to a temporary file
//! first and are renamed into place, so a failed write never leaves a
//! half-written value behind.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::key_value::{check_key, entry_size, KeyValueStorage, StorageError};
use crate::core::config::StorageConfig;

const VALUE_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "tmp";

pub struct FileStorage {
    dir: PathBuf,
    quota_bytes: usize,
}

impl FileStorage {
    /// Open (and create if missing) the storage directory
    pub async fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        tokio::fs::create_dir_all(&config.dir)
            .await
            .map_err(|source| StorageError::Io {
                key: config.dir.display().to_string(),
                source,
            })?;

        info!(
            "File storage opened at {} (quota: {} bytes)",
            config.dir.display(),
            config.quota_bytes
        );

        Ok(Self {
            dir: config.dir.clone(),
            quota_bytes: config.quota_bytes,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, VALUE_EXTENSION))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, TEMP_EXTENSION))
    }

    /// Bytes currently held by every key except `skip_key`
    async fn usage_excluding(&self, skip_key: &str) -> Result<usize, StorageError> {
        let io_err = |source| StorageError::Io {
            key: skip_key.to_string(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(io_err)?;
        let mut total = 0usize;

        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(VALUE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem == skip_key {
                continue;
            }
            let len = entry.metadata().await.map_err(io_err)?.len() as usize;
            total += stem.len() + len;
        }

        Ok(total)
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        check_key(key)?;

        match tokio::fs::read_to_string(self.value_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Storage key '{}' not set", key);
                Ok(None)
            }
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        check_key(key)?;

        let needed = self.usage_excluding(key).await? + entry_size(key, value);
        if needed > self.quota_bytes {
            warn!(
                "Refusing write to '{}': {} bytes needed, quota is {}",
                key, needed, self.quota_bytes
            );
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                needed,
                quota: self.quota_bytes,
            });
        }

        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        let temp = self.temp_path(key);
        tokio::fs::write(&temp, value).await.map_err(io_err)?;
        if let Err(source) = tokio::fs::rename(&temp, self.value_path(key)).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(io_err(source));
        }

        debug!("Stored {} bytes under '{}'", value.len(), key);
        Ok(())
    }
}
