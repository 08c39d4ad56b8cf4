//! Storage module for the local key-value store
//!
//! Provides a small string key-value abstraction with a quota, in the
//! spirit of browser local storage, backed by disk.

mod file_storage;
mod key_value;
#[cfg(test)]
mod memory_storage;

pub use file_storage::FileStorage;
pub use key_value::{KeyValueStorage, StorageError};
#[cfg(test)]
pub use memory_storage::MemoryStorage;
