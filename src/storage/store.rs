//! Key-value store trait and in-memory backend

use std::{collections::HashMap, sync::Mutex};

/// Errors a store can report on write
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage is read-only")]
    ReadOnly,

    #[error("storage lock poisoned")]
    Poisoned,

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A string-keyed store of string values
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store, mostly useful for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    read_only: bool,
}

impl MemoryStore {
    /// Create an empty writable store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `value` under `key`
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        store
    }

    /// Make every subsequent write fail, the way a full quota does
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::ReadOnly);
        }
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
