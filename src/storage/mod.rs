//! Persistent key-value storage module
//! 
//! This module contains the storage abstraction the session controller
//! persists its snapshot through, plus file and in-memory backends.

pub mod store;
pub mod file_store;

// Re-export main types
pub use store::{KeyValueStore, MemoryStore, StorageError};
pub use file_store::FileStore;
