//! Directory-backed store, one file per key

use std::{fs, path::PathBuf};
use tracing::debug;

use super::{KeyValueStore, StorageError};

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default location: `<data_dir>/nightlight`
    pub fn default_dir() -> PathBuf {
        let mut p = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("nightlight");
        p
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // keys are fixed names, but keep them from escaping the directory
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(data) => Some(data),
            Err(e) => {
                debug!("No stored value at {}: {}", path.display(), e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("nightlight-state"), None);
    }

    #[test]
    fn writes_create_directory_and_persist() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        store.set("nightlight-state", "{\"volume\":0.5}").unwrap();

        let reopened = FileStore::new(dir.path().join("nested"));
        assert_eq!(
            reopened.get("nightlight-state").as_deref(),
            Some("{\"volume\":0.5}")
        );
        assert!(dir.path().join("nested/nightlight-state.json").exists());
    }

    #[test]
    fn keys_cannot_escape_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("../evil", "x").unwrap();
        assert!(dir.path().join("___evil.json").exists());
    }
}
