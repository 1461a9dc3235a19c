//! Key-value string stores
//!
//! The learner's data lives in a flat map of string keys to string values,
//! most of them JSON blobs. Writes are synchronous and not transactional:
//! two processes sharing a store file race, and the last write wins.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tempfile::NamedTempFile;

use super::error::StoreError;
use crate::config::Config;

/// A flat string key-value store
pub trait KeyValueStore {
    /// Read the value under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;

    /// Remove `key`, returning whether it existed
    fn remove(&mut self, key: &str) -> Result<bool, StoreError>;

    /// All keys currently stored
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Store backed by a single JSON file, written through on every mutation
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// File name of the store inside the data directory
    pub const FILE_NAME: &'static str = "storage.json";

    /// Open the store at `path`, starting empty if the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)
                .map_err(|source| StoreError::Io { path: path.clone(), source })?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)
                    .map_err(|source| StoreError::Corrupt { path: path.clone(), source })?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = ?path, keys = entries.len(), "Opened store");
        Ok(Self { path, entries })
    }

    /// Open the store in the default data directory
    pub fn open_default() -> anyhow::Result<Self> {
        let path = Config::data_dir()?.join(Self::FILE_NAME);
        Self::open(&path).with_context(|| format!("Failed to open store at {:?}", path))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the whole map to disk atomically (temp file + rename)
    fn flush(&self) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io { path: self.path.clone(), source };

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(io_err)?;

        let contents = serde_json::to_string_pretty(&self.entries)
            .map_err(|source| StoreError::Corrupt { path: self.path.clone(), source })?;

        let mut tmp = NamedTempFile::new_in(&parent).map_err(io_err)?;
        tmp.write_all(contents.as_bytes()).map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        let existed = self.entries.remove(key).is_some();
        if existed {
            self.flush()?;
        }
        Ok(existed)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_set_get_remove() {
        let mut store = MemoryStore::new();
        store.set("a", "1".into()).unwrap();
        assert_eq!(store.get("a").unwrap(), Some("1".into()));
        assert!(store.remove("a").unwrap());
        assert!(!store.remove("a").unwrap());
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn file_store_persists_across_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("topics", "{}".into()).unwrap();
        store.set("hardnessIndex", "1.2".into()).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("hardnessIndex").unwrap(), Some("1.2".into()));
        assert_eq!(reopened.keys().unwrap(), vec!["hardnessIndex", "topics"]);
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("none.json")).unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn file_store_rejects_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(FileStore::open(&path), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn file_store_remove_writes_through() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        let mut store = FileStore::open(&path).unwrap();
        store.set("k", "v".into()).unwrap();
        assert!(store.remove("k").unwrap());

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap(), None);
    }
}
