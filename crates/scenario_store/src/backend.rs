//! Key-value backends for the scenario collection.
//!
//! A backend only stores whole string values under string keys. Writes
//! replace the previous value entirely; nothing is ever patched in place.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

pub trait KeyValueStore {
    /// Returns `None` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        // Write to a sibling temp file, then rename over the old value
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

/// In-memory backend. An optional byte quota over all stored values mimics
/// browser storage limits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(quota),
        }
    }

    /// Seeds a raw value, bypassing the quota.
    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota {
            let others: usize = self
                .entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            let size = others + value.len();
            if size > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    size,
                    quota,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get("scenarios").unwrap(), None);
        store.set("scenarios", "[1]").unwrap();
        store.set("scenarios", "[1,2]").unwrap();
        assert_eq!(store.get("scenarios").unwrap().as_deref(), Some("[1,2]"));
        assert!(dir.path().join("nested/scenarios.json").exists());
        assert!(!dir.path().join("nested/scenarios.json.tmp").exists());
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        for key in ["", "../escape", "a/b", ".hidden", "sp ace"] {
            assert!(matches!(
                store.set(key, "x"),
                Err(StoreError::InvalidKey(_))
            ));
        }
        assert!(store.set("multifamily_roi-scenarios.v1", "x").is_ok());
    }

    #[test]
    fn test_memory_store_quota() {
        let mut store = MemoryStore::with_quota(10);
        store.set("a", "12345").unwrap();
        store.set("b", "12345").unwrap();
        // Replacing a value only counts the new size
        store.set("a", "54321").unwrap();

        let err = store.set("c", "1").unwrap_err();
        assert!(matches!(
            err,
            StoreError::QuotaExceeded { size: 11, quota: 10, .. }
        ));
        assert_eq!(store.get("c").unwrap(), None);
        assert_eq!(store.raw("a"), Some("54321"));
    }
}
