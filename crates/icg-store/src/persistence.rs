//! Key/value persistence port
//!
//! Every persisted entry is a JSON document under a string key. Backends
//! only move strings around; encoding lives in [`read_json`]/[`write_json`].

use icg_core::{IcgError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Persisted entry names
pub mod keys {
    pub const BUILD_DATA: &str = "buildData";
    pub const INSTALL_CODES: &str = "installCodes";
    pub const ADDON_DATA: &str = "addonData";
    pub const ADDON_DESCRIPTIONS: &str = "addonDescriptionsData";
    pub const BUILD_NOTES: &str = "buildCustomDescriptions";
    pub const ADDON_NOTES: &str = "addonCustomDescriptions";
    pub const LAST_UPDATED: &str = "lastUpdated";

    /// Entries owned by the ingested dataset, in write order
    pub const DATASET: [&str; 5] = [
        BUILD_DATA,
        INSTALL_CODES,
        ADDON_DATA,
        ADDON_DESCRIPTIONS,
        LAST_UPDATED,
    ];

    /// Dataset entries in removal order. `buildData` marks a saved dataset,
    /// so it goes last: a partial clear still leaves a loadable dataset.
    pub const CLEAR_ORDER: [&str; 5] = [
        LAST_UPDATED,
        ADDON_DESCRIPTIONS,
        ADDON_DATA,
        INSTALL_CODES,
        BUILD_DATA,
    ];
}

/// String key/value storage
pub trait KeyValueStore {
    /// Read an entry; `Ok(None)` when absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write an entry, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete an entry; absent entries are not an error
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Decode a JSON entry
pub fn read_json<T: DeserializeOwned>(kv: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match kv.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON entry
pub fn write_json<T: Serialize + ?Sized>(kv: &mut dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    kv.set(key, &raw)
}

// ============================================================================
// In-memory backend
// ============================================================================

/// In-memory backend. Failure injection lets callers exercise error paths.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
    fail_removes: bool,
    fail_remove_key: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `set` fail
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Make every `get` fail
    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn set_fail_removes(&mut self, fail: bool) {
        self.fail_removes = fail;
    }

    /// Make `remove` fail for one key only
    pub fn set_fail_remove_key(&mut self, key: impl Into<String>) {
        self.fail_remove_key = Some(key.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads {
            return Err(IcgError::persistence(key, "storage is unavailable"));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(IcgError::persistence(key, "storage quota exceeded"));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.fail_removes || self.fail_remove_key.as_deref() == Some(key) {
            return Err(IcgError::persistence(key, "storage is read-only"));
        }
        self.entries.remove(key);
        Ok(())
    }
}

// ============================================================================
// Directory backend
// ============================================================================

/// One `<key>.json` file per entry under a root directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(IcgError::persistence(key, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| IcgError::persistence(key, e))?;

        // Write-then-rename so readers never see a half-written entry
        let target = self.path_for(key);
        let staging = target.with_extension("json.tmp");
        std::fs::write(&staging, value).map_err(|e| IcgError::persistence(key, e))?;
        std::fs::rename(&staging, &target).map_err(|e| IcgError::persistence(key, e))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(IcgError::persistence(key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut kv = MemoryStore::new();
        write_json(&mut kv, keys::BUILD_DATA, &vec!["1.0", "2.0"]).unwrap();

        let builds: Option<Vec<String>> = read_json(&kv, keys::BUILD_DATA).unwrap();
        assert_eq!(builds, Some(vec!["1.0".to_string(), "2.0".to_string()]));

        let missing: Option<Vec<String>> = read_json(&kv, keys::ADDON_DATA).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_memory_store_failures() {
        let mut kv = MemoryStore::new().with_failing_writes();
        let err = kv.set(keys::BUILD_DATA, "[]").unwrap_err();
        assert!(err.is_persistence());

        kv.set_fail_writes(false);
        kv.set(keys::BUILD_DATA, "[]").unwrap();
        kv.set_fail_removes(true);
        assert!(kv.remove(keys::BUILD_DATA).is_err());
        assert!(kv.contains(keys::BUILD_DATA));

        kv.set_fail_removes(false);
        kv.set_fail_remove_key(keys::INSTALL_CODES);
        kv.remove(keys::BUILD_DATA).unwrap();
        assert!(kv.remove(keys::INSTALL_CODES).is_err());

        kv.set_fail_reads(true);
        assert!(kv.get(keys::BUILD_DATA).unwrap_err().is_persistence());
    }

    #[test]
    fn test_read_json_rejects_garbage() {
        let mut kv = MemoryStore::new();
        kv.set(keys::INSTALL_CODES, "{not json").unwrap();
        let result: Result<Option<Vec<String>>> = read_json(&kv, keys::INSTALL_CODES);
        assert!(matches!(result, Err(IcgError::Serialize(_))));
    }

    #[test]
    fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut kv = FileStore::new(dir.path().join("data"));

        assert_eq!(kv.get(keys::LAST_UPDATED).unwrap(), None);
        kv.remove(keys::LAST_UPDATED).unwrap();

        kv.set(keys::LAST_UPDATED, "\"today\"").unwrap();
        assert_eq!(kv.get(keys::LAST_UPDATED).unwrap().as_deref(), Some("\"today\""));
        assert!(dir.path().join("data/lastUpdated.json").exists());

        kv.remove(keys::LAST_UPDATED).unwrap();
        assert_eq!(kv.get(keys::LAST_UPDATED).unwrap(), None);
    }
}
