//! Key-value store for app state, kept as one JSON document on disk.
//!
//! Every `set` writes the whole document back, so the file always matches
//! memory. A store without a path never touches the disk; tests and
//! `--ephemeral` sessions use that.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{DeskError, Result};

pub const STATE_FILE: &str = "state.json";
pub const SETTINGS_KEY: &str = "systemSettings";
pub const NOTES_KEY: &str = "notes";

#[derive(Debug, Default)]
struct StoreInner {
    path: Option<PathBuf>,
    entries: BTreeMap<String, Value>,
}

/// Shared handle; clones see the same entries.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Rc<RefCell<StoreInner>>,
}

fn storage_error(path: &Path) -> impl FnOnce(io::Error) -> DeskError + '_ {
    move |source| DeskError::Storage {
        path: path.to_path_buf(),
        source,
    }
}

impl Store {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load `path`, or start empty when it does not exist yet. A file that
    /// is not a JSON object is logged and replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), %err, "state file is corrupt; starting empty");
                BTreeMap::new()
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(storage_error(&path)(err)),
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "state store opened");
        Ok(Self {
            inner: Rc::new(RefCell::new(StoreInner {
                path: Some(path),
                entries,
            })),
        })
    }

    /// `<data dir>/term-desk/state.json`, when the platform has a data dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("term-desk").join(STATE_FILE))
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.inner.borrow().path.clone()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.borrow().entries.contains_key(key)
    }

    /// Decoded value under `key`. Values of the wrong shape read as missing.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let inner = self.inner.borrow();
        let value = inner.entries.get(key)?.clone();
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::warn!(key, %err, "ignoring stored value");
                None
            }
        }
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.inner
            .borrow_mut()
            .entries
            .insert(key.to_string(), value);
        self.flush()
    }

    pub fn remove(&self, key: &str) -> Result<bool> {
        let removed = self.inner.borrow_mut().entries.remove(key).is_some();
        if removed {
            self.flush()?;
        }
        Ok(removed)
    }

    /// Like `set`, for callers with no error channel: failures are logged.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(err) = self.set(key, value) {
            tracing::warn!(key, %err, "failed to save state");
        }
    }

    fn flush(&self) -> Result<()> {
        let inner = self.inner.borrow();
        let Some(path) = inner.path.as_deref() else {
            return Ok(());
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(storage_error(parent))?;
        }
        let raw = serde_json::to_string_pretty(&inner.entries)?;
        fs::write(path, raw).map_err(storage_error(path))?;
        tracing::trace!(path = %path.display(), "state store flushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn values_survive_a_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(STATE_FILE);
        let store = Store::open(&path).unwrap();
        store.set("count", &3_u32).unwrap();
        store.set("names", &["a", "b"]).unwrap();

        let reopened = Store::open(&path).unwrap();
        assert_eq!(reopened.get::<u32>("count"), Some(3));
        assert_eq!(reopened.get::<Vec<String>>("names").unwrap(), vec!["a", "b"]);
        assert!(reopened.remove("count").unwrap());
        assert!(!Store::open(&path).unwrap().contains("count"));
    }

    #[test]
    fn corrupt_files_and_mismatched_values_read_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STATE_FILE);
        fs::write(&path, "not json").unwrap();
        let store = Store::open(&path).unwrap();
        assert!(!store.contains("anything"));

        store.set("count", "three").unwrap();
        assert_eq!(store.get::<u32>("count"), None);
        assert!(fs::read_to_string(&path).unwrap().contains("three"));
    }

    #[test]
    fn in_memory_stores_share_entries_between_clones() {
        let store = Store::in_memory();
        let other = store.clone();
        store.save(NOTES_KEY, &Vec::<String>::new());
        assert!(other.contains(NOTES_KEY));
        assert_eq!(other.path(), None);
    }
}
