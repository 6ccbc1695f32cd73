//! Key/Value Store Module
//!
//! The persistent string store the response cache lives in. Mirrors the
//! browser storage contract: string keys, string values, enumerable keys and
//! a byte quota.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

// == Store Error ==
/// Failures a key/value store can report.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The write would push the store past its byte quota
    #[error("Store quota exceeded: {used} of {limit} bytes in use")]
    QuotaExceeded { used: usize, limit: usize },

    /// The backing file could not be read or written
    #[error("Store I/O error: {0}")]
    Io(#[from] io::Error),

    /// The store contents could not be encoded
    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Key Value Store ==
/// A shared, string-keyed persistent store.
///
/// The store is shared: other parts of the application may own keys in it.
pub trait KeyValueStore: Send {
    /// Returns the raw value stored under `key`.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key` if present.
    fn remove_item(&mut self, key: &str) -> Result<(), StoreError>;

    /// Removes every key in `keys`.
    ///
    /// Stores that persist on each mutation override this to persist once.
    fn remove_items(&mut self, keys: &[String]) -> Result<(), StoreError> {
        for key in keys {
            self.remove_item(key)?;
        }
        Ok(())
    }

    /// Lists every key currently in the store.
    fn keys(&self) -> Vec<String>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove_item(key)
    }

    fn remove_items(&mut self, keys: &[String]) -> Result<(), StoreError> {
        (**self).remove_items(keys)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

// == Item Map ==
/// Ordered item map with byte accounting, shared by both store kinds.
#[derive(Debug, Default, Clone)]
struct ItemMap {
    items: BTreeMap<String, String>,
    capacity_bytes: Option<usize>,
}

impl ItemMap {
    fn used_bytes(&self) -> usize {
        self.items.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    /// Checks the quota as if `key` were set to `value`.
    fn check_quota(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let Some(limit) = self.capacity_bytes else {
            return Ok(());
        };
        let existing = self.items.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
        let used = self.used_bytes() - existing + key.len() + value.len();
        if used > limit {
            return Err(StoreError::QuotaExceeded { used, limit });
        }
        Ok(())
    }
}

// == Memory Store ==
/// In-process store, optionally bounded by a byte quota.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    map: ItemMap,
}

impl MemoryStore {
    /// Creates an unbounded in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects writes beyond `capacity_bytes`
    /// (key plus value lengths).
    pub fn with_capacity(capacity_bytes: usize) -> Self {
        Self {
            map: ItemMap {
                items: BTreeMap::new(),
                capacity_bytes: Some(capacity_bytes),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.map.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.map.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map.check_quota(key, value)?;
        self.map.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.map.items.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.map.items.keys().cloned().collect()
    }
}

// == File Store ==
/// Store persisted as a single JSON object file.
///
/// The file is rewritten after every mutation, so contents survive restarts.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    map: ItemMap,
}

impl FileStore {
    // == Open ==
    /// Opens the store at `path`.
    ///
    /// A missing file yields an empty store. A file that cannot be parsed is
    /// logged and treated as empty; it is overwritten on the next write.
    pub fn open(path: impl AsRef<Path>, capacity_bytes: Option<usize>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let items = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(items) => items,
                Err(e) => {
                    warn!("Ignoring unreadable store file {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::Io(e)),
        };
        debug!("Opened store {} with {} keys", path.display(), items.len());

        Ok(Self {
            path,
            map: ItemMap {
                items,
                capacity_bytes,
            },
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string(&self.map.items)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.map.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map.check_quota(key, value)?;
        let previous = self.map.items.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist() {
            // Keep memory and disk in agreement
            match previous {
                Some(old) => self.map.items.insert(key.to_string(), old),
                None => self.map.items.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.remove_items(&[key.to_string()])
    }

    /// Removes all `keys` with a single file rewrite. On a failed write the
    /// removed items are restored.
    fn remove_items(&mut self, keys: &[String]) -> Result<(), StoreError> {
        let removed: Vec<(String, String)> = keys
            .iter()
            .filter_map(|key| self.map.items.remove_entry(key))
            .collect();
        if removed.is_empty() {
            return Ok(());
        }

        if let Err(e) = self.persist() {
            self.map.items.extend(removed);
            return Err(e);
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.map.items.keys().cloned().collect()
    }
}
