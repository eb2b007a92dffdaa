//! # Persistent Key-Value Storage
//!
//! The dashboard's only cross-component shared state. Values are stored as
//! JSON strings, the same way a browser's local storage would hold them.
//!
//! ```text
//! Storage (typed JSON, never fails loudly)
//!    └── Arc<dyn KeyValueStore>
//!          ├── MemoryStore   // tests, --memory-storage
//!          └── FileStore     // ~/.qualarbi/storage.json
//! ```
//!
//! The file store rewrites the whole file on every change using atomic
//! rename (write `.tmp`, then `rename()`).

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, error};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::constants::StorageKey;

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "storage I/O error: {e}"),
            StorageError::Serialize(e) => write!(f, "storage serialization error: {e}"),
        }
    }
}

impl std::error::Error for StorageError {}

// ============================================================================
// Backends
// ============================================================================

/// Raw string store. Implementations must be safe to share between the
/// router's loaders and the API client.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.items).get(key).cloned())
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        lock(&self.items).insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.items).remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        lock(&self.items).clear();
        Ok(())
    }
}

/// A JSON object on disk mirrored in memory.
pub struct FileStore {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens (or lazily creates) the store at `path`. A corrupt file is
    /// logged and treated as empty rather than refusing to start.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let items = if path.exists() {
            let json = fs::read_to_string(&path).map_err(StorageError::Io)?;
            match serde_json::from_str(&json) {
                Ok(items) => items,
                Err(e) => {
                    error!("Ignoring corrupt storage file {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        debug!("Opened storage at {} ({} keys)", path.display(), items.len());
        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(StorageError::Io)?;
        }
        let tmp_path = self.path.with_extension("tmp");
        let json = serde_json::to_string_pretty(items).map_err(StorageError::Serialize)?;
        fs::write(&tmp_path, json).map_err(StorageError::Io)?;
        fs::rename(&tmp_path, &self.path).map_err(StorageError::Io)?;
        Ok(())
    }

    /// Applies `change` to a copy and swaps it in only once the copy is on
    /// disk, so memory never runs ahead of the file. `change` returns false
    /// when nothing changed and no write is needed.
    fn commit(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> Result<(), StorageError> {
        let mut items = lock(&self.items);
        let mut next = items.clone();
        if !change(&mut next) {
            return Ok(());
        }
        self.persist(&next)?;
        *items = next;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.items).get(key).cloned())
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.commit(|items| {
            items.insert(key.to_string(), value);
            true
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.commit(|items| items.remove(key).is_some())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.commit(|items| {
            items.clear();
            true
        })
    }
}

// ============================================================================
// Typed Wrapper
// ============================================================================

/// JSON view over a [`KeyValueStore`].
///
/// Mirrors local-storage helper semantics: writes report success as a bool,
/// reads return `None` for missing or unreadable values, and failures are
/// logged instead of propagated.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl Storage {
    pub fn new(backend: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
        }
    }

    /// In-memory storage with the given key prefix.
    pub fn in_memory(prefix: impl Into<String>) -> Self {
        Self::new(Arc::new(MemoryStore::new()), prefix)
    }

    /// Full key for one of the dashboard's well-known entries.
    pub fn key(&self, key: StorageKey) -> String {
        key.namespaced(&self.prefix)
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let serialized = match serde_json::to_string(value) {
            Ok(s) => s,
            Err(e) => {
                error!("Error serializing storage value for {}: {}", key, e);
                return false;
            }
        };
        match self.backend.set_item(key, serialized) {
            Ok(()) => true,
            Err(e) => {
                error!("Error saving {} to storage: {}", key, e);
                false
            }
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get_item(key) {
            Ok(raw) => raw?,
            Err(e) => {
                error!("Error reading {} from storage: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                error!("Error parsing stored value for {}: {}", key, e);
                None
            }
        }
    }

    pub fn remove(&self, key: &str) -> bool {
        match self.backend.remove_item(key) {
            Ok(()) => true,
            Err(e) => {
                error!("Error removing {} from storage: {}", key, e);
                false
            }
        }
    }

    pub fn clear(&self) -> bool {
        match self.backend.clear() {
            Ok(()) => true,
            Err(e) => {
                error!("Error clearing storage: {}", e);
                false
            }
        }
    }

    pub fn set_entry<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> bool {
        self.set(&self.key(key), value)
    }

    pub fn get_entry<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        self.get(&self.key(key))
    }

    pub fn remove_entry(&self, key: StorageKey) -> bool {
        self.remove(&self.key(key))
    }
}
