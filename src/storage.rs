//! Session Persistence
//!
//! A string-keyed storage surface for the session (the desktop shell has
//! no browser localStorage, so the client persists its own). Two
//! implementations:
//!
//! - `FileStorage` - JSON file under the platform data directory
//! - `MemoryStorage` - in-memory map, used by tests
//!
//! Values are opaque strings; the session store decides what goes in them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::Config;
use crate::error::StorageError;

/// Directory name under the platform data dir
const APP_DIR: &str = "ims-client";

/// File name for the persisted session
const SESSION_FILE: &str = "session.json";

/// String-keyed persistence surface for session state.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// File-backed storage: one JSON object, rewritten on every mutation.
///
/// The session holds three small string values, so rewriting the whole
/// file keeps the persisted copy equal to memory after each call returns.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    cache: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Open (or create) storage at the given path.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let cache = Self::load(&path)?;
        Ok(Self {
            path,
            cache: Mutex::new(cache),
        })
    }

    /// Open storage at the default platform location
    /// (e.g. `~/.local/share/ims-client/session.json`).
    pub fn open_default() -> Result<Self, StorageError> {
        Self::open(Self::default_path()?)
    }

    /// Open storage where the configuration says the session lives,
    /// falling back to the default platform location.
    pub fn open_from(config: &Config) -> Result<Self, StorageError> {
        match config.session_path() {
            Some(path) => Self::open(path.clone()),
            None => Self::open_default(),
        }
    }

    /// The default session file path for this platform.
    pub fn default_path() -> Result<PathBuf, StorageError> {
        let base = dirs::data_dir().ok_or(StorageError::NoDataDir)?;
        Ok(base.join(APP_DIR).join(SESSION_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<HashMap<String, String>, StorageError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => Ok(map),
                Err(err) => {
                    // A corrupt file means a forced re-login, not a crash.
                    tracing::warn!(path = %path.display(), %err, "session file corrupt, starting empty");
                    Ok(HashMap::new())
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn flush(&self, cache: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(cache)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        Ok(cache.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.insert(key.to_owned(), value.to_owned());
        self.flush(&cache)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if cache.remove(key).is_some() {
            self.flush(&cache)?;
        }
        Ok(())
    }
}

/// In-memory storage for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value, e.g. to simulate a previous run.
    pub fn seed(&self, key: &str, value: &str) {
        let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(key.to_owned(), value.to_owned());
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(key);
        Ok(())
    }
}
