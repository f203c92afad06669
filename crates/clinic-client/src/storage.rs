//! Durable key/value storage backing the session.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{ClientError, Result};

/// Minimal string key/value store with `localStorage` semantics.
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// Default directory for persisted client state (`~/.clinic`)
pub fn default_state_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".clinic"))
        .ok_or_else(|| ClientError::configuration("Cannot determine home directory"))
}

/// Stores all items of one profile in a single JSON object file.
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `<dir>/session.<profile>.json`
    pub fn for_profile(dir: &Path, profile: &str) -> Self {
        Self::new(dir.join(format!("session.{profile}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| ClientError::storage(format!("read {}: {e}", self.path.display())))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| ClientError::storage(format!("parse {}: {e}", self.path.display())))
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| ClientError::storage(format!("create {}: {e}", dir.display())))?;
        }
        let content = serde_json::to_string_pretty(items)?;
        fs::write(&self.path, content)
            .map_err(|e| ClientError::storage(format!("write {}: {e}", self.path.display())))
    }

    fn locked<R>(&self, f: impl FnOnce() -> Result<R>) -> Result<R> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ClientError::storage("storage lock poisoned"))?;
        f()
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.locked(|| Ok(self.read_all()?.remove(key)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.locked(|| {
            let mut items = self.read_all()?;
            items.insert(key.to_string(), value.to_string());
            self.write_all(&items)
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.locked(|| {
            let mut items = self.read_all()?;
            if items.remove(key).is_some() {
                if items.is_empty() {
                    fs::remove_file(&self.path).map_err(|e| {
                        ClientError::storage(format!("remove {}: {e}", self.path.display()))
                    })?;
                } else {
                    self.write_all(&items)?;
                }
            }
            Ok(())
        })
    }
}

/// In-process storage. Clones share the same items, which lets tests model a
/// process restart by handing the same storage to a fresh session store.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self
            .items
            .lock()
            .map_err(|_| ClientError::storage("storage lock poisoned"))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self
            .items
            .lock()
            .map_err(|_| ClientError::storage("storage lock poisoned"))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self
            .items
            .lock()
            .map_err(|_| ClientError::storage("storage lock poisoned"))?;
        items.remove(key);
        Ok(())
    }
}
