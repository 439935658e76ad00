//! Key-value persistence backends.
//!
//! The event store never touches a global; it is handed something that
//! implements [`KeyValueStore`]. Last writer wins, there is no locking
//! across processes.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{CalGridError, CalGridResult};

/// String key-value storage with `get`/`set` semantics.
pub trait KeyValueStore: Send + Sync {
    /// Value under `key`, or `None` when nothing has been written yet.
    fn get(&self, key: &str) -> CalGridResult<Option<String>>;

    /// Replace the value under `key`.
    fn set(&self, key: &str, value: &str) -> CalGridResult<()>;
}

/// In-process storage, optionally with a byte quota to mimic a full disk
/// or browser storage limits.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects any write whose value exceeds `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        MemoryStorage {
            entries: Mutex::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    fn lock(&self) -> CalGridResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| CalGridError::Storage("memory storage lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> CalGridResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CalGridResult<()> {
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(CalGridError::Storage(format!(
                    "quota exceeded: {} bytes over a {} byte limit",
                    value.len(),
                    quota
                )));
            }
        }
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key (`<dir>/<key>.json`).
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> CalGridResult<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn set(&self, key: &str, value: &str) -> CalGridResult<()> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let temp = self.dir.join(format!("{}.json.tmp", key));

        std::fs::write(&temp, value)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }
}
