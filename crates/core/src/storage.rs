//! Key-value storage for persisted state.
//!
//! The backend is an opaque JSON blob store: `get`, `set` and `remove` by key, last write wins,
//! no transactions across keys. Two implementations are provided:
//!
//! - [`MemoryStore`]: process-local, used in tests and when no data directory is configured.
//! - [`JsonFileStore`]: one `<key>.json` file per key under a data directory.
//!
//! ```text
//! medcodes_data/
//!   auth-storage.json
//!   favorites-storage.json
//!   search-storage.json
//! ```

use crate::{CoreError, CoreResult};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Blob storage consumed by [`Persisted`](crate::persisted::Persisted).
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key has never been written.
    fn get(&self, key: &str) -> CoreResult<Option<Value>>;

    fn set(&self, key: &str, value: Value) -> CoreResult<()>;

    /// Removes the key. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> CoreResult<()>;
}

/// Validates that a storage key is safe to use as a file stem.
///
/// Keys are limited to ASCII alphanumerics, `-`, `_` and `.`, must not start with `.` and are
/// bounded in length.
pub fn validate_storage_key(key: &str) -> CoreResult<()> {
    const MAX_KEY_LEN: usize = 128;

    if key.is_empty() || key.len() > MAX_KEY_LEN || key.starts_with('.') {
        return Err(CoreError::InvalidStorageKey(key.to_owned()));
    }

    let ok = key
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'.' | b'-' | b'_'));
    if !ok {
        return Err(CoreError::InvalidStorageKey(key.to_owned()));
    }

    Ok(())
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> CoreResult<std::sync::MutexGuard<'_, HashMap<String, Value>>> {
        self.values
            .lock()
            .map_err(|_| CoreError::StorageUnavailable("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CoreResult<Option<Value>> {
        Ok(self.values()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> CoreResult<()> {
        self.values()?.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.values()?.remove(key);
        Ok(())
    }
}

/// Stores each key as pretty-printed JSON in `<data_dir>/<key>.json`.
///
/// Writes go to a temporary sibling file first and are then renamed into place, so a reader
/// never sees a half-written blob.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// The directory is created lazily on first write.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, key: &str) -> CoreResult<PathBuf> {
        validate_storage_key(key)?;
        Ok(self.data_dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> CoreResult<Option<Value>> {
        let path = self.path_for(key)?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CoreError::StorageRead(e)),
        };

        let value = serde_json::from_str(&contents).map_err(CoreError::Deserialization)?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: Value) -> CoreResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.data_dir).map_err(CoreError::StorageWrite)?;

        let json = serde_json::to_string_pretty(&value).map_err(CoreError::Serialization)?;
        let tmp_path = self.data_dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp_path, json).map_err(CoreError::StorageWrite)?;
        fs::rename(&tmp_path, &path).map_err(CoreError::StorageWrite)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::StorageWrite(e)),
        }
    }
}
