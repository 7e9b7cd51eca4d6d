//! State objects backed by a [`KeyValueStore`].
//!
//! [`Persisted<T>`] owns one in-memory value and mirrors it to a single storage key wrapped in an
//! [`Envelope`]. The in-memory value is authoritative: a blob that cannot be read falls back to
//! `T::default()`, and a failed write is logged and otherwise ignored.

use crate::constants::STORAGE_VERSION;
use crate::storage::KeyValueStore;
use crate::{CoreError, CoreResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The on-disk shape of every persisted blob: `{"state": {...}, "version": 0}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub state: T,
    #[serde(default)]
    pub version: u32,
}

impl<T> Envelope<T> {
    pub fn new(state: T) -> Self {
        Self {
            state,
            version: STORAGE_VERSION,
        }
    }
}

pub struct Persisted<T> {
    key: &'static str,
    storage: Arc<dyn KeyValueStore>,
    state: Mutex<T>,
}

impl<T> std::fmt::Debug for Persisted<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persisted")
            .field("key", &self.key)
            .field("state", &*self.lock())
            .finish()
    }
}

impl<T> Persisted<T> {
    fn lock(&self) -> MutexGuard<'_, T> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Persisted<T>
where
    T: Clone + Default + Serialize + DeserializeOwned,
{
    /// Loads the value stored under `key`, or starts from `T::default()` when the key is absent
    /// or unreadable.
    pub fn load(key: &'static str, storage: Arc<dyn KeyValueStore>) -> Self {
        let state = match read_envelope::<T>(storage.as_ref(), key) {
            Ok(Some(state)) => state,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unreadable persisted state");
                T::default()
            }
        };

        Self {
            key,
            storage,
            state: Mutex::new(state),
        }
    }

    /// A copy of the current value.
    pub fn snapshot(&self) -> T {
        self.lock().clone()
    }

    /// Runs `f` against the current value without copying it.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock())
    }

    /// Mutates the value under the lock, then writes it back to storage.
    ///
    /// The write is best effort. The returned value is whatever `f` returned, regardless of
    /// whether the write succeeded.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut state = self.lock();
        let result = f(&mut state);
        if let Err(e) = write_envelope(self.storage.as_ref(), self.key, &*state) {
            tracing::warn!(key = self.key, error = %e, "failed to persist state");
        }
        result
    }

    /// Re-reads the stored value. On failure the current in-memory value is kept.
    pub fn reload(&self) {
        match read_envelope::<T>(self.storage.as_ref(), self.key) {
            Ok(Some(state)) => *self.lock() = state,
            Ok(None) => *self.lock() = T::default(),
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "keeping in-memory state after failed reload");
            }
        }
    }
}

fn read_envelope<T: DeserializeOwned>(
    storage: &dyn KeyValueStore,
    key: &str,
) -> CoreResult<Option<T>> {
    let Some(value) = storage.get(key)? else {
        return Ok(None);
    };
    let envelope: Envelope<T> = serde_json::from_value(value).map_err(CoreError::Deserialization)?;
    if envelope.version != STORAGE_VERSION {
        tracing::debug!(key, version = envelope.version, "persisted state has unexpected version");
    }
    Ok(Some(envelope.state))
}

fn write_envelope<T: Serialize>(storage: &dyn KeyValueStore, key: &str, state: &T) -> CoreResult<()> {
    let value = serde_json::to_value(Envelope::new(state)).map_err(CoreError::Serialization)?;
    storage.set(key, value)
}
