//! Key-value persistence contract.
//!
//! [`KeyValueStore`] is the raw string surface a backend implements.
//! [`Store`] layers typed, never-failing reads and writes on top: a record
//! that is missing or fails to parse yields the caller's default, and a write
//! that fails is logged and dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;

/// Raw string key-value backend.
///
/// Implementations must be synchronous. `Send` lets the owning desk move
/// into the timer task.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Write several records. Backends that support transactions override
    /// this so the records land together or not at all.
    fn set_many(&self, entries: &[(String, String)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// In-memory backend. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }

    fn set_many(&self, entries: &[(String, String)]) -> Result<(), StorageError> {
        let mut map = self.lock();
        for (key, value) in entries {
            map.insert(key.clone(), value.clone());
        }
        Ok(())
    }
}

/// Records to be written together with [`Store::commit`].
#[derive(Debug, Default)]
pub struct Batch {
    entries: Vec<(String, String)>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a record. A record that cannot be serialized is logged and left out.
    pub fn put<T: Serialize>(&mut self, key: &str, value: &T) -> &mut Self {
        match serde_json::to_string(value) {
            Ok(json) => self.entries.push((key.to_string(), json)),
            Err(e) => tracing::warn!(key, error = %e, "skipping record that failed to serialize"),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Typed view over a boxed backend.
pub struct Store {
    backend: Box<dyn KeyValueStore>,
}

impl Store {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Store backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Read and parse `key`, falling back to `default()` when the record is
    /// missing, unreadable or malformed.
    pub fn read_or<T, F>(&self, key: &str, default: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.backend.get(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key, error = %e, "stored record is malformed, using default");
                    default()
                }
            },
            Ok(None) => default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read record, using default");
                default()
            }
        }
    }

    /// Same as [`Store::read_or`] with `T::default()`.
    pub fn read_or_default<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        self.read_or(key, T::default)
    }

    /// Serialize and write `value` in full. Failures are logged, not returned.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) {
        let mut batch = Batch::new();
        batch.put(key, value);
        self.commit(batch);
    }

    /// Write every record in `batch` in one backend call.
    pub fn commit(&self, batch: Batch) {
        if batch.is_empty() {
            return;
        }
        if let Err(e) = self.backend.set_many(&batch.entries) {
            let keys: Vec<&str> = batch.entries.iter().map(|(k, _)| k.as_str()).collect();
            tracing::warn!(?keys, error = %e, "failed to write records");
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            tracing::warn!(key, error = %e, "failed to remove record");
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}
