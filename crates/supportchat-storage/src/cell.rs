use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::store::{KeyValueStore, StorageError};

/// A typed value seeded from a store and written back on every update.
///
/// Storage is best-effort: read failures fall back to the initial value and
/// write failures only log, so the in-memory value is always authoritative.
pub struct PersistentCell<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    value: T,
}

impl<T> PersistentCell<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, initial: T) -> Self {
        let key = key.into();
        let value = match load(store.as_ref(), &key) {
            Ok(Some(value)) => value,
            Ok(None) => initial,
            Err(e) => {
                log::warn!("Error reading storage key \"{}\": {}", key, e);
                initial
            }
        };

        Self { store, key, value }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value and mirror it to storage
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.persist();
    }

    /// Derive the next value from the current one and mirror it to storage
    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.value);
        self.set(next);
    }

    /// Mutate in place and mirror the result to storage
    pub fn modify<F>(&mut self, f: F)
    where
        F: FnOnce(&mut T),
    {
        f(&mut self.value);
        self.persist();
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.value)
            .map_err(StorageError::from)
            .and_then(|raw| self.store.set(&self.key, &raw));

        if let Err(e) = result {
            log::warn!("Error setting storage key \"{}\": {}", self.key, e);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentCell")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(raw) if !raw.is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
        _ => Ok(None),
    }
}
