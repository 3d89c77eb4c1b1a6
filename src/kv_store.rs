use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::StorageError;

/// In-memory storage mapping user defined names to raw payloads.
///
/// Cloning a `KVStore` hands out another handle to the same map, which is how
/// the server shares one store across all of its workers.
///
/// Readers take the shared side of the lock and may run in parallel. `put` and
/// `delete` take the exclusive side, so a reader never sees a half-applied
/// write. The lock is fair: queued writers are not starved by new readers.
#[derive(Clone, Default)]
pub struct KVStore {
    inner: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl KVStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the payload stored under `name`.
    pub async fn get(&self, name: &str) -> Result<Bytes, StorageError> {
        let store = self.inner.read().await;
        store
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                name: name.to_string(),
            })
    }

    /// Stores `payload` under `name`, replacing whatever was there.
    pub async fn put(&self, name: &str, payload: impl Into<Bytes>) {
        let payload = payload.into();
        let mut store = self.inner.write().await;
        store.insert(name.to_string(), payload);
    }

    /// Removes the entry for `name`.
    pub async fn delete(&self, name: &str) -> Result<(), StorageError> {
        let mut store = self.inner.write().await;
        match store.remove(name) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.inner.read().await.contains_key(name)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
