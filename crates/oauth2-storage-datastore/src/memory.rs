use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use oauth2_ports::{Datastore, DatastoreError, Entity, Key};

/// Process-local [`Datastore`] for tests and single-node development.
#[derive(Debug, Default)]
pub struct MemoryDatastore {
    entities: RwLock<HashMap<Key, Entity>>,
    closed: AtomicBool,
}

impl MemoryDatastore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read().map(|entities| entities.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the properties stored under `key`.
    pub fn entity(&self, key: &Key) -> Option<Entity> {
        self.read().ok()?.get(key).cloned()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Key, Entity>>, DatastoreError> {
        self.entities
            .read()
            .map_err(|_| DatastoreError::Backend("memory datastore lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Key, Entity>>, DatastoreError> {
        self.entities
            .write()
            .map_err(|_| DatastoreError::Backend("memory datastore lock poisoned".to_string()))
    }

    fn ensure_open(&self) -> Result<(), DatastoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(DatastoreError::Closed);
        }
        Ok(())
    }

    fn ensure_complete(key: &Key) -> Result<(), DatastoreError> {
        if key.is_incomplete() {
            return Err(DatastoreError::IncompleteKey(key.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl Datastore for MemoryDatastore {
    async fn put(&self, key: &Key, entity: Entity) -> Result<Key, DatastoreError> {
        self.ensure_open()?;
        Self::ensure_complete(key)?;
        self.write()?.insert(key.clone(), entity);
        Ok(key.clone())
    }

    /// All keys are validated before anything is written.
    async fn put_multi(
        &self,
        keys: &[Key],
        entities: Vec<Entity>,
    ) -> Result<Vec<Key>, DatastoreError> {
        self.ensure_open()?;
        if keys.len() != entities.len() {
            return Err(DatastoreError::LengthMismatch {
                keys: keys.len(),
                entities: entities.len(),
            });
        }
        keys.iter().try_for_each(Self::ensure_complete)?;

        let mut stored = self.write()?;
        for (key, entity) in keys.iter().zip(entities) {
            stored.insert(key.clone(), entity);
        }
        Ok(keys.to_vec())
    }

    async fn get(&self, key: &Key) -> Result<Entity, DatastoreError> {
        self.ensure_open()?;
        Self::ensure_complete(key)?;
        self.read()?
            .get(key)
            .cloned()
            .ok_or_else(|| DatastoreError::NoSuchEntity(key.clone()))
    }

    async fn delete(&self, key: &Key) -> Result<(), DatastoreError> {
        self.ensure_open()?;
        Self::ensure_complete(key)?;
        self.write()?.remove(key);
        Ok(())
    }

    async fn ping(&self) -> Result<(), DatastoreError> {
        self.ensure_open()
    }

    async fn close(&self) -> Result<(), DatastoreError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
