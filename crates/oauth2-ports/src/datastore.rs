use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Stored properties of one entity.
pub type Entity = serde_json::Map<String, serde_json::Value>;

/// Identifies one entity: its kind plus a caller-supplied name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    kind: String,
    name: String,
    namespace: Option<String>,
}

impl Key {
    pub fn name_key(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            namespace: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// A key without a name cannot address a stored entity.
    pub fn is_incomplete(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}:{}/{}", ns, self.kind, self.name),
            None => write!(f, "{}/{}", self.kind, self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatastoreError {
    /// No entity is stored under the key.
    NoSuchEntity(Key),
    /// The key has an empty name.
    IncompleteKey(Key),
    /// A batch call received a different number of keys and entities.
    LengthMismatch { keys: usize, entities: usize },
    /// An entity could not be converted to or from its record type.
    InvalidEntity(String),
    /// The client was closed.
    Closed,
    Backend(String),
}

impl DatastoreError {
    pub fn is_no_such_entity(&self) -> bool {
        matches!(self, Self::NoSuchEntity(_))
    }
}

impl fmt::Display for DatastoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuchEntity(key) => write!(f, "no such entity: {}", key),
            Self::IncompleteKey(key) => write!(f, "incomplete key: {}", key),
            Self::LengthMismatch { keys, entities } => write!(
                f,
                "batch length mismatch: {} keys, {} entities",
                keys, entities
            ),
            Self::InvalidEntity(msg) => write!(f, "invalid entity: {}", msg),
            Self::Closed => write!(f, "datastore client is closed"),
            Self::Backend(msg) => write!(f, "datastore backend error: {}", msg),
        }
    }
}

impl std::error::Error for DatastoreError {}

/// Key-value document-store client.
///
/// Writes replace whatever is stored under the key. Deleting a missing key is
/// not an error.
#[async_trait]
pub trait Datastore: Send + Sync {
    async fn put(&self, key: &Key, entity: Entity) -> Result<Key, DatastoreError>;

    async fn put_multi(
        &self,
        keys: &[Key],
        entities: Vec<Entity>,
    ) -> Result<Vec<Key>, DatastoreError> {
        if keys.len() != entities.len() {
            return Err(DatastoreError::LengthMismatch {
                keys: keys.len(),
                entities: entities.len(),
            });
        }
        let mut stored = Vec::with_capacity(keys.len());
        for (key, entity) in keys.iter().zip(entities) {
            stored.push(self.put(key, entity).await?);
        }
        Ok(stored)
    }

    /// Fails with [`DatastoreError::NoSuchEntity`] when nothing is stored.
    async fn get(&self, key: &Key) -> Result<Entity, DatastoreError>;

    /// Results are in key order. Fails on the first missing key.
    async fn get_multi(&self, keys: &[Key]) -> Result<Vec<Entity>, DatastoreError> {
        let mut entities = Vec::with_capacity(keys.len());
        for key in keys {
            entities.push(self.get(key).await?);
        }
        Ok(entities)
    }

    async fn delete(&self, key: &Key) -> Result<(), DatastoreError>;

    async fn delete_multi(&self, keys: &[Key]) -> Result<(), DatastoreError> {
        for key in keys {
            self.delete(key).await?;
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), DatastoreError>;

    async fn close(&self) -> Result<(), DatastoreError>;
}

pub type DynDatastore = Arc<dyn Datastore>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_display_includes_namespace_when_set() {
        let key = Key::name_key("client", "abc");
        assert_eq!(key.to_string(), "client/abc");

        let key = key.with_namespace("tenant");
        assert_eq!(key.to_string(), "tenant:client/abc");
        assert_eq!(key.namespace(), Some("tenant"));
    }

    #[test]
    fn empty_name_is_incomplete() {
        assert!(Key::name_key("refresh", "").is_incomplete());
        assert!(!Key::name_key("refresh", "r").is_incomplete());
    }

    #[test]
    fn only_missing_entity_is_no_such_entity() {
        let key = Key::name_key("access_data", "t");
        assert!(DatastoreError::NoSuchEntity(key.clone()).is_no_such_entity());
        assert!(!DatastoreError::IncompleteKey(key).is_no_such_entity());
        assert!(!DatastoreError::Closed.is_no_such_entity());
    }
}
