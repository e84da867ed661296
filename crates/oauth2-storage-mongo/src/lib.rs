use async_trait::async_trait;
use mongodb::{
    bson::{self, doc, Bson, Document},
    options::{ClientOptions, ReplaceOptions},
    Client as MongoClient, Collection, Database,
};
use std::sync::atomic::{AtomicBool, Ordering};

use oauth2_ports::{Datastore, DatastoreError, Entity, Key};

/// MongoDB-backed [`Datastore`].
///
/// Notes:
/// - Each entity kind is a collection; the key name is the document `_id`.
/// - A key namespace selects a different database on the same deployment.
/// - Writes are upserts so that `put` replaces an existing entity.
pub struct MongoDatastore {
    client: MongoClient,
    db: Database,
    closed: AtomicBool,
}

impl MongoDatastore {
    pub async fn new(uri: &str) -> Result<Self, DatastoreError> {
        Self::with_database(uri, None).await
    }

    /// Connect, using `database` when given instead of the URI's default.
    pub async fn with_database(uri: &str, database: Option<&str>) -> Result<Self, DatastoreError> {
        Self::with_options(uri, database, None).await
    }

    /// Connect with an explicit database and driver application name.
    pub async fn with_options(
        uri: &str,
        database: Option<&str>,
        app_name: Option<&str>,
    ) -> Result<Self, DatastoreError> {
        let mut opts = ClientOptions::parse(uri)
            .await
            .map_err(Self::mongo_err_to_datastore)?;
        if let Some(app_name) = app_name {
            opts.app_name = Some(app_name.to_string());
        } else if opts.app_name.is_none() {
            opts.app_name = Some("oauth2-storage-mongo".to_string());
        }

        let client = MongoClient::with_options(opts).map_err(Self::mongo_err_to_datastore)?;

        // If neither the caller nor the URI names a database, fall back to "oauth2".
        let db_name = database
            .map(|d| d.to_string())
            .or_else(|| client.default_database().map(|d| d.name().to_string()))
            .unwrap_or_else(|| "oauth2".to_string());

        let db = client.database(&db_name);

        Ok(Self {
            client,
            db,
            closed: AtomicBool::new(false),
        })
    }

    pub fn database_name(&self) -> &str {
        self.db.name()
    }

    fn collection(&self, key: &Key) -> Collection<Document> {
        match key.namespace() {
            Some(ns) => self.client.database(ns).collection(key.kind()),
            None => self.db.collection(key.kind()),
        }
    }

    fn ensure_usable(&self, key: &Key) -> Result<(), DatastoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(DatastoreError::Closed);
        }
        if key.is_incomplete() {
            return Err(DatastoreError::IncompleteKey(key.clone()));
        }
        Ok(())
    }

    fn mongo_err_to_datastore(err: mongodb::error::Error) -> DatastoreError {
        DatastoreError::Backend(err.to_string())
    }
}

/// Property map to stored document, with the key name as `_id`.
fn entity_to_document(key: &Key, entity: Entity) -> Result<Document, DatastoreError> {
    let mut document =
        bson::to_document(&entity).map_err(|e| DatastoreError::InvalidEntity(e.to_string()))?;
    document.insert("_id", key.name());
    Ok(document)
}

fn document_to_entity(mut document: Document) -> Result<Entity, DatastoreError> {
    document.remove("_id");
    let value = Bson::Document(document).into_relaxed_extjson();
    match value {
        serde_json::Value::Object(entity) => Ok(entity),
        other => Err(DatastoreError::InvalidEntity(format!(
            "expected a document, got {}",
            other
        ))),
    }
}

#[async_trait]
impl Datastore for MongoDatastore {
    async fn put(&self, key: &Key, entity: Entity) -> Result<Key, DatastoreError> {
        self.ensure_usable(key)?;
        let document = entity_to_document(key, entity)?;
        self.collection(key)
            .replace_one(
                doc! { "_id": key.name() },
                document,
                ReplaceOptions::builder().upsert(true).build(),
            )
            .await
            .map_err(Self::mongo_err_to_datastore)?;
        Ok(key.clone())
    }

    async fn get(&self, key: &Key) -> Result<Entity, DatastoreError> {
        self.ensure_usable(key)?;
        let document = self
            .collection(key)
            .find_one(doc! { "_id": key.name() }, None)
            .await
            .map_err(Self::mongo_err_to_datastore)?
            .ok_or_else(|| DatastoreError::NoSuchEntity(key.clone()))?;
        document_to_entity(document)
    }

    async fn delete(&self, key: &Key) -> Result<(), DatastoreError> {
        self.ensure_usable(key)?;
        self.collection(key)
            .delete_one(doc! { "_id": key.name() }, None)
            .await
            .map(|_| ())
            .map_err(Self::mongo_err_to_datastore)
    }

    async fn ping(&self) -> Result<(), DatastoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(DatastoreError::Closed);
        }
        self.db
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map(|_| ())
            .map_err(Self::mongo_err_to_datastore)
    }

    async fn close(&self) -> Result<(), DatastoreError> {
        // Connection pools are torn down when the last client handle drops.
        self.closed.store(true, Ordering::Release);
        tracing::debug!(database = %self.db.name(), "mongo datastore closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn entity(value: Value) -> Entity {
        match value {
            Value::Object(map) => map,
            _ => panic!("test entity must be an object"),
        }
    }

    #[test]
    fn document_uses_key_name_as_id() {
        let key = Key::name_key("refresh", "refresh-token");
        let document =
            entity_to_document(&key, entity(json!({ "access_token": "access" }))).unwrap();

        assert_eq!(document.get_str("_id").unwrap(), "refresh-token");
        assert_eq!(document.get_str("access_token").unwrap(), "access");
    }

    #[test]
    fn entity_roundtrip_drops_id_and_keeps_properties() {
        let key = Key::name_key("access_data", "token");
        let original = entity(json!({
            "client_key": "client",
            "expires_in": 3600,
            "scope": ["read", "write"],
            "created_at": "2024-01-01T00:00:00Z",
            "user_data": ""
        }));

        let document = entity_to_document(&key, original.clone()).unwrap();
        let restored = document_to_entity(document).unwrap();

        assert!(!restored.contains_key("_id"));
        assert_eq!(restored, original);
    }
}
