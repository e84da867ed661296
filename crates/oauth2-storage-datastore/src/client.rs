use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use oauth2_core::Client;
use oauth2_ports::DynDatastore;

use crate::repository::{NamedEntity, Repository};
use crate::StoreError;

/// Entity kind of registered OAuth2 clients.
pub const KIND_CLIENT: &str = "client";

/// An OAuth2 client as persisted in the datastore, keyed by its id.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatastoreClient {
    #[serde(skip)]
    pub id: String,
    pub secret: String,
    pub redirect_uri: String,
    pub user_data: String,
}

impl DatastoreClient {
    pub fn new(
        id: impl Into<String>,
        secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
            redirect_uri: redirect_uri.into(),
            user_data: String::new(),
        }
    }

    pub fn with_user_data(mut self, user_data: impl Into<String>) -> Self {
        self.user_data = user_data.into();
        self
    }
}

impl Client for DatastoreClient {
    fn id(&self) -> &str {
        &self.id
    }

    fn secret(&self) -> &str {
        &self.secret
    }

    fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    fn user_data(&self) -> Option<Value> {
        if self.user_data.is_empty() {
            None
        } else {
            Some(Value::String(self.user_data.clone()))
        }
    }
}

// Secrets stay out of logs.
impl fmt::Display for DatastoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {:?}, Secret: \"***\", RedirectURI: {:?}, UserData: {:?}",
            self.id, self.redirect_uri, self.user_data
        )
    }
}

impl fmt::Debug for DatastoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatastoreClient")
            .field("id", &self.id)
            .field("secret", &"***")
            .field("redirect_uri", &self.redirect_uri)
            .field("user_data", &self.user_data)
            .finish()
    }
}

impl NamedEntity for DatastoreClient {
    const KIND: &'static str = KIND_CLIENT;

    fn key_name(&self) -> &str {
        &self.id
    }

    fn set_key_name(&mut self, name: String) {
        self.id = name;
    }
}

/// Client registration management.
///
/// The grant-storage contract only ever reads clients; use this to create,
/// update and remove them.
#[derive(Clone)]
pub struct ClientStorage {
    clients: Repository<DatastoreClient>,
}

impl ClientStorage {
    pub fn new(datastore: DynDatastore) -> Self {
        Self {
            clients: Repository::new(datastore),
        }
    }

    /// Create or update a client. The id is the entity key and must be set.
    pub async fn put(&self, client: &DatastoreClient) -> Result<(), StoreError> {
        if client.id.is_empty() {
            return Err(StoreError::EmptyClientId);
        }
        self.clients.put(client).await
    }

    /// Create or update several clients. Nothing is written if any id is empty.
    pub async fn put_multi(&self, clients: &[DatastoreClient]) -> Result<(), StoreError> {
        if clients.iter().any(|c| c.id.is_empty()) {
            return Err(StoreError::EmptyClientId);
        }
        self.clients.put_multi(clients).await
    }

    pub async fn get(&self, id: &str) -> Result<DatastoreClient, StoreError> {
        self.clients.get(id).await
    }

    /// Results are in id order. Fails if any id is unknown.
    pub async fn get_multi(&self, ids: &[&str]) -> Result<Vec<DatastoreClient>, StoreError> {
        self.clients.get_multi(ids).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.clients.delete(id).await
    }

    pub async fn delete_multi(&self, ids: &[&str]) -> Result<(), StoreError> {
        self.clients.delete_multi(ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryDatastore;
    use oauth2_ports::Key;
    use std::sync::Arc;

    fn storage() -> (Arc<MemoryDatastore>, ClientStorage) {
        let datastore = Arc::new(MemoryDatastore::new());
        let clients = ClientStorage::new(datastore.clone());
        (datastore, clients)
    }

    #[tokio::test]
    async fn put_stores_client_under_its_id_without_id_property() {
        let (datastore, clients) = storage();
        let client = DatastoreClient::new("sample", "secret", "redirect");

        clients.put(&client).await.unwrap();

        let stored = datastore
            .entity(&Key::name_key(KIND_CLIENT, "sample"))
            .expect("client entity should exist");
        assert!(!stored.contains_key("id"));
        assert_eq!(stored["secret"], "secret");
        assert_eq!(stored["redirect_uri"], "redirect");
    }

    #[tokio::test]
    async fn put_rejects_empty_id() {
        let (datastore, clients) = storage();

        let err = clients
            .put(&DatastoreClient::new("", "secret", "redirect"))
            .await
            .unwrap_err();

        assert_eq!(err, StoreError::EmptyClientId);
        assert!(datastore.is_empty());
    }

    #[tokio::test]
    async fn get_copies_id_back() {
        let (_, clients) = storage();
        let client = DatastoreClient::new("sample", "secret", "redirect").with_user_data("sample");
        clients.put(&client).await.unwrap();

        let fetched = clients.get("sample").await.unwrap();
        assert_eq!(fetched, client);
        assert_eq!(fetched.user_data(), Some(Value::from("sample")));
    }

    #[tokio::test]
    async fn get_unknown_client_is_not_found() {
        let (_, clients) = storage();
        let err = clients.get("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_removes_client() {
        let (datastore, clients) = storage();
        clients
            .put(&DatastoreClient::new("sample", "secret", "redirect"))
            .await
            .unwrap();

        clients.delete("sample").await.unwrap();

        assert!(datastore.is_empty());
        assert!(clients.get("sample").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn put_multi_checks_every_id_before_writing() {
        let (datastore, clients) = storage();
        let batch = vec![
            DatastoreClient::new("a", "secret", "redirect"),
            DatastoreClient::new("", "secret", "redirect"),
        ];

        assert_eq!(
            clients.put_multi(&batch).await,
            Err(StoreError::EmptyClientId)
        );
        assert!(datastore.is_empty());
    }

    #[tokio::test]
    async fn multi_operations_preserve_order() {
        let (datastore, clients) = storage();
        let batch = vec![
            DatastoreClient::new("a", "secret-a", "redirect-a"),
            DatastoreClient::new("b", "secret-b", "redirect-b"),
        ];
        clients.put_multi(&batch).await.unwrap();

        let fetched = clients.get_multi(&["b", "a"]).await.unwrap();
        assert_eq!(fetched[0], batch[1]);
        assert_eq!(fetched[1], batch[0]);

        clients.delete_multi(&["a", "b"]).await.unwrap();
        assert!(datastore.is_empty());
    }

    #[test]
    fn display_masks_secret() {
        let client = DatastoreClient::new("sample", "top-secret", "redirect");
        let shown = client.to_string();
        assert!(shown.contains("\"sample\""));
        assert!(!shown.contains("top-secret"));
    }

    #[test]
    fn debug_masks_secret() {
        let client = DatastoreClient::new("sample", "top-secret", "redirect");
        let shown = format!("{:?}", client);
        assert!(shown.contains("\"sample\""));
        assert!(shown.contains("redirect"));
        assert!(!shown.contains("top-secret"));

        let dyn_client: oauth2_core::DynClient = std::sync::Arc::new(client);
        assert!(!format!("{:?}", dyn_client).contains("top-secret"));
    }
}
