//! Client administration on a configured backend.
//!
//! The storage contract only reads clients, so registrations are written
//! through [`ClientStorage`] on the same datastore the grant storage uses.

use serde_json::{json, Value};

use oauth2_config::DatastoreConfig;
use oauth2_core::OAuth2Error;
use oauth2_observability::Metrics;
use oauth2_ports::{DynDatastore, DynStorage};
use oauth2_storage_datastore::{ClientStorage, DatastoreClient};
use oauth2_storage_factory::{create_datastore_with, db_system, observed_storage, BackendOptions};

/// One opened backend: grant storage and client registrations over a shared datastore.
pub struct Backend {
    datastore: DynDatastore,
    storage: DynStorage,
    clients: ClientStorage,
}

impl Backend {
    pub async fn open(config: &DatastoreConfig, metrics: Option<Metrics>) -> Result<Self, OAuth2Error> {
        let options = BackendOptions {
            database: config.database.clone(),
            app_name: config.app_name.clone(),
        };
        let datastore = create_datastore_with(&config.url, &options).await?;
        Ok(Self::from_datastore(datastore, db_system(&config.url), metrics))
    }

    pub fn from_datastore(datastore: DynDatastore, db_system: &str, metrics: Option<Metrics>) -> Self {
        let storage = observed_storage(datastore.clone(), db_system, metrics);
        let clients = ClientStorage::new(datastore.clone());
        Self {
            datastore,
            storage,
            clients,
        }
    }

    pub fn storage(&self) -> &DynStorage {
        &self.storage
    }

    pub fn datastore(&self) -> &DynDatastore {
        &self.datastore
    }

    pub async fn put_client(
        &self,
        id: &str,
        secret: &str,
        redirect_uri: &str,
        user_data: Option<&str>,
    ) -> Result<DatastoreClient, OAuth2Error> {
        let mut client = DatastoreClient::new(id, secret, redirect_uri);
        if let Some(user_data) = user_data {
            client = client.with_user_data(user_data);
        }
        self.clients.put(&client).await?;
        tracing::info!(client_id = %id, "client registered");
        Ok(client)
    }

    pub async fn get_client(&self, id: &str) -> Result<DatastoreClient, OAuth2Error> {
        Ok(self.clients.get(id).await?)
    }

    /// Removing an unknown client succeeds.
    pub async fn delete_client(&self, id: &str) -> Result<(), OAuth2Error> {
        self.clients.delete(id).await?;
        tracing::info!(client_id = %id, "client removed");
        Ok(())
    }

    pub async fn check(&self) -> Result<(), OAuth2Error> {
        self.storage.healthcheck().await
    }

    pub async fn close(&self) -> Result<(), OAuth2Error> {
        self.storage.close().await
    }
}

/// Printable view of a client; the secret is never echoed.
pub fn client_summary(client: &DatastoreClient) -> Value {
    use oauth2_core::Client;

    json!({
        "id": client.id(),
        "redirect_uri": client.redirect_uri(),
        "user_data": client.user_data(),
        "has_secret": !client.secret().is_empty(),
    })
}
