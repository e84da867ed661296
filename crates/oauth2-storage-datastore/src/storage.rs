use async_trait::async_trait;
use std::sync::Arc;

use oauth2_core::{AccessData, AuthorizeData, DynClient, OAuth2Error};
use oauth2_ports::{DynDatastore, Storage};

use crate::access::AccessEntity;
use crate::authorize::AuthorizeEntity;
use crate::client::ClientStorage;
use crate::refresh::RefreshEntity;
use crate::repository::Repository;
use crate::StoreError;

/// [`Storage`] over a key-value document store.
///
/// Loads resolve references with sequential point reads: an access token
/// pulls in its client and authorization code, and an authorization code
/// pulls in its client. A dangling reference fails the load with
/// [`OAuth2Error::not_found`].
pub struct DatastoreStorage {
    datastore: DynDatastore,
    clients: ClientStorage,
    authorizations: Repository<AuthorizeEntity>,
    accesses: Repository<AccessEntity>,
    refreshes: Repository<RefreshEntity>,
}

impl DatastoreStorage {
    pub fn new(datastore: DynDatastore) -> Self {
        Self {
            clients: ClientStorage::new(datastore.clone()),
            authorizations: Repository::new(datastore.clone()),
            accesses: Repository::new(datastore.clone()),
            refreshes: Repository::new(datastore.clone()),
            datastore,
        }
    }

    /// Client registrations on the same datastore.
    pub fn clients(&self) -> &ClientStorage {
        &self.clients
    }
}

#[async_trait]
impl Storage for DatastoreStorage {
    async fn get_client(&self, id: &str) -> Result<DynClient, OAuth2Error> {
        let client = self.clients.get(id).await?;
        Ok(Arc::new(client))
    }

    async fn save_authorize(&self, data: &AuthorizeData) -> Result<(), OAuth2Error> {
        let entity = AuthorizeEntity::from_record(data)?;
        self.authorizations.put(&entity).await?;
        Ok(())
    }

    async fn load_authorize(&self, code: &str) -> Result<AuthorizeData, OAuth2Error> {
        let entity = self.authorizations.get(code).await?;
        let client = self.get_client(&entity.client_key).await?;
        Ok(entity.into_record(client))
    }

    async fn remove_authorize(&self, code: &str) -> Result<(), OAuth2Error> {
        self.authorizations.delete(code).await?;
        Ok(())
    }

    async fn save_access(&self, data: &AccessData) -> Result<(), OAuth2Error> {
        let entity = AccessEntity::from_record(data)?;
        self.accesses.put(&entity).await?;

        if !data.refresh_token.is_empty() {
            let refresh = RefreshEntity::new(&data.refresh_token, &data.access_token);
            self.refreshes.put(&refresh).await?;
            tracing::debug!(client_id = %entity.client_key, "stored refresh token mapping");
        }

        Ok(())
    }

    async fn load_access(&self, token: &str) -> Result<AccessData, OAuth2Error> {
        let entity = self.accesses.get(token).await?;
        let client = self.get_client(&entity.client_key).await?;

        // Tokens issued without an authorization code (client credentials,
        // password grants) carry no code to resolve.
        let authorize_data = if entity.authorize_code.is_empty() {
            None
        } else {
            Some(self.load_authorize(&entity.authorize_code).await?)
        };

        Ok(entity.into_record(client, authorize_data))
    }

    async fn remove_access(&self, token: &str) -> Result<(), OAuth2Error> {
        self.accesses.delete(token).await?;
        Ok(())
    }

    async fn load_refresh(&self, token: &str) -> Result<AccessData, OAuth2Error> {
        let refresh = self.refreshes.get(token).await?;
        self.load_access(&refresh.access_token).await
    }

    async fn remove_refresh(&self, token: &str) -> Result<(), OAuth2Error> {
        self.refreshes.delete(token).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), OAuth2Error> {
        self.datastore
            .close()
            .await
            .map_err(|e| OAuth2Error::from(StoreError::from(e)))
    }

    async fn healthcheck(&self) -> Result<(), OAuth2Error> {
        self.datastore
            .ping()
            .await
            .map_err(|e| OAuth2Error::from(StoreError::from(e)))
    }
}
