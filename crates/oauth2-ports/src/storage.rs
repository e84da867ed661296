use async_trait::async_trait;
use std::sync::Arc;

use oauth2_core::{AccessData, AuthorizeData, DynClient, OAuth2Error};

/// Persistence contract for OAuth2 grant records.
///
/// Lookups that match nothing fail with [`OAuth2Error::not_found`].
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_client(&self, id: &str) -> Result<DynClient, OAuth2Error>;

    // Authorization codes
    async fn save_authorize(&self, data: &AuthorizeData) -> Result<(), OAuth2Error>;
    /// Load an authorization code together with its client.
    async fn load_authorize(&self, code: &str) -> Result<AuthorizeData, OAuth2Error>;
    async fn remove_authorize(&self, code: &str) -> Result<(), OAuth2Error>;

    // Access tokens
    /// Store an access token, and its refresh token when one was issued.
    async fn save_access(&self, data: &AccessData) -> Result<(), OAuth2Error>;
    /// Load an access token together with its client and authorization code.
    async fn load_access(&self, token: &str) -> Result<AccessData, OAuth2Error>;
    async fn remove_access(&self, token: &str) -> Result<(), OAuth2Error>;

    // Refresh tokens
    /// Resolve a refresh token to the access token it was issued with.
    async fn load_refresh(&self, token: &str) -> Result<AccessData, OAuth2Error>;
    async fn remove_refresh(&self, token: &str) -> Result<(), OAuth2Error>;

    /// Release backend connections. The storage must not be used afterwards.
    async fn close(&self) -> Result<(), OAuth2Error>;

    /// Lightweight liveness/readiness check.
    async fn healthcheck(&self) -> Result<(), OAuth2Error> {
        Ok(())
    }
}

pub type DynStorage = Arc<dyn Storage>;
