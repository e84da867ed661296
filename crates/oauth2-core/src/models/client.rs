use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// A registered OAuth2 client as seen by the authorization server.
///
/// Storage adapters return their own persisted client type behind this trait.
pub trait Client: Debug + Send + Sync {
    fn id(&self) -> &str;

    fn secret(&self) -> &str;

    fn redirect_uri(&self) -> &str;

    /// Opaque, application-defined data attached to the client.
    fn user_data(&self) -> Option<Value>;

    /// Compare a presented secret with the stored one in constant time.
    fn secret_matches(&self, secret: &str) -> bool {
        self.secret().as_bytes().ct_eq(secret.as_bytes()).into()
    }
}

pub type DynClient = Arc<dyn Client>;

/// Plain in-memory client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultClient {
    pub id: String,
    pub secret: String,
    pub redirect_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<Value>,
}

impl DefaultClient {
    pub fn new(
        id: impl Into<String>,
        secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
            redirect_uri: redirect_uri.into(),
            user_data: None,
        }
    }

    pub fn with_user_data(mut self, user_data: Value) -> Self {
        self.user_data = Some(user_data);
        self
    }
}

impl Client for DefaultClient {
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
        self.user_data.clone()
    }
}
