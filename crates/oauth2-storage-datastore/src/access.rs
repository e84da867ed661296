use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use oauth2_core::{join_scope, split_scope, AccessData, AuthorizeData, Client, DynClient};

use crate::codec::{narrow_expires_in, user_data_from_property, user_data_to_property};
use crate::repository::NamedEntity;
use crate::StoreError;

/// Entity kind of issued access tokens.
pub const KIND_ACCESS_DATA: &str = "access_data";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AccessEntity {
    #[serde(skip)]
    pub(crate) access_token: String,
    pub(crate) parent_access_token: String,
    pub(crate) client_key: String,
    pub(crate) authorize_code: String,
    pub(crate) refresh_token: String,
    pub(crate) expires_in: i64,
    pub(crate) scope: Vec<String>,
    pub(crate) redirect_uri: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) user_data: String,
}

impl AccessEntity {
    /// Related records are stored as references: the client by id, the
    /// authorization by code and the previous access token by its value.
    pub(crate) fn from_record(data: &AccessData) -> Result<Self, StoreError> {
        Ok(Self {
            access_token: data.access_token.clone(),
            parent_access_token: data
                .access_data
                .as_ref()
                .map(|parent| parent.access_token.clone())
                .unwrap_or_default(),
            client_key: data.client.id().to_string(),
            authorize_code: data
                .authorize_data
                .as_ref()
                .map(|auth| auth.code.clone())
                .unwrap_or_default(),
            refresh_token: data.refresh_token.clone(),
            expires_in: i64::from(data.expires_in),
            scope: split_scope(&data.scope),
            redirect_uri: data.redirect_uri.clone(),
            created_at: data.created_at,
            user_data: user_data_to_property(data.user_data.as_ref())?,
        })
    }

    /// The parent access token is not resolved; `access_data` is left empty.
    pub(crate) fn into_record(
        self,
        client: DynClient,
        authorize_data: Option<AuthorizeData>,
    ) -> AccessData {
        AccessData {
            client,
            authorize_data: authorize_data.map(Box::new),
            access_data: None,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_in: narrow_expires_in(self.expires_in),
            scope: join_scope(&self.scope),
            redirect_uri: self.redirect_uri,
            created_at: self.created_at,
            user_data: user_data_from_property(self.user_data),
        }
    }
}

impl NamedEntity for AccessEntity {
    const KIND: &'static str = KIND_ACCESS_DATA;

    fn key_name(&self) -> &str {
        &self.access_token
    }

    fn set_key_name(&mut self, name: String) {
        self.access_token = name;
    }
}
