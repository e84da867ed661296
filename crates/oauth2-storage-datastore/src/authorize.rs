use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use oauth2_core::{join_scope, split_scope, AuthorizeData, Client, DynClient};

use crate::codec::{narrow_expires_in, user_data_from_property, user_data_to_property};
use crate::repository::NamedEntity;
use crate::StoreError;

/// Entity kind of issued authorization codes.
pub const KIND_AUTHORIZE_DATA: &str = "authorize_data";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AuthorizeEntity {
    #[serde(skip)]
    pub(crate) code: String,
    pub(crate) client_key: String,
    pub(crate) expires_in: i64,
    pub(crate) scope: Vec<String>,
    pub(crate) redirect_uri: String,
    pub(crate) state: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) user_data: String,
    pub(crate) code_challenge: String,
    pub(crate) code_challenge_method: String,
}

impl AuthorizeEntity {
    pub(crate) fn from_record(data: &AuthorizeData) -> Result<Self, StoreError> {
        Ok(Self {
            code: data.code.clone(),
            client_key: data.client.id().to_string(),
            expires_in: i64::from(data.expires_in),
            scope: split_scope(&data.scope),
            redirect_uri: data.redirect_uri.clone(),
            state: data.state.clone(),
            created_at: data.created_at,
            user_data: user_data_to_property(data.user_data.as_ref())?,
            code_challenge: data.code_challenge.clone(),
            code_challenge_method: data.code_challenge_method.clone(),
        })
    }

    pub(crate) fn into_record(self, client: DynClient) -> AuthorizeData {
        AuthorizeData {
            client,
            code: self.code,
            expires_in: narrow_expires_in(self.expires_in),
            scope: join_scope(&self.scope),
            redirect_uri: self.redirect_uri,
            state: self.state,
            created_at: self.created_at,
            user_data: user_data_from_property(self.user_data),
            code_challenge: self.code_challenge,
            code_challenge_method: self.code_challenge_method,
        }
    }
}

impl NamedEntity for AuthorizeEntity {
    const KIND: &'static str = KIND_AUTHORIZE_DATA;

    fn key_name(&self) -> &str {
        &self.code
    }

    fn set_key_name(&mut self, name: String) {
        self.code = name;
    }
}
