use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::{AuthorizeData, DynClient};

/// An issued access token, optionally paired with a refresh token.
#[derive(Debug, Clone)]
pub struct AccessData {
    pub client: DynClient,
    /// Authorization code this token was exchanged for, if any.
    pub authorize_data: Option<Box<AuthorizeData>>,
    /// Previous access token when this one was issued through a refresh.
    pub access_data: Option<Box<AccessData>>,
    pub access_token: String,
    /// Empty when no refresh token was issued.
    pub refresh_token: String,
    pub expires_in: i32,
    pub scope: String,
    pub redirect_uri: String,
    pub created_at: DateTime<Utc>,
    pub user_data: Option<Value>,
}

impl AccessData {
    pub fn new(client: DynClient, access_token: impl Into<String>) -> Self {
        Self {
            client,
            authorize_data: None,
            access_data: None,
            access_token: access_token.into(),
            refresh_token: String::new(),
            expires_in: 0,
            scope: String::new(),
            redirect_uri: String::new(),
            created_at: Utc::now(),
            user_data: None,
        }
    }

    pub fn expire_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::seconds(i64::from(self.expires_in))
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expire_at()
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
