use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::DynClient;

/// An issued authorization code and the request it was issued for.
#[derive(Debug, Clone)]
pub struct AuthorizeData {
    pub client: DynClient,
    pub code: String,
    /// Lifetime in seconds, counted from `created_at`.
    pub expires_in: i32,
    /// Space-separated scope string.
    pub scope: String,
    pub redirect_uri: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub user_data: Option<Value>,
    /// PKCE challenge (RFC 7636); empty when the request carried none.
    pub code_challenge: String,
    pub code_challenge_method: String,
}

impl AuthorizeData {
    pub fn new(client: DynClient, code: impl Into<String>) -> Self {
        Self {
            client,
            code: code.into(),
            expires_in: 0,
            scope: String::new(),
            redirect_uri: String::new(),
            state: String::new(),
            created_at: Utc::now(),
            user_data: None,
            code_challenge: String::new(),
            code_challenge_method: String::new(),
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
