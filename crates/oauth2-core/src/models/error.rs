use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code used for lookups that matched no stored record.
pub const NOT_FOUND: &str = "not_found";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OAuth2Error {
    pub error: String,
    pub error_description: Option<String>,
    pub error_uri: Option<String>,
}

impl OAuth2Error {
    pub fn new(error: &str, description: Option<&str>) -> Self {
        Self {
            error: error.to_string(),
            error_description: description.map(|s| s.to_string()),
            error_uri: None,
        }
    }

    /// The storage contract's "entity not found" error.
    ///
    /// Authorization servers compare against this to tell a missing
    /// client/code/token apart from a backend failure.
    pub fn not_found() -> Self {
        Self::new(NOT_FOUND, Some("Entity not found"))
    }

    pub fn is_not_found(&self) -> bool {
        self.error == NOT_FOUND
    }

    pub fn server_error(description: &str) -> Self {
        Self::new("server_error", Some(description))
    }

    pub fn invalid_request(description: &str) -> Self {
        Self::new("invalid_request", Some(description))
    }
}

impl fmt::Display for OAuth2Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_description {
            Some(description) => write!(f, "{}: {}", self.error, description),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for OAuth2Error {}
