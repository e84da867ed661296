use std::fmt;

use oauth2_core::OAuth2Error;
use oauth2_ports::DatastoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A client was written without an id.
    EmptyClientId,
    /// Record user data was something other than a string.
    InvalidUserDataType,
    Datastore(DatastoreError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Datastore(err) if err.is_no_such_entity())
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyClientId => write!(f, "client id is empty"),
            Self::InvalidUserDataType => write!(f, "user_data must be a string"),
            Self::Datastore(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Datastore(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DatastoreError> for StoreError {
    fn from(err: DatastoreError) -> Self {
        Self::Datastore(err)
    }
}

impl From<StoreError> for OAuth2Error {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::Datastore(DatastoreError::NoSuchEntity(_)) => OAuth2Error::not_found(),
            StoreError::EmptyClientId | StoreError::InvalidUserDataType => {
                OAuth2Error::invalid_request(&err.to_string())
            }
            StoreError::Datastore(_) => OAuth2Error::server_error(&err.to_string()),
        }
    }
}
