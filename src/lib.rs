//! Library exports.
//!
//! The grant-storage crates are re-exported here so that the admin binary and
//! integration tests share a single import path.

pub mod admin;

pub use oauth2_config::{Config, DatastoreConfig, TelemetryConfig};
pub use oauth2_core::{
    AccessData, AuthorizeData, Client, DefaultClient, DynClient, OAuth2Error,
};
pub use oauth2_ports::{Datastore, DatastoreError, DynDatastore, DynStorage, Entity, Key, Storage};
pub use oauth2_storage_datastore::{
    ClientStorage, DatastoreClient, DatastoreStorage, MemoryDatastore, StoreError,
    KIND_ACCESS_DATA, KIND_AUTHORIZE_DATA, KIND_CLIENT, KIND_REFRESH,
};

/// Backend selection and the concrete datastore clients.
pub mod storage {
    pub use oauth2_storage_factory::*;
}
