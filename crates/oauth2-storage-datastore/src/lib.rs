//! OAuth2 grant storage on top of a key-value document store.
//!
//! Each record type maps to one entity kind and is keyed by its natural
//! identifier:
//!
//! | kind | key |
//! |---|---|
//! | [`KIND_CLIENT`] | client id |
//! | [`KIND_AUTHORIZE_DATA`] | authorization code |
//! | [`KIND_ACCESS_DATA`] | access token |
//! | [`KIND_REFRESH`] | refresh token |
//!
//! [`DatastoreStorage`] implements [`oauth2_ports::Storage`] over any
//! [`oauth2_ports::Datastore`]. [`ClientStorage`] manages client
//! registrations, which the storage contract itself only reads.

mod access;
mod authorize;
mod client;
mod codec;
mod error;
mod memory;
mod refresh;
mod repository;
mod storage;

pub use access::KIND_ACCESS_DATA;
pub use authorize::KIND_AUTHORIZE_DATA;
pub use client::{ClientStorage, DatastoreClient, KIND_CLIENT};
pub use error::StoreError;
pub use memory::MemoryDatastore;
pub use refresh::KIND_REFRESH;
pub use storage::DatastoreStorage;
