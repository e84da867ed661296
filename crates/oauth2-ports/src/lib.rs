//! Integration ports for OAuth2 grant storage.
//!
//! [`Storage`] is the contract an authorization server calls into.
//! [`Datastore`] is the narrow key-value document-store client an adapter
//! needs; implement it to put the adapter on top of another backend.

pub mod datastore;
pub mod storage;

pub use datastore::*;
pub use storage::*;
