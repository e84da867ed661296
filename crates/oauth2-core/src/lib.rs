//! OAuth2 grant record shapes.
//!
//! These are the in-memory records an authorization server hands to its
//! storage layer: clients, authorization codes and access/refresh tokens.
//! Storage adapters translate them to and from their own persisted form.

pub mod models;

pub use models::*;
