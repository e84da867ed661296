//! Datastore backend selection for OAuth2 grant storage.
//!
//! This crate centralizes URL-based backend selection (in-memory vs Mongo) and
//! wraps the resulting `DatastoreStorage` with `ObservedStorage` for tracing.

use std::sync::Arc;

use oauth2_core::OAuth2Error;
use oauth2_storage_datastore::StoreError;

pub use oauth2_observability::{Metrics, ObservedStorage};
pub use oauth2_ports::{DynDatastore, DynStorage, Storage};
pub use oauth2_storage_datastore::{ClientStorage, DatastoreClient, DatastoreStorage};

pub mod memory {
    pub use oauth2_storage_datastore::MemoryDatastore;
}

#[cfg(feature = "mongo")]
pub mod mongo {
    pub use oauth2_storage_mongo::MongoDatastore;
}

fn is_mongo_url(url: &str) -> bool {
    url.starts_with("mongodb://") || url.starts_with("mongodb+srv://")
}

fn is_memory_url(url: &str) -> bool {
    url == "memory" || url.starts_with("memory://")
}

/// Value recorded as `db_system` on storage spans.
pub fn db_system(url: &str) -> &'static str {
    if is_mongo_url(url) {
        "mongodb"
    } else {
        "memory"
    }
}

/// Backend connection settings that are not part of the URL.
#[derive(Debug, Clone, Default)]
pub struct BackendOptions {
    /// Overrides the database named in the URL.
    pub database: Option<String>,
    /// Driver application name reported to the server.
    pub app_name: Option<String>,
}

/// Create a document-store client based on URL scheme.
///
/// Supported:
/// - `memory://` -> process-local `MemoryDatastore`
/// - `mongodb://...` and `mongodb+srv://...` -> Mongo backend (requires `--features mongo`)
pub async fn create_datastore(url: &str) -> Result<DynDatastore, OAuth2Error> {
    create_datastore_with(url, &BackendOptions::default()).await
}

/// Like [`create_datastore`], applying [`BackendOptions`] where the backend supports them.
pub async fn create_datastore_with(
    url: &str,
    options: &BackendOptions,
) -> Result<DynDatastore, OAuth2Error> {
    if is_memory_url(url) {
        return Ok(Arc::new(memory::MemoryDatastore::new()));
    }

    if is_mongo_url(url) {
        #[cfg(feature = "mongo")]
        {
            let datastore = mongo::MongoDatastore::with_options(
                url,
                options.database.as_deref(),
                options.app_name.as_deref(),
            )
            .await
                .map_err(|e| OAuth2Error::from(StoreError::from(e)))?;
            return Ok(Arc::new(datastore));
        }

        #[cfg(not(feature = "mongo"))]
        {
            let _ = options;
            return Err(OAuth2Error::server_error(
                "MongoDB backend requested but the binary was built without the `mongo` feature",
            ));
        }
    }

    Err(OAuth2Error::invalid_request("unsupported datastore url"))
}

/// Wrap a datastore in the grant-storage facade and tracing decorator.
pub fn observed_storage(
    datastore: DynDatastore,
    db_system: &str,
    metrics: Option<Metrics>,
) -> DynStorage {
    let inner: DynStorage = Arc::new(DatastoreStorage::new(datastore));
    let observed = match metrics {
        Some(metrics) => ObservedStorage::with_metrics(inner, db_system.to_string(), metrics),
        None => ObservedStorage::new(inner, db_system.to_string()),
    };
    Arc::new(observed)
}

/// Create a grant storage backend based on URL scheme.
pub async fn create_storage(url: &str) -> Result<DynStorage, OAuth2Error> {
    let datastore = create_datastore(url).await?;
    Ok(observed_storage(datastore, db_system(url), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oauth2_core::{AuthorizeData, Client};

    #[tokio::test]
    async fn memory_url_yields_working_storage() {
        let datastore = create_datastore("memory://").await.unwrap();
        let clients = ClientStorage::new(datastore.clone());
        clients
            .put(&DatastoreClient::new("c1", "s", "http://localhost/cb"))
            .await
            .unwrap();

        let storage = observed_storage(datastore, "memory", None);
        let client = storage.get_client("c1").await.unwrap();
        assert_eq!(client.id(), "c1");

        let mut data = AuthorizeData::new(client, "code-1");
        data.expires_in = 60;
        storage.save_authorize(&data).await.unwrap();
        assert_eq!(storage.load_authorize("code-1").await.unwrap().code, "code-1");
        storage.healthcheck().await.unwrap();
    }

    #[tokio::test]
    async fn each_memory_datastore_is_independent() {
        let a = create_datastore("memory://").await.unwrap();
        let b = create_datastore("memory://").await.unwrap();
        ClientStorage::new(a)
            .put(&DatastoreClient::new("c1", "s", "http://localhost/cb"))
            .await
            .unwrap();
        let err = ClientStorage::new(b).get("c1").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn unknown_scheme_is_rejected() {
        let err = create_storage("postgres://localhost/oauth2")
            .await
            .err()
            .unwrap();
        assert_eq!(err.error, "invalid_request");
        assert!(err.to_string().contains("unsupported datastore url"));
    }

    #[cfg(not(feature = "mongo"))]
    #[tokio::test]
    async fn mongo_without_feature_fails_fast() {
        let err = create_storage("mongodb://localhost:27017/oauth2_test")
            .await
            .err()
            .unwrap();
        assert!(err
            .to_string()
            .contains("built without the `mongo` feature"));
    }

    #[tokio::test]
    async fn metrics_count_storage_calls() {
        let metrics = Metrics::new().unwrap();
        let datastore = create_datastore("memory://").await.unwrap();
        let storage = observed_storage(datastore, "memory", Some(metrics.clone()));

        assert!(storage.get_client("missing").await.unwrap_err().is_not_found());
        assert_eq!(
            metrics
                .storage_operations_total
                .with_label_values(&["get_client", "not_found"])
                .get(),
            1
        );
    }

    #[test]
    fn db_system_follows_scheme() {
        assert_eq!(db_system("mongodb+srv://cluster/oauth2"), "mongodb");
        assert_eq!(db_system("memory://"), "memory");
    }
}
