use std::sync::Arc;

use oauth2_datastore::storage::{observed_storage, ClientStorage, DatastoreStorage};
use oauth2_datastore::{DynDatastore, MemoryDatastore};

mod common;

#[tokio::test]
async fn memory_storage_satisfies_contract() -> Result<(), Box<dyn std::error::Error>> {
    let datastore: DynDatastore = Arc::new(MemoryDatastore::new());
    let storage = DatastoreStorage::new(datastore.clone());

    common::run_storage_contract(&storage, &ClientStorage::new(datastore)).await
}

#[tokio::test]
async fn observed_memory_storage_satisfies_contract() -> Result<(), Box<dyn std::error::Error>> {
    let datastore: DynDatastore = Arc::new(MemoryDatastore::new());
    let storage = observed_storage(datastore.clone(), "memory", None);

    common::run_storage_contract(storage.as_ref(), &ClientStorage::new(datastore)).await
}
