use std::sync::Arc;

use chrono::{TimeZone, Utc};
use oauth2_datastore::{
    AccessData, AuthorizeData, Client, ClientStorage, DatastoreClient, DynClient, Storage,
};
use serde_json::Value;

fn other(msg: impl Into<String>) -> std::io::Error {
    std::io::Error::other(msg.into())
}

/// A minimal contract test suite that every datastore backend must satisfy.
///
/// `clients` must write to the same datastore `storage` reads from.
pub async fn run_storage_contract(
    storage: &dyn Storage,
    clients: &ClientStorage,
) -> Result<(), Box<dyn std::error::Error>> {
    let created_at = Utc
        .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .ok_or_else(|| other("bad timestamp"))?;

    // Client registration is visible through the storage contract.
    clients
        .put(&DatastoreClient::new("client_1", "secret", "http://localhost/cb").with_user_data("tenant"))
        .await?;

    let client: DynClient = storage.get_client("client_1").await?;
    assert_eq!(client.id(), "client_1");
    assert_eq!(client.redirect_uri(), "http://localhost/cb");
    assert!(client.secret_matches("secret"));
    assert_eq!(client.user_data(), Some(Value::String("tenant".into())));

    let missing = storage.get_client("nope").await;
    assert!(missing.is_err_and(|e| e.is_not_found()));

    // Authorization code roundtrip.
    let mut authorize = AuthorizeData::new(client.clone(), "code_1");
    authorize.expires_in = 600;
    authorize.scope = "read write".to_string();
    authorize.redirect_uri = "http://localhost/cb".to_string();
    authorize.state = "xyz".to_string();
    authorize.created_at = created_at;
    authorize.user_data = Some(Value::String("user-42".into()));
    authorize.code_challenge = "challenge".to_string();
    authorize.code_challenge_method = "S256".to_string();

    storage.save_authorize(&authorize).await?;
    let loaded = storage.load_authorize("code_1").await?;
    assert_eq!(loaded.code, "code_1");
    assert_eq!(loaded.client.id(), "client_1");
    assert_eq!(loaded.expires_in, 600);
    assert_eq!(loaded.scope, "read write");
    assert_eq!(loaded.state, "xyz");
    assert_eq!(loaded.created_at, created_at);
    assert_eq!(loaded.user_data, authorize.user_data);
    assert_eq!(loaded.code_challenge_method, "S256");

    // Non-string user data cannot be stored.
    let mut bad = authorize.clone();
    bad.code = "code_bad".to_string();
    bad.user_data = Some(serde_json::json!({ "k": 1 }));
    let err = storage
        .save_authorize(&bad)
        .await
        .err()
        .ok_or_else(|| other("object user data should be rejected"))?;
    assert_eq!(err.error, "invalid_request");

    // Access token with refresh token, exchanged for the code above.
    let mut access = AccessData::new(client.clone(), "access_1");
    access.authorize_data = Some(Box::new(authorize.clone()));
    access.refresh_token = "refresh_1".to_string();
    access.expires_in = 3600;
    access.scope = "read".to_string();
    access.redirect_uri = "http://localhost/cb".to_string();
    access.created_at = created_at;

    storage.save_access(&access).await?;
    let loaded = storage.load_access("access_1").await?;
    assert_eq!(loaded.access_token, "access_1");
    assert_eq!(loaded.refresh_token, "refresh_1");
    assert_eq!(loaded.client.id(), "client_1");
    assert_eq!(loaded.scope, "read");
    assert_eq!(loaded.created_at, created_at);
    assert!(loaded.access_data.is_none());
    let authorize_code = loaded
        .authorize_data
        .as_ref()
        .map(|a| a.code.clone())
        .ok_or_else(|| other("authorize data should be linked"))?;
    assert_eq!(authorize_code, "code_1");

    let by_refresh = storage.load_refresh("refresh_1").await?;
    assert_eq!(by_refresh.access_token, "access_1");

    // A refreshed token keeps only a reference to its parent.
    let mut refreshed = AccessData::new(Arc::clone(&client), "access_2");
    refreshed.access_data = Some(Box::new(access.clone()));
    refreshed.expires_in = 3600;
    storage.save_access(&refreshed).await?;
    let loaded = storage.load_access("access_2").await?;
    assert!(loaded.access_data.is_none());
    assert!(loaded.authorize_data.is_none());
    assert!(loaded.refresh_token.is_empty());
    assert!(storage.load_refresh("").await.is_err());

    // Removal.
    storage.remove_refresh("refresh_1").await?;
    assert!(storage
        .load_refresh("refresh_1")
        .await
        .is_err_and(|e| e.is_not_found()));
    assert!(storage.load_access("access_1").await.is_ok());

    storage.remove_authorize("code_1").await?;
    assert!(storage
        .load_authorize("code_1")
        .await
        .is_err_and(|e| e.is_not_found()));
    // The access token now dangles on its code.
    assert!(storage
        .load_access("access_1")
        .await
        .is_err_and(|e| e.is_not_found()));

    storage.remove_access("access_1").await?;
    storage.remove_access("access_1").await?;
    storage.remove_access("access_2").await?;
    assert!(storage
        .load_access("access_2")
        .await
        .is_err_and(|e| e.is_not_found()));

    storage.healthcheck().await?;
    Ok(())
}
