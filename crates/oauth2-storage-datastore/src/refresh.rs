use serde::{Deserialize, Serialize};

use crate::repository::NamedEntity;

/// Entity kind mapping refresh tokens to access tokens.
pub const KIND_REFRESH: &str = "refresh";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct RefreshEntity {
    #[serde(skip)]
    pub(crate) refresh_token: String,
    pub(crate) access_token: String,
}

impl RefreshEntity {
    pub(crate) fn new(refresh_token: &str, access_token: &str) -> Self {
        Self {
            refresh_token: refresh_token.to_string(),
            access_token: access_token.to_string(),
        }
    }
}

impl NamedEntity for RefreshEntity {
    const KIND: &'static str = KIND_REFRESH;

    fn key_name(&self) -> &str {
        &self.refresh_token
    }

    fn set_key_name(&mut self, name: String) {
        self.refresh_token = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Repository;
    use crate::MemoryDatastore;
    use oauth2_ports::Key;
    use std::sync::Arc;

    #[tokio::test]
    async fn refresh_is_keyed_by_refresh_token() {
        let datastore = Arc::new(MemoryDatastore::new());
        let repo = Repository::<RefreshEntity>::new(datastore.clone());

        repo.put(&RefreshEntity::new("refresh", "access"))
            .await
            .unwrap();

        let stored = datastore
            .entity(&Key::name_key(KIND_REFRESH, "refresh"))
            .expect("refresh entity should exist");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored["access_token"], "access");

        let fetched = repo.get("refresh").await.unwrap();
        assert_eq!(fetched, RefreshEntity::new("refresh", "access"));
    }

    #[tokio::test]
    async fn delete_removes_mapping() {
        let datastore = Arc::new(MemoryDatastore::new());
        let repo = Repository::<RefreshEntity>::new(datastore.clone());
        repo.put(&RefreshEntity::new("refresh", "access"))
            .await
            .unwrap();

        repo.delete("refresh").await.unwrap();

        assert!(datastore.is_empty());
    }
}
