//! In-memory key store implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::api_key::{ApiKeyId, ApiKeyRecord, Clock, KeyStore, NewApiKey};
use crate::domain::session::Principal;
use crate::domain::DomainError;

/// In-memory implementation of [`KeyStore`].
///
/// Record-level atomicity comes from the write lock; concurrent
/// update/revoke races on the same id resolve last-write-wins.
#[derive(Debug)]
pub struct InMemoryKeyStore {
    clock: Arc<dyn Clock>,
    records: Arc<RwLock<HashMap<String, ApiKeyRecord>>>,
}

impl InMemoryKeyStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl KeyStore for InMemoryKeyStore {
    async fn create(
        &self,
        owner: &Principal,
        key: NewApiKey,
    ) -> Result<ApiKeyRecord, DomainError> {
        let mut records = self.records.write().await;

        let id = Uuid::new_v4().to_string();
        if records.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "API key with ID '{}' already exists",
                id
            )));
        }

        let record = ApiKeyRecord::new(
            ApiKeyId::new(&id),
            owner.clone(),
            key.name,
            key.secret_hash,
            key.key_prefix,
            self.clock.now_secs(),
            key.expires_at,
        );

        records.insert(id, record.clone());
        Ok(record)
    }

    async fn get(
        &self,
        owner: &Principal,
        id: &ApiKeyId,
    ) -> Result<Option<ApiKeyRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .get(id.as_str())
            .filter(|r| r.owner() == owner)
            .cloned())
    }

    async fn list(&self, owner: &Principal) -> Result<Vec<ApiKeyRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.owner() == owner)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        owner: &Principal,
        id: &ApiKeyId,
        record: ApiKeyRecord,
    ) -> Result<ApiKeyRecord, DomainError> {
        let mut records = self.records.write().await;

        match records.get(id.as_str()) {
            Some(existing) if existing.owner() == owner => {
                records.insert(id.as_str().to_string(), record.clone());
                Ok(record)
            }
            _ => Err(DomainError::not_found(format!(
                "API key '{}' not found",
                id
            ))),
        }
    }

    async fn delete(&self, owner: &Principal, id: &ApiKeyId) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;

        match records.get(id.as_str()) {
            Some(existing) if existing.owner() == owner => {
                records.remove(id.as_str());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_key::FixedClock;

    fn store() -> InMemoryKeyStore {
        InMemoryKeyStore::new(Arc::new(FixedClock::new(1_000)))
    }

    fn new_key(name: &str, expires_at: i64) -> NewApiKey {
        NewApiKey {
            name: Some(name.to_string()),
            secret_hash: "sha256$hash".to_string(),
            key_prefix: "km_test_abc12345".to_string(),
            expires_at,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = store();
        let owner = Principal::new("user-1");

        let record = store.create(&owner, new_key("k1", 5_000)).await.unwrap();

        assert_eq!(record.created_at(), 1_000);
        assert_eq!(record.owner(), &owner);

        let retrieved = store.get(&owner, record.id()).await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().name(), Some("k1"));
    }

    #[tokio::test]
    async fn test_create_assigns_unique_ids() {
        let store = store();
        let owner = Principal::new("user-1");

        let a = store.create(&owner, new_key("a", 5_000)).await.unwrap();
        let b = store.create(&owner, new_key("b", 5_000)).await.unwrap();

        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn test_get_does_not_cross_owners() {
        let store = store();
        let owner = Principal::new("user-1");
        let other = Principal::new("user-2");

        let record = store.create(&owner, new_key("k1", 5_000)).await.unwrap();

        assert!(store.get(&other, record.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_by_owner() {
        let store = store();
        let alice = Principal::new("alice");
        let bob = Principal::new("bob");

        store.create(&alice, new_key("a1", 5_000)).await.unwrap();
        store.create(&alice, new_key("a2", 5_000)).await.unwrap();
        store.create(&bob, new_key("b1", 5_000)).await.unwrap();

        assert_eq!(store.list(&alice).await.unwrap().len(), 2);
        assert_eq!(store.list(&bob).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_record() {
        let store = store();
        let owner = Principal::new("user-1");

        let mut record = store.create(&owner, new_key("k1", 5_000)).await.unwrap();
        record.apply(crate::domain::api_key::ApiKeyUpdate {
            name: Some("renamed".to_string()),
            expires_at: None,
        });

        store
            .update(&owner, &record.id().clone(), record.clone())
            .await
            .unwrap();

        let retrieved = store.get(&owner, record.id()).await.unwrap().unwrap();
        assert_eq!(retrieved.name(), Some("renamed"));
    }

    #[tokio::test]
    async fn test_update_foreign_owner_is_not_found() {
        let store = store();
        let owner = Principal::new("user-1");
        let other = Principal::new("user-2");

        let record = store.create(&owner, new_key("k1", 5_000)).await.unwrap();

        let result = store
            .update(&other, &record.id().clone(), record.clone())
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = store();
        let owner = Principal::new("user-1");

        let record = store.create(&owner, new_key("k1", 5_000)).await.unwrap();

        assert!(store.delete(&owner, record.id()).await.unwrap());
        assert!(store.get(&owner, record.id()).await.unwrap().is_none());

        // Second delete finds nothing
        assert!(!store.delete(&owner, record.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_foreign_owner_is_false() {
        let store = store();
        let owner = Principal::new("user-1");
        let other = Principal::new("user-2");

        let record = store.create(&owner, new_key("k1", 5_000)).await.unwrap();

        assert!(!store.delete(&other, record.id()).await.unwrap());
        assert!(store.get(&owner, record.id()).await.unwrap().is_some());
    }
}
