//! Key store trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::record::{ApiKeyId, ApiKeyRecord, NewApiKey};
use crate::domain::session::Principal;
use crate::domain::DomainError;

/// Persistence contract for API key records.
///
/// Every method takes the owning principal, so an unscoped query cannot
/// be expressed. The store assigns `id` and `created_at` on create and
/// provides whatever per-record atomicity the operations get; the
/// manager adds no locking of its own.
#[async_trait]
pub trait KeyStore: Send + Sync + Debug {
    /// Persist a new record. Assigns the id and creation timestamp.
    async fn create(
        &self,
        owner: &Principal,
        key: NewApiKey,
    ) -> Result<ApiKeyRecord, DomainError>;

    /// Fetch one of the owner's records by id.
    async fn get(
        &self,
        owner: &Principal,
        id: &ApiKeyId,
    ) -> Result<Option<ApiKeyRecord>, DomainError>;

    /// All live records owned by the principal, in store-defined order.
    async fn list(&self, owner: &Principal) -> Result<Vec<ApiKeyRecord>, DomainError>;

    /// Replace one of the owner's records in place.
    async fn update(
        &self,
        owner: &Principal,
        id: &ApiKeyId,
        record: ApiKeyRecord,
    ) -> Result<ApiKeyRecord, DomainError>;

    /// Permanently delete one of the owner's records. Returns whether a
    /// record was removed.
    async fn delete(&self, owner: &Principal, id: &ApiKeyId) -> Result<bool, DomainError>;
}
