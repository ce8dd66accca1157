//! API key manager
//!
//! Orchestrates the key lifecycle against the injected store and clock.
//! The rules enforced here are the contract: the plaintext secret leaves
//! through `create` exactly once, expiration is validated at creation,
//! and every store call is scoped to the calling principal.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::api_key::{
    ApiKeyId, ApiKeyRecord, ApiKeyUpdate, Clock, CreatedApiKey, KeyStore, NewApiKey,
};
use crate::domain::session::Principal;
use crate::domain::DomainError;

use super::generator::SecretGenerator;

/// Manages the full lifecycle of API key records
#[derive(Debug)]
pub struct ApiKeyManager<S>
where
    S: KeyStore,
{
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    generator: SecretGenerator,
}

impl<S: KeyStore> ApiKeyManager<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            generator: SecretGenerator::production(),
        }
    }

    /// Use a custom secret generator
    pub fn with_generator(mut self, generator: SecretGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Create a new API key.
    ///
    /// `expires_at` must be strictly after the current time; nothing is
    /// persisted otherwise. The returned value is the only one that ever
    /// carries the plaintext secret.
    pub async fn create(
        &self,
        principal: &Principal,
        name: Option<String>,
        expires_at: i64,
    ) -> Result<CreatedApiKey, DomainError> {
        let now = self.clock.now_secs();
        if expires_at <= now {
            return Err(DomainError::invalid_expiration(expires_at, now));
        }

        let generated = self.generator.generate();

        let record = self
            .store
            .create(
                principal,
                NewApiKey {
                    name,
                    secret_hash: generated.hash,
                    key_prefix: generated.prefix,
                    expires_at,
                },
            )
            .await?;

        info!(owner = %principal, id = %record.id(), "API key created");

        Ok(CreatedApiKey {
            record,
            secret: generated.secret,
        })
    }

    /// List the caller's API keys
    pub async fn list(&self, principal: &Principal) -> Result<Vec<ApiKeyRecord>, DomainError> {
        self.store.list(principal).await
    }

    /// Get one of the caller's API keys by id
    pub async fn get(
        &self,
        principal: &Principal,
        id: &ApiKeyId,
    ) -> Result<Option<ApiKeyRecord>, DomainError> {
        self.store.get(principal, id).await
    }

    /// Apply a partial update to one of the caller's API keys.
    ///
    /// Absent fields keep their stored value. A new `expires_at` is not
    /// required to lie in the future: setting a past expiration is an
    /// accepted way to immediately invalidate a key.
    pub async fn update(
        &self,
        principal: &Principal,
        id: &ApiKeyId,
        update: ApiKeyUpdate,
    ) -> Result<ApiKeyRecord, DomainError> {
        let mut record = self
            .store
            .get(principal, id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("API key '{}' not found", id)))?;

        record.apply(update);

        let updated = self.store.update(principal, id, record).await?;

        info!(owner = %principal, id = %id, "API key updated");

        Ok(updated)
    }

    /// Permanently delete one of the caller's API keys. No undo.
    pub async fn revoke(&self, principal: &Principal, id: &ApiKeyId) -> Result<(), DomainError> {
        if !self.store.delete(principal, id).await? {
            debug!(owner = %principal, id = %id, "revoke target not found");
            return Err(DomainError::not_found(format!(
                "API key '{}' not found",
                id
            )));
        }

        info!(owner = %principal, id = %id, "API key revoked");

        Ok(())
    }
}
