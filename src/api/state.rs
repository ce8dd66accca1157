//! Application state for shared services

use std::sync::Arc;

use crate::config::ApiKeySettings;
use crate::domain::api_key::{ApiKeyId, ApiKeyRecord, ApiKeyUpdate, Clock, CreatedApiKey, KeyStore};
use crate::domain::session::{Principal, SessionVerifier};
use crate::domain::DomainError;
use crate::infrastructure::api_key::ApiKeyManager;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub api_keys: Arc<dyn ApiKeyManagerTrait>,
    pub sessions: Arc<dyn SessionVerifier>,
    pub clock: Arc<dyn Clock>,
    pub settings: ApiKeySettings,
}

/// Object-safe view of the API key manager for handlers
#[async_trait::async_trait]
pub trait ApiKeyManagerTrait: Send + Sync {
    async fn create(
        &self,
        principal: &Principal,
        name: Option<String>,
        expires_at: i64,
    ) -> Result<CreatedApiKey, DomainError>;
    async fn list(&self, principal: &Principal) -> Result<Vec<ApiKeyRecord>, DomainError>;
    async fn get(
        &self,
        principal: &Principal,
        id: &str,
    ) -> Result<Option<ApiKeyRecord>, DomainError>;
    async fn update(
        &self,
        principal: &Principal,
        id: &str,
        update: ApiKeyUpdate,
    ) -> Result<ApiKeyRecord, DomainError>;
    async fn revoke(&self, principal: &Principal, id: &str) -> Result<(), DomainError>;
}

#[async_trait::async_trait]
impl<S: KeyStore + 'static> ApiKeyManagerTrait for ApiKeyManager<S> {
    async fn create(
        &self,
        principal: &Principal,
        name: Option<String>,
        expires_at: i64,
    ) -> Result<CreatedApiKey, DomainError> {
        ApiKeyManager::create(self, principal, name, expires_at).await
    }

    async fn list(&self, principal: &Principal) -> Result<Vec<ApiKeyRecord>, DomainError> {
        ApiKeyManager::list(self, principal).await
    }

    async fn get(
        &self,
        principal: &Principal,
        id: &str,
    ) -> Result<Option<ApiKeyRecord>, DomainError> {
        ApiKeyManager::get(self, principal, &ApiKeyId::new(id)).await
    }

    async fn update(
        &self,
        principal: &Principal,
        id: &str,
        update: ApiKeyUpdate,
    ) -> Result<ApiKeyRecord, DomainError> {
        ApiKeyManager::update(self, principal, &ApiKeyId::new(id), update).await
    }

    async fn revoke(&self, principal: &Principal, id: &str) -> Result<(), DomainError> {
        ApiKeyManager::revoke(self, principal, &ApiKeyId::new(id)).await
    }
}

impl AppState {
    pub fn new(
        api_keys: Arc<dyn ApiKeyManagerTrait>,
        sessions: Arc<dyn SessionVerifier>,
        clock: Arc<dyn Clock>,
        settings: ApiKeySettings,
    ) -> Self {
        Self {
            api_keys,
            sessions,
            clock,
            settings,
        }
    }
}
