//! Calling identity supplied by the session collaborator

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::DomainError;

/// The authenticated principal on whose behalf an operation runs.
///
/// Every key store query is scoped to a principal; the manager never
/// issues an unscoped query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolves a session token to the calling principal.
///
/// The manager trusts whatever identity this collaborator establishes;
/// how tokens are issued and verified is outside the core.
#[async_trait]
pub trait SessionVerifier: Send + Sync + Debug {
    /// Resolve a bearer token. `Ok(None)` means the token is unknown or
    /// no longer valid.
    async fn verify(&self, token: &str) -> Result<Option<Principal>, DomainError>;
}
