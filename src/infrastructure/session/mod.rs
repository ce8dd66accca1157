//! Session verification implementations

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::session::{Principal, SessionVerifier};
use crate::domain::DomainError;

/// Session verifier backed by a static token-to-principal map.
///
/// Suitable for development and tests; production deployments bind an
/// identity-provider-backed implementation of [`SessionVerifier`] here.
#[derive(Debug, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, Principal>,
}

impl StaticTokenVerifier {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self {
            tokens: tokens
                .into_iter()
                .map(|(token, principal)| (token, Principal::new(principal)))
                .collect(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>, principal: impl Into<String>) -> Self {
        self.tokens
            .insert(token.into(), Principal::new(principal.into()));
        self
    }
}

#[async_trait]
impl SessionVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Option<Principal>, DomainError> {
        Ok(self.tokens.get(token).cloned())
    }
}
