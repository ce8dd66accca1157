//! API key entity and related types

use serde::{Deserialize, Serialize};

use crate::domain::session::Principal;

/// API key identifier, assigned by the key store at creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKeyId(String);

impl ApiKeyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted API key record.
///
/// `id`, `owner`, `secret_hash`, `key_prefix` and `created_at` are
/// write-once: the type exposes no mutators for them, and
/// [`ApiKeyUpdate`] cannot carry them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    /// Unique identifier, assigned by the store
    id: ApiKeyId,
    /// Owning principal
    owner: Principal,
    /// Display name
    name: Option<String>,
    /// Hashed secret, format `sha256$<base64>`.
    /// Stored but never exposed in API responses (separate DTOs used).
    secret_hash: String,
    /// First characters of the credential, kept for identification
    /// after the secret itself is no longer observable
    key_prefix: String,
    /// Creation timestamp, seconds since epoch, assigned by the store
    created_at: i64,
    /// Expiration timestamp, seconds since epoch
    expires_at: i64,
}

impl ApiKeyRecord {
    pub fn new(
        id: ApiKeyId,
        owner: Principal,
        name: Option<String>,
        secret_hash: impl Into<String>,
        key_prefix: impl Into<String>,
        created_at: i64,
        expires_at: i64,
    ) -> Self {
        Self {
            id,
            owner,
            name,
            secret_hash: secret_hash.into(),
            key_prefix: key_prefix.into(),
            created_at,
            expires_at,
        }
    }

    // Getters

    pub fn id(&self) -> &ApiKeyId {
        &self.id
    }

    pub fn owner(&self) -> &Principal {
        &self.owner
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn secret_hash(&self) -> &str {
        &self.secret_hash
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Whether the key has expired at the given instant.
    ///
    /// The manager never transitions records based on this; expiration is
    /// a value compared by whatever authenticates presented credentials.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }

    /// Apply a partial update. Absent fields keep their stored value.
    pub fn apply(&mut self, update: ApiKeyUpdate) {
        if let Some(name) = update.name {
            self.name = Some(name);
        }
        if let Some(expires_at) = update.expires_at {
            self.expires_at = expires_at;
        }
    }
}

/// Creation payload handed to the key store.
///
/// The store allocates the id, stamps `created_at` and attaches the
/// owner from the scoped call.
#[derive(Debug, Clone)]
pub struct NewApiKey {
    pub name: Option<String>,
    pub secret_hash: String,
    pub key_prefix: String,
    pub expires_at: i64,
}

/// Partial update for an API key. Only mutable fields exist here.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyUpdate {
    pub name: Option<String>,
    pub expires_at: Option<i64>,
}

/// Result of creating a new API key.
///
/// The plaintext secret appears here and nowhere else; every other read
/// path returns the record, whose secret field is an irreversible hash.
#[derive(Debug)]
pub struct CreatedApiKey {
    pub record: ApiKeyRecord,
    pub secret: String,
}
