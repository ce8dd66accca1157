//! Credential generation
//!
//! Mints cryptographically secure API key secrets and the irreversible
//! hash under which they are persisted.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Result of minting a new secret
#[derive(Debug, Clone)]
pub struct GeneratedSecret {
    /// The full plaintext credential (disclosed once at creation)
    pub secret: String,
    /// Display prefix kept on the record for identification
    pub prefix: String,
    /// The hash under which the credential is stored
    pub hash: String,
}

/// Generator for API key secrets
#[derive(Debug, Clone)]
pub struct SecretGenerator {
    /// Prefix for all minted secrets (e.g. "km_live_", "km_test_")
    prefix: String,
    /// Number of random bytes per secret
    secret_bytes: usize,
}

impl SecretGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            secret_bytes: 32,
        }
    }

    /// Generator for production credentials
    pub fn production() -> Self {
        Self::new("km_live_")
    }

    /// Generator for test credentials
    pub fn test() -> Self {
        Self::new("km_test_")
    }

    /// Mint a new secret
    pub fn generate(&self) -> GeneratedSecret {
        let mut random_bytes = vec![0u8; self.secret_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        let encoded = URL_SAFE_NO_PAD.encode(&random_bytes);
        self.from_material(&encoded)
    }

    /// Build a secret from known material (for deterministic tests)
    pub fn from_material(&self, material: &str) -> GeneratedSecret {
        let secret = format!("{}{}", self.prefix, material);

        // Display prefix is the type prefix + first 8 chars of material
        let prefix = format!("{}{}", self.prefix, &material[..8.min(material.len())]);

        let hash = self.hash_secret(&secret);

        GeneratedSecret {
            secret,
            prefix,
            hash,
        }
    }

    /// Hash a secret for storage
    pub fn hash_secret(&self, secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        let digest = hasher.finalize();
        format!("sha256${}", URL_SAFE_NO_PAD.encode(digest))
    }

    /// Verify a presented secret against a stored hash.
    ///
    /// Not called on the management path (the manager never reads
    /// secrets back); provided for the component that authenticates
    /// presented credentials.
    pub fn verify_secret(&self, secret: &str, stored_hash: &str) -> bool {
        let computed = self.hash_secret(secret);
        constant_time_compare(&computed, stored_hash)
    }
}

impl Default for SecretGenerator {
    fn default() -> Self {
        Self::production()
    }
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut result = 0u8;

    for i in 0..a.len() {
        result |= a_bytes[i] ^ b_bytes[i];
    }

    result == 0
}
