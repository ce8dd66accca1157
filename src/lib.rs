//! keymint
//!
//! API key issuance and lifecycle management: mints bearer credentials
//! that are disclosed exactly once, lists and updates the resulting
//! records per owning principal, and hard-deletes them on revoke.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::AppState;
use domain::api_key::{Clock, SystemClock};
use infrastructure::api_key::{ApiKeyManager, InMemoryKeyStore, SecretGenerator};
use infrastructure::session::StaticTokenVerifier;

/// Build the application state from configuration.
///
/// Wires the in-memory key store, the system clock and the static
/// session verifier behind the service traits the API layer consumes.
pub fn create_app_state(config: &AppConfig) -> AppState {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let store = Arc::new(InMemoryKeyStore::new(clock.clone()));
    let manager = ApiKeyManager::new(store, clock.clone())
        .with_generator(SecretGenerator::new(config.api_keys.secret_prefix.clone()));

    let sessions = Arc::new(StaticTokenVerifier::new(config.sessions.tokens.clone()));

    AppState::new(
        Arc::new(manager),
        sessions,
        clock,
        config.api_keys.clone(),
    )
}
