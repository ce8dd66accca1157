use std::collections::HashMap;

use serde::Deserialize;

/// Default key lifetime applied when a create request omits
/// `expires_at`: 30 days, in seconds.
pub const THIRTY_DAYS_SECS: i64 = 30 * 24 * 60 * 60;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub api_keys: ApiKeySettings,
    pub sessions: SessionSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Key lifecycle settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySettings {
    /// Lifetime applied when a create request omits `expires_at`, seconds
    pub default_ttl_secs: i64,
    /// Type prefix minted into every secret
    pub secret_prefix: String,
}

/// Static session tokens for development deployments
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SessionSettings {
    /// token -> principal id
    pub tokens: HashMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for ApiKeySettings {
    fn default() -> Self {
        Self {
            default_ttl_secs: THIRTY_DAYS_SECS,
            secret_prefix: "km_live_".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("KEYMINT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.api_keys.default_ttl_secs, THIRTY_DAYS_SECS);
        assert_eq!(config.api_keys.secret_prefix, "km_live_");
        assert!(config.sessions.tokens.is_empty());
    }

    #[test]
    fn test_thirty_days_in_seconds() {
        assert_eq!(THIRTY_DAYS_SECS, 2_592_000);
    }
}
