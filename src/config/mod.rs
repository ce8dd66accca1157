//! Application configuration

mod app_config;

pub use app_config::{
    ApiKeySettings, AppConfig, LogFormat, LoggingConfig, ServerConfig, SessionSettings,
    THIRTY_DAYS_SECS,
};
