//! Configuration types and loading

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Backend address used when nothing else is configured
pub const DEFAULT_STORE_URL: &str = "http://localhost:3001";

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Remote store configuration
    pub store: StoreConfig,

    /// Mutation engine configuration
    pub engine: EngineConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the REST backend
    pub base_url: String,
    /// Per-request timeout; 0 disables the timeout
    pub request_timeout_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_STORE_URL.to_string(),
            request_timeout_seconds: 0,
        }
    }
}

impl StoreConfig {
    pub fn request_timeout(&self) -> Option<std::time::Duration> {
        (self.request_timeout_seconds > 0)
            .then(|| std::time::Duration::from_secs(self.request_timeout_seconds))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Serialize optimistic writes per project. When off, overlapping writes
    /// on one project may resolve out of order and a late rollback can
    /// revert newer local state.
    pub serialize_writes: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            serialize_writes: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,kb_services=debug,kb_store=debug".to_string(),
            json: false,
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
    #[error("Config file error: {0}")]
    FileError(String),
}

impl From<ConfigError> for crate::error::KbError {
    fn from(err: ConfigError) -> Self {
        crate::error::KbError::Config(err.to_string())
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value, "true" | "1" | "yes")
}

impl AppConfig {
    /// Load configuration from environment variables (after reading `.env`)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let mut config = Self::default();

        if let Ok(url) = std::env::var("KANBAN_STORE_URL") {
            config.store.base_url = url;
        }
        if let Ok(timeout) = std::env::var("KANBAN_REQUEST_TIMEOUT_SECONDS") {
            config.store.request_timeout_seconds =
                timeout.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "KANBAN_REQUEST_TIMEOUT_SECONDS".to_string(),
                    message: format!("expected seconds, got {:?}", timeout),
                })?;
        }
        if let Ok(v) = std::env::var("KANBAN_SERIALIZE_WRITES") {
            config.engine.serialize_writes = parse_bool(&v);
        }
        if let Ok(filter) = std::env::var("KANBAN_LOG") {
            config.logging.filter = filter;
        }
        if let Ok(v) = std::env::var("KANBAN_LOG_JSON") {
            config.logging.json = parse_bool(&v);
        }

        config.validate()?;
        debug!(store = %config.store.base_url, "configuration read from environment");
        Ok(config)
    }

    /// Load an optional config file, then apply `KANBAN__SECTION__KEY`
    /// environment overrides on top of it.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("KANBAN")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigError::FileError(e.to_string()))?;

        config.validate()?;
        debug!(?path, store = %config.store.base_url, "configuration loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.store.base_url).map_err(|e| ConfigError::InvalidValue {
            key: "store.base_url".to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.store.base_url, DEFAULT_STORE_URL);
        assert!(config.engine.serialize_writes);
        assert!(config.store.request_timeout().is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[store]\nbase_url = \"http://store.internal:8080\"\nrequest_timeout_seconds = 15\n\n[engine]\nserialize_writes = false"
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.store.base_url, "http://store.internal:8080");
        assert_eq!(
            config.store.request_timeout(),
            Some(std::time::Duration::from_secs(15))
        );
        assert!(!config.engine.serialize_writes);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[store]\nbase_url = \"not a url\"").unwrap();

        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("1"));
        assert!(parse_bool("yes"));
        assert!(!parse_bool("off"));
    }
}
