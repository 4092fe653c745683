//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub backend_url: String,
    pub backend_timeout: Duration,
    pub size_table_path: Option<PathBuf>,
    pub cors_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3001".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        // --- Backend Settings ---
        let backend_url = lookup("BACKEND_URL")
            .unwrap_or_else(|| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();
        if backend_url.is_empty() {
            return Err(ConfigError::MissingVar("BACKEND_URL".to_string()));
        }

        let backend_timeout_ms = match lookup("BACKEND_TIMEOUT_MS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidValue("BACKEND_TIMEOUT_MS".to_string(), e.to_string())
            })?,
            None => 5_000,
        };

        // --- Size Table ---
        let size_table_path = lookup("SIZE_TABLE_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            bind_address,
            log_level,
            backend_url,
            backend_timeout: Duration::from_millis(backend_timeout_ms),
            size_table_path,
            cors_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).expect("defaults are valid");
        assert_eq!(config.bind_address.port(), 3001);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.backend_url, "http://localhost:8080");
        assert_eq!(config.backend_timeout, Duration::from_millis(5_000));
        assert!(config.size_table_path.is_none());
    }

    #[test]
    fn reads_overrides_and_trims_backend_url() {
        let config = Config::from_lookup(lookup_from(&[
            ("BACKEND_URL", "https://backend.example/"),
            ("BACKEND_TIMEOUT_MS", "250"),
            ("SIZE_TABLE_PATH", "config/sizes.toml"),
            ("RUST_LOG", "debug"),
        ]))
        .expect("valid overrides");
        assert_eq!(config.backend_url, "https://backend.example");
        assert_eq!(config.backend_timeout, Duration::from_millis(250));
        assert_eq!(config.size_table_path, Some(PathBuf::from("config/sizes.toml")));
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("BIND_ADDRESS", "nowhere")])),
            Err(ConfigError::InvalidValue(var, _)) if var == "BIND_ADDRESS"
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("RUST_LOG", "chatty")])),
            Err(ConfigError::InvalidValue(var, _)) if var == "RUST_LOG"
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("BACKEND_URL", "/")])),
            Err(ConfigError::MissingVar(var)) if var == "BACKEND_URL"
        ));
    }
}
