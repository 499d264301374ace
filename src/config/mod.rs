//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Stats API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Service base URL, with or without the `/api` suffix
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Student catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Catalog base URL
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,

    /// Directory for cached catalog documents
    #[serde(default = "default_catalog_cache_dir")]
    pub cache_dir: PathBuf,

    /// Cache lifetime in seconds
    #[serde(default = "default_catalog_ttl")]
    pub cache_ttl_seconds: u64,

    /// UI language tag, mapped onto a catalog document
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_catalog_base_url() -> String {
    "https://schaledb.com/data".to_string()
}

fn default_catalog_cache_dir() -> PathBuf {
    PathBuf::from("./cache/catalog")
}

fn default_catalog_ttl() -> u64 {
    24 * 3600
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: default_catalog_base_url(),
            cache_dir: default_catalog_cache_dir(),
            cache_ttl_seconds: default_catalog_ttl(),
            language: default_language(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path of the key-value state file (auth token, remembered name)
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

fn default_state_file() -> PathBuf {
    PathBuf::from("./arena-lens.state.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            log_level: default_log_level(),
            api: ApiSettings::default(),
            catalog: CatalogSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file when it exists, defaults otherwise.
    pub fn load_or_default(path: &PathBuf) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if url::Url::parse(&self.api.base_url).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "Invalid API base URL: {}",
                self.api.base_url
            )));
        }

        if url::Url::parse(&self.catalog.base_url).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "Invalid catalog base URL: {}",
                self.catalog.base_url
            )));
        }

        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "API timeout must be greater than 0".to_string(),
            ));
        }

        if self.catalog.cache_ttl_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Catalog cache TTL must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.state_file, PathBuf::from("./arena-lens.state.json"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.catalog.language, "en");
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_timeout() {
        let mut config = AppConfig::default();
        config.api.timeout_seconds = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_base_url() {
        let mut config = AppConfig::default();
        config.api.base_url = "not a url".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.api.base_url, parsed.api.base_url);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://stats.example.net"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.api.base_url, "https://stats.example.net");
        assert_eq!(parsed.api.timeout_seconds, 30);
        assert_eq!(parsed.catalog.language, "en");
    }
}
