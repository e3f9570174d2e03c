//! Configuration management for DavinciPics signalling
//!
//! Loads configuration from YAML files and environment variables.
//! Environment variables override YAML values.

use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;

/// Default DavinciPics token endpoint
pub const DEFAULT_BASE_URL: &str = "https://davincigraph.art/api/v1/tokens";

/// Placeholder shipped in sample integrations; never a real key
pub const API_KEY_PLACEHOLDER: &str = "___YOUR_API_KEY___";

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Signal endpoint configuration
    pub signal: SignalConfig,
}

/// Signal endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SignalConfig {
    /// Base URL; requests go to `{base_url}/{network}/{address}`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Application API key, sent as `x-api-key`
    pub api_key: SecretString,
    /// Optional whole-request timeout in milliseconds (none by default)
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl SignalConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: SecretString::new(api_key.into()),
            timeout_ms: None,
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            ConfigError::Message(format!("Signal base URL is invalid: {}", e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Message(format!(
                "Signal base URL must be http or https, got {}",
                url.scheme()
            )));
        }
        if url.cannot_be_a_base() {
            return Err(ConfigError::Message(
                "Signal base URL cannot carry a path".to_string(),
            ));
        }

        let key = self.api_key.expose_secret();
        if key.trim().is_empty() {
            return Err(ConfigError::Message(
                "API key must be set via DAVINCI_SIGNAL__API_KEY".to_string(),
            ));
        }
        if key == API_KEY_PLACEHOLDER {
            return Err(ConfigError::Message(
                "API key is still the sample placeholder".to_string(),
            ));
        }

        if self.timeout_ms == Some(0) {
            return Err(ConfigError::Message(
                "Signal timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DAVINCI_*)
    /// 2. config/signal.yaml (if exists)
    /// 3. signal.yaml (if exists)
    /// 4. Default values
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::defaults()?
            .add_source(File::with_name("signal").required(false))
            .add_source(File::with_name("config/signal").required(false))
            .add_source(Self::environment())
            .build()?;

        config.try_deserialize()
    }

    /// Load `.env` into the process environment, then [`AppConfig::load`]
    pub fn load_with_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load()
    }

    /// Load from an explicit file, still overridable by environment
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::defaults()?
            .add_source(File::from(path.as_ref()).required(true))
            .add_source(Self::environment())
            .build()?;

        config.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.signal.validate()
    }

    fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder().set_default("signal.base_url", DEFAULT_BASE_URL)
    }

    // DAVINCI_SIGNAL__API_KEY=... -> signal.api_key
    fn environment() -> Environment {
        Environment::with_prefix("DAVINCI")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }
}
