//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Retail prices API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API version sent with every request
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Currency code for returned prices
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after a rate-limited response
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base wait between rate-limit retries in milliseconds
    #[serde(default = "default_retry_base_wait_ms")]
    pub retry_base_wait_ms: u64,

    /// Default maximum number of results per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Standard customer discount percentage
    #[serde(default = "default_discount")]
    pub default_discount: f64,
}

fn default_endpoint() -> String {
    "https://prices.azure.com/api/retail/prices".to_string()
}

fn default_api_version() -> String {
    "2023-01-01-preview".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_wait_ms() -> u64 {
    5000
}

fn default_max_results() -> usize {
    50
}

fn default_discount() -> f64 {
    10.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_version: default_api_version(),
            currency: default_currency(),
            proxy: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_base_wait_ms: default_retry_base_wait_ms(),
            max_results: default_max_results(),
            default_discount: default_discount(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("azprices").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(endpoint) = std::env::var("AZP_ENDPOINT") {
            self.endpoint = endpoint;
        }

        if let Ok(currency) = std::env::var("AZP_CURRENCY") {
            self.currency = currency;
        }

        if let Ok(proxy) = std::env::var("AZP_PROXY") {
            self.proxy = Some(proxy);
        }

        self
    }
}
