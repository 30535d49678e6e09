//! Service Settings

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "FLIGHT_DELAY_CONFIG";

/// Configuration file looked up when none is named
pub const DEFAULT_CONFIG_FILE: &str = "flight-delay";

/// Prefix of environment overrides, e.g. `FLIGHT_DELAY_BIND_ADDR`
pub const ENV_PREFIX: &str = "FLIGHT_DELAY";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Listen address
    pub bind_addr: String,
    /// Path of the trained model blob
    pub model_path: String,
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
    pub log_format: LogFormat,
    /// Install the Prometheus recorder and serve `/metrics`
    pub metrics_enabled: bool,
    /// Maximum flights per prediction request
    pub max_batch_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            model_path: "model.bin".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            metrics_enabled: true,
            max_batch_size: 1000,
        }
    }
}

impl ServiceConfig {
    /// Defaults, then the configuration file, then environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::defaults()?
            .add_source(File::with_name(&path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Defaults overlaid with a TOML document
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            .set_default("bind_addr", defaults.bind_addr)?
            .set_default("model_path", defaults.model_path)?
            .set_default("log_level", defaults.log_level)?
            .set_default("log_format", "text")?
            .set_default("metrics_enabled", defaults.metrics_enabled)?
            .set_default("max_batch_size", defaults.max_batch_size as u64)
    }
}
