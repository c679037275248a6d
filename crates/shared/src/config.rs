//! Application configuration management.

use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Financing engine configuration.
    #[serde(default)]
    pub financing: FinancingConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Financing engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FinancingConfig {
    /// Whether calculations return a step trace when the request does not say.
    #[serde(default = "default_include_trace")]
    pub include_trace_by_default: bool,
    /// Maximum number of records accepted by a single batch request.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Currency used when formatting totals for display.
    #[serde(default = "default_currency")]
    pub currency: Currency,
}

impl Default for FinancingConfig {
    fn default() -> Self {
        Self {
            include_trace_by_default: default_include_trace(),
            max_batch_size: default_max_batch_size(),
            currency: default_currency(),
        }
    }
}

fn default_include_trace() -> bool {
    true
}

fn default_max_batch_size() -> usize {
    500
}

fn default_currency() -> Currency {
    Currency::Php
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of the human-readable format.
    #[serde(default)]
    pub json: bool,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("CIVICA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
