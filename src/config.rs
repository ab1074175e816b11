//! # Configuration
//!
//! Application configuration loaded from defaults, an optional TOML file and
//! `HEDGEFARM__`-prefixed environment variables, in that order of precedence.
//! A `.env` file is read first when present.
//!
//! ```toml
//! [server]
//! port = 8000
//! log_format = "json"
//!
//! [pricing]
//! strike_increment = 100
//! margin_schedule = [
//!     { min_volume_tonnes = 0, cost_per_tonne = 150 },
//!     { min_volume_tonnes = 500, cost_per_tonne = 200 },
//! ]
//!
//! [market_data]
//! source = "http"
//! base_url = "http://market-data:9000"
//! cache_freshness_secs = 30
//! ```
//!
//! `HEDGEFARM__SERVER__PORT=9000` overrides `server.port`.

use crate::application::services::recommendation::DEFAULT_EPSILON;
use crate::application::services::CalculatorConfig;
use crate::domain::services::ModelConfig;
use config::{Config, Environment, File};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "HEDGEFARM";

/// Config file looked up when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "hedgefarm";

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Default log filter, overridden by `RUST_LOG`.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Frontend origin allowed by CORS; any if unset.
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            cors_origin: None,
        }
    }
}

impl ServerConfig {
    /// Returns `host:port`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Recommendation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Floors within this distance of the best are tied.
    pub epsilon: Decimal,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Market data backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// In-process demo quotes.
    #[default]
    Static,
    /// JSON market data service.
    Http,
}

/// Market data settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    /// Backend to use.
    pub source: SourceKind,
    /// Base URL of the HTTP service.
    pub base_url: Option<String>,
    /// Cache window in seconds, 0 disables caching.
    pub cache_freshness_secs: u64,
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server.
    pub server: ServerConfig,
    /// Instrument model parameters.
    pub pricing: ModelConfig,
    /// Request validation and fetch bounds.
    pub calculator: CalculatorConfig,
    /// Recommendation tie-break.
    pub recommendation: RecommendationConfig,
    /// Market data backend.
    pub market_data: MarketDataConfig,
}

impl AppConfig {
    /// Loads and validates the configuration.
    ///
    /// With `path` the file must exist; without it `hedgefarm.toml` in the
    /// working directory is used if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if a source cannot be read and
    /// `ConfigError::Invalid` if validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Err(e) if !e.not_found() => tracing::warn!(error = %e, "failed to read .env"),
            _ => {}
        }

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: Self = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("calculator.supported_commodities"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pricing
            .validate()
            .map_err(|e| ConfigError::invalid(e.to_string()))?;

        let calculator = &self.calculator;
        if calculator.max_volume_tonnes <= Decimal::ZERO {
            return Err(ConfigError::invalid(
                "calculator.max_volume_tonnes must be positive",
            ));
        }
        if calculator.fetch_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "calculator.fetch_timeout_ms must be positive",
            ));
        }
        if calculator.supported_commodities.is_empty() {
            return Err(ConfigError::invalid(
                "calculator.supported_commodities must not be empty",
            ));
        }

        if self.recommendation.epsilon.is_sign_negative() {
            return Err(ConfigError::invalid(
                "recommendation.epsilon must not be negative",
            ));
        }

        if self.market_data.source == SourceKind::Http
            && self
                .market_data
                .base_url
                .as_deref()
                .is_none_or(|url| url.trim().is_empty())
        {
            return Err(ConfigError::invalid(
                "market_data.base_url is required for the http source",
            ));
        }

        Ok(())
    }
}
