//! Configuration management for kiosk log reconstruction
//!
//! Supports loading configuration from:
//! - YAML/TOML/JSON files under `config/`
//! - Environment variables (`KIOSK_INSIGHT__` prefix, `__` separator)
//!
//! Sections:
//! - `analysis`: timezone, anomaly thresholds, opening clip lengths
//! - `sessions`: session gap and question-type skew ratio
//! - `enrichment`: translation / classification service
//! - `observability`: log level and format

pub mod analysis;
pub mod settings;

pub use analysis::{AnalysisConfig, AnomalyThresholds, SessionConfig};
pub use settings::{
    load_settings, load_settings_from, EnrichmentConfig, ObservabilityConfig, Settings,
    ENV_PREFIX,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for kiosk_insight_core::Error {
    fn from(err: ConfigError) -> Self {
        kiosk_insight_core::Error::Config(err.to_string())
    }
}
