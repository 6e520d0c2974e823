//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{AnalysisConfig, ConfigError, SessionConfig};

/// Environment variable prefix, e.g. `KIOSK_INSIGHT__SESSIONS__GAP_MINUTES`
pub const ENV_PREFIX: &str = "KIOSK_INSIGHT";

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub sessions: SessionConfig,

    /// Translation / classification service
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_analysis()?;
        self.validate_sessions()?;
        self.validate_enrichment()?;
        Ok(())
    }

    fn validate_analysis(&self) -> Result<(), ConfigError> {
        kiosk_insight_core::time::parse_timezone(&self.analysis.timezone).map_err(|e| {
            ConfigError::InvalidValue {
                field: "analysis.timezone".to_string(),
                message: e.to_string(),
            }
        })?;

        let t = &self.analysis.thresholds;
        if t.latency_warn_ms <= 0 || t.opening_warn_ms <= 0 || t.opening_clip_ms <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "analysis.thresholds".to_string(),
                message: "Thresholds must be positive".to_string(),
            });
        }
        if t.latency_critical_ms < t.latency_warn_ms {
            return Err(ConfigError::InvalidValue {
                field: "analysis.thresholds.latency_critical_ms".to_string(),
                message: "Critical threshold below warning threshold".to_string(),
            });
        }
        if t.opening_critical_ms < t.opening_warn_ms {
            return Err(ConfigError::InvalidValue {
                field: "analysis.thresholds.opening_critical_ms".to_string(),
                message: "Critical threshold below warning threshold".to_string(),
            });
        }
        if let Some((id, _)) = self.analysis.opening_clip_ms.iter().find(|(_, ms)| **ms <= 0) {
            return Err(ConfigError::InvalidValue {
                field: format!("analysis.opening_clip_ms.{}", id),
                message: "Clip duration must be positive".to_string(),
            });
        }
        Ok(())
    }

    fn validate_sessions(&self) -> Result<(), ConfigError> {
        if self.sessions.gap_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "sessions.gap_minutes".to_string(),
                message: "Session gap must be positive".to_string(),
            });
        }
        let skew = self.sessions.question_type_skew;
        if !(skew > 0.0 && skew <= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "sessions.question_type_skew".to_string(),
                message: "Skew ratio must be in (0, 1]".to_string(),
            });
        }
        Ok(())
    }

    fn validate_enrichment(&self) -> Result<(), ConfigError> {
        if !self.enrichment.enabled {
            return Ok(());
        }
        if self.enrichment.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingField("enrichment.endpoint".to_string()));
        }
        if self.enrichment.max_chars == 0 {
            return Err(ConfigError::InvalidValue {
                field: "enrichment.max_chars".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// External translation / classification service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    #[serde(default)]
    pub enabled: bool,

    /// OpenAI-compatible base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Pause between consecutive service calls
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Text sent to the service is truncated to this many characters
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    #[serde(default = "default_true")]
    pub translate: bool,

    #[serde(default = "default_true")]
    pub classify: bool,
}

fn default_endpoint() -> String {
    "https://api.openai.com".to_string()
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    3
}
fn default_delay_ms() -> u64 {
    500
}
fn default_max_chars() -> usize {
    500
}
fn default_true() -> bool {
    true
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            delay_ms: default_delay_ms(),
            max_chars: default_max_chars(),
            translate: true,
            classify: true,
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (`KIOSK_INSIGHT__` prefix)
/// 2. config/{env}.{yaml,toml,json} (if env specified)
/// 3. config/default.{yaml,toml,json}
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Same as [`load_settings`] with an explicit configuration directory
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    let default_path = dir.join("default");
    builder = builder.add_source(File::with_name(&default_path.to_string_lossy()).required(false));

    if let Some(env_name) = env {
        let env_path = dir.join(env_name);
        builder = builder.add_source(File::with_name(&env_path.to_string_lossy()).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    tracing::debug!(dir = %dir.display(), env = ?env, "Settings loaded");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.analysis.timezone, "Asia/Jerusalem");
        assert_eq!(settings.analysis.thresholds.latency_critical_ms, 6000);
        assert_eq!(settings.sessions.gap_minutes, 30);
        assert!(!settings.enrichment.enabled);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.analysis.timezone = "Nowhere/Special".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.analysis.thresholds.latency_critical_ms = 1000;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.sessions.question_type_skew = 1.5;
        assert!(settings.validate().is_err());
        settings.sessions.question_type_skew = 1.0;
        assert!(settings.validate().is_ok());

        let mut settings = Settings::default();
        settings.sessions.gap_minutes = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_enrichment_validation_only_when_enabled() {
        let mut settings = Settings::default();
        settings.enrichment.endpoint = String::new();
        assert!(settings.validate().is_ok());

        settings.enrichment.enabled = true;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::MissingField(_))
        ));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("default.toml")).unwrap();
        writeln!(
            file,
            "[sessions]\ngap_minutes = 45\n\n[analysis.thresholds]\nlatency_warn_ms = 2500\n\n[analysis.opening_clip_ms]\n3 = 4100"
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), None).unwrap();
        assert_eq!(settings.sessions.gap_minutes, 45);
        assert_eq!(settings.analysis.thresholds.latency_warn_ms, 2500);
        assert_eq!(settings.analysis.thresholds.latency_critical_ms, 6000);
        assert_eq!(settings.analysis.clip_duration_ms(Some("3")), 4100);
    }

    #[test]
    fn test_environment_file_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("default.toml"), "[sessions]\ngap_minutes = 45\n").unwrap();
        std::fs::write(dir.path().join("kiosk2.toml"), "[sessions]\ngap_minutes = 10\n").unwrap();

        let settings = load_settings_from(dir.path(), Some("kiosk2")).unwrap();
        assert_eq!(settings.sessions.gap_minutes, 10);
    }

    #[test]
    fn test_missing_directory_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join("absent"), None).unwrap();
        assert_eq!(settings.sessions.gap_minutes, 30);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("default.toml"), "[sessions]\ngap_minutes = -5\n").unwrap();
        assert!(load_settings_from(dir.path(), None).is_err());
    }
}
