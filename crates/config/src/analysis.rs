//! Reconstruction, anomaly and session thresholds

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reconstruction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// IANA timezone the kiosk clock runs in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default)]
    pub thresholds: AnomalyThresholds,

    /// Opening clip length per `audio_id`, overriding the default clip
    #[serde(default)]
    pub opening_clip_ms: HashMap<String, i64>,
}

fn default_timezone() -> String {
    "Asia/Jerusalem".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            thresholds: AnomalyThresholds::default(),
            opening_clip_ms: HashMap::new(),
        }
    }
}

impl AnalysisConfig {
    /// Clip length for an opening audio id, falling back to the default clip
    pub fn clip_duration_ms(&self, audio_id: Option<&str>) -> i64 {
        audio_id
            .and_then(|id| self.opening_clip_ms.get(id).copied())
            .unwrap_or(self.thresholds.opening_clip_ms)
    }
}

/// Anomaly detector thresholds, milliseconds unless noted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyThresholds {
    /// Total latency (T3 - T1) warning
    #[serde(default = "default_latency_warn")]
    pub latency_warn_ms: i64,

    #[serde(default = "default_latency_critical")]
    pub latency_critical_ms: i64,

    #[serde(default = "default_opening_warn")]
    pub opening_warn_ms: i64,

    #[serde(default = "default_opening_critical")]
    pub opening_critical_ms: i64,

    /// Default opening clip length
    #[serde(default = "default_opening_clip")]
    pub opening_clip_ms: i64,

    /// Questions with fewer words are flagged as truncated
    #[serde(default = "default_truncation_words")]
    pub stt_truncation_words: usize,
}

fn default_latency_warn() -> i64 {
    3000
}
fn default_latency_critical() -> i64 {
    6000
}
fn default_opening_warn() -> i64 {
    3000
}
fn default_opening_critical() -> i64 {
    5000
}
fn default_opening_clip() -> i64 {
    3000
}
fn default_truncation_words() -> usize {
    4
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            latency_warn_ms: default_latency_warn(),
            latency_critical_ms: default_latency_critical(),
            opening_warn_ms: default_opening_warn(),
            opening_critical_ms: default_opening_critical(),
            opening_clip_ms: default_opening_clip(),
            stt_truncation_words: default_truncation_words(),
        }
    }
}

/// Session segmentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Gap that starts a new session
    #[serde(default = "default_gap_minutes")]
    pub gap_minutes: i64,

    /// Dominant question-type share above which a session is flagged
    #[serde(default = "default_skew")]
    pub question_type_skew: f64,
}

fn default_gap_minutes() -> i64 {
    30
}
fn default_skew() -> f64 {
    0.7
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gap_minutes: default_gap_minutes(),
            question_type_skew: default_skew(),
        }
    }
}
