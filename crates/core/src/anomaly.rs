//! Anomaly codes and their severity classes

use serde::{Deserialize, Serialize};

/// Severity class of an anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Session-level patterns, informational
    Operational,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operational => "operational",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-interaction anomaly code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyCode {
    /// Question heard, no response group claimed it
    SttDropped,
    LangUnknown,
    /// Classification arrived but no answer was streamed
    LlmError,
    /// Answer streamed but its text is empty
    EmptyResponse,
    IncompleteResponse,
    LatencySpikeCritical,
    LatencySpikeWarn,
    OpeningLatencyCritical,
    OpeningLatencyWarn,
    /// Generation outlasted the opening clip
    ThinkOverflow,
    OutOfOrder,
    #[serde(rename = "NON_200_CODE")]
    Non200Code,
    FallbackTriggered,
    PersonaBreak,
    StyleAnomaly,
    SttTruncation,
}

impl AnomalyCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SttDropped => "STT_DROPPED",
            Self::LangUnknown => "LANG_UNKNOWN",
            Self::LlmError => "LLM_ERROR",
            Self::EmptyResponse => "EMPTY_RESPONSE",
            Self::IncompleteResponse => "INCOMPLETE_RESPONSE",
            Self::LatencySpikeCritical => "LATENCY_SPIKE_CRITICAL",
            Self::LatencySpikeWarn => "LATENCY_SPIKE_WARN",
            Self::OpeningLatencyCritical => "OPENING_LATENCY_CRITICAL",
            Self::OpeningLatencyWarn => "OPENING_LATENCY_WARN",
            Self::ThinkOverflow => "THINK_OVERFLOW",
            Self::OutOfOrder => "OUT_OF_ORDER",
            Self::Non200Code => "NON_200_CODE",
            Self::FallbackTriggered => "FALLBACK_TRIGGERED",
            Self::PersonaBreak => "PERSONA_BREAK",
            Self::StyleAnomaly => "STYLE_ANOMALY",
            Self::SttTruncation => "STT_TRUNCATION",
        }
    }

    /// Critical codes are response-pipeline or persona failures; everything
    /// else, latency included, is a warning.
    pub fn severity(&self) -> Severity {
        match self {
            Self::LangUnknown
            | Self::LlmError
            | Self::OutOfOrder
            | Self::Non200Code
            | Self::PersonaBreak => Severity::Critical,
            Self::SttDropped
            | Self::EmptyResponse
            | Self::IncompleteResponse
            | Self::LatencySpikeCritical
            | Self::LatencySpikeWarn
            | Self::OpeningLatencyCritical
            | Self::OpeningLatencyWarn
            | Self::ThinkOverflow
            | Self::FallbackTriggered
            | Self::StyleAnomaly
            | Self::SttTruncation => Severity::Warning,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.severity() == Severity::Critical
    }
}

impl std::fmt::Display for AnomalyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_as_str() {
        for code in [
            AnomalyCode::SttDropped,
            AnomalyCode::Non200Code,
            AnomalyCode::LatencySpikeCritical,
            AnomalyCode::PersonaBreak,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }

    #[test]
    fn test_severity_classes() {
        assert_eq!(AnomalyCode::Non200Code.severity(), Severity::Critical);
        assert_eq!(AnomalyCode::OutOfOrder.severity(), Severity::Critical);
        assert_eq!(AnomalyCode::LatencySpikeCritical.severity(), Severity::Warning);
        assert_eq!(AnomalyCode::FallbackTriggered.severity(), Severity::Warning);
    }
}
