//! Reconstructed question/answer interactions

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::anomaly::AnomalyCode;
use crate::classification::{ClassificationLabels, Sensitivity, ThankYou, Topic};
use crate::language::Language;
use crate::time::{combine_date_time, parse_local_time};

/// Prefix of the synthetic id given to unanswered questions
pub const ORPHAN_ID_PREFIX: &str = "orphan_";

/// Timing markers of one response group, epoch milliseconds.
///
/// - T0: question-trigger local time
/// - T1: classification received
/// - T2: first answer fragment
/// - T3: last answer fragment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Markers {
    pub t0: Option<i64>,
    pub t1: Option<i64>,
    pub t2: Option<i64>,
    pub t3: Option<i64>,
}

/// Latency phases derived from [`Markers`]. A phase is `None` when an input
/// marker is missing or the difference is negative or overflows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyBreakdown {
    /// T1 - T0
    pub opening_ms: Option<i64>,
    /// T2 - T1
    pub generation_ms: Option<i64>,
    /// T3 - T2
    pub delivery_ms: Option<i64>,
    /// T3 - T1
    pub total_ms: Option<i64>,
}

fn phase(start: Option<i64>, end: Option<i64>) -> Option<i64> {
    end?.checked_sub(start?).filter(|delta| *delta >= 0)
}

impl LatencyBreakdown {
    pub fn from_markers(m: &Markers) -> Self {
        Self {
            opening_ms: phase(m.t0, m.t1),
            generation_ms: phase(m.t1, m.t2),
            delivery_ms: phase(m.t2, m.t3),
            total_ms: phase(m.t1, m.t3),
        }
    }
}

impl Markers {
    /// The first answer fragment arrived before the classification
    pub fn is_out_of_order(&self) -> bool {
        matches!((self.t1, self.t2), (Some(t1), Some(t2)) if t2 < t1)
    }
}

/// One reconstructed exchange
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Correlation id, or `orphan_<n>` for an unanswered question
    pub id: String,
    /// Display sequence, 1-based, assigned after sorting
    pub seq: usize,
    pub is_orphan: bool,
    /// `YYYY-MM-DD`
    pub date: String,
    /// Local time-of-day `HH:MM:SS`
    pub time: String,
    pub hour: u32,

    pub question: String,
    pub answer: String,
    pub question_en: String,
    pub answer_en: String,
    pub needs_translation: bool,

    pub language: Language,
    pub question_type: String,
    pub topic: Topic,
    pub sensitivity: Sensitivity,
    pub opening_text: String,
    pub audio_id: Option<String>,

    /// Opening latency, T1 - T0
    pub opening_latency_ms: Option<i64>,
    /// Generation time, T2 - T1
    pub generation_ms: Option<i64>,
    /// Delivery duration, T3 - T2
    pub delivery_ms: Option<i64>,
    /// Legacy total, T3 - T1
    pub latency_ms: Option<i64>,
    /// Estimated length of the opening clip
    pub opening_audio_duration_ms: Option<i64>,
    /// Generation minus opening clip; positive means audible silence
    pub net_gap_ms: Option<i64>,

    pub answer_length: usize,
    pub chunk_count: usize,
    pub has_classification: bool,
    /// At least one answer fragment arrived
    pub response_received: bool,
    pub is_complete: bool,
    /// Non-success status codes seen in the response group
    pub error_codes: Vec<i64>,
    pub style: Option<String>,
    pub style_degree: Option<f64>,

    pub is_greeting: bool,
    pub vip: Option<String>,
    pub thank_you: Option<ThankYou>,
    pub is_thank_you_interrupt: bool,

    pub anomalies: Vec<AnomalyCode>,
    pub anomaly_type: Option<AnomalyCode>,
    pub is_anomaly: bool,
    pub is_no_answer: bool,
    pub is_comprehension_failure: bool,
    pub is_out_of_order: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<ClassificationLabels>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl Interaction {
    pub fn latency(&self) -> LatencyBreakdown {
        LatencyBreakdown {
            opening_ms: self.opening_latency_ms,
            generation_ms: self.generation_ms,
            delivery_ms: self.delivery_ms,
            total_ms: self.latency_ms,
        }
    }

    pub fn apply_latency(&mut self, latency: LatencyBreakdown) {
        self.opening_latency_ms = latency.opening_ms;
        self.generation_ms = latency.generation_ms;
        self.delivery_ms = latency.delivery_ms;
        self.latency_ms = latency.total_ms;
    }

    /// Local date-time of the interaction, when both fields parse
    pub fn local_datetime(&self) -> Option<NaiveDateTime> {
        combine_date_time(&self.date, &self.time)
            .or_else(|| parse_local_time(&format!("{} {}", self.date, self.time)))
    }

    pub fn has_critical_anomaly(&self) -> bool {
        self.anomalies.iter().any(|a| a.is_critical())
    }

    pub fn has_warning_anomaly(&self) -> bool {
        self.anomalies.iter().any(|a| !a.is_critical())
    }
}
