//! Parsed log events
//!
//! One [`Event`] per valid log line. Events are immutable once parsed and
//! carry no correlation; grouping happens in the reconstructor.

use serde::{Deserialize, Serialize};

/// Status code of a successful response sub-event
pub const SUCCESS_CODE: i64 = 200;

/// A single parsed log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// 1-based line number in the source file
    pub line: usize,
    /// Raw local wall-clock string, second precision
    pub time: Option<String>,
    pub kind: EventKind,
}

impl Event {
    pub fn as_trigger(&self) -> Option<&str> {
        match &self.kind {
            EventKind::QuestionTrigger { text } => Some(text),
            _ => None,
        }
    }

    pub fn as_response(&self) -> Option<&ResponseEvent> {
        match &self.kind {
            EventKind::ResponseEnvelope(resp) => Some(resp),
            _ => None,
        }
    }
}

/// Top-level event discriminant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// Speech-to-text output: the visitor's utterance
    QuestionTrigger { text: String },
    /// Envelope around one response sub-event
    ResponseEnvelope(ResponseEvent),
    /// Anything else the kiosk logs
    Other { name: String },
}

/// Sub-event of a generated response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEvent {
    /// Correlation id shared by all sub-events of one response
    pub id: String,
    /// Epoch milliseconds
    pub timestamp_ms: Option<i64>,
    pub code: i64,
    pub payload: SubEvent,
}

impl ResponseEvent {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sub_kind", rename_all = "snake_case")]
pub enum SubEvent {
    Classification(ClassificationPayload),
    StreamFragment(FragmentPayload),
    Other { name: String },
}

/// Upstream classification: declares language and picks the opening clip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationPayload {
    /// Declared locale, e.g. `he-IL`
    pub language: Option<String>,
    pub question_type: Option<String>,
    /// Text of the pre-recorded acknowledgment
    pub opening_text: Option<String>,
    pub audio_id: Option<String>,
}

/// One streamed chunk of the answer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FragmentPayload {
    pub text: String,
    pub finished: bool,
    /// Voice style requested for synthesis
    pub style: Option<String>,
    pub style_degree: Option<f64>,
}
