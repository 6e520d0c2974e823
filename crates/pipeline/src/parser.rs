//! Line-delimited event log parser
//!
//! Each line is parsed on its own. A line that is not a JSON object with a
//! string `type` is counted and skipped; it never aborts the file.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use kiosk_insight_core::{
    ClassificationPayload, Event, EventKind, FragmentPayload, ResponseEvent, SubEvent,
    SUCCESS_CODE,
};

/// Top-level type of a speech-to-text line
pub const TRIGGER_TYPE: &str = "stt";
/// Top-level type of a response envelope
pub const RESPONSE_TYPE: &str = "ai_message";
pub const CLASSIFICATION_TYPE: &str = "waiting_audio";
pub const FRAGMENT_TYPE: &str = "stream_chunk";

static NULL: Value = Value::Null;

/// Line accounting for one parsed file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseReport {
    pub total_lines: usize,
    pub parsed: usize,
    pub skipped: usize,
    pub blank: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    pub events: Vec<Event>,
    pub report: ParseReport,
}

/// Why a line was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
enum Skip {
    InvalidJson(String),
    NotAnObject,
    MissingType,
    MissingTriggerText,
    MissingCorrelationId,
}

impl std::fmt::Display for Skip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(e) => write!(f, "invalid JSON: {}", e),
            Self::NotAnObject => write!(f, "not a JSON object"),
            Self::MissingType => write!(f, "missing type"),
            Self::MissingTriggerText => write!(f, "trigger without text"),
            Self::MissingCorrelationId => write!(f, "response without correlation id"),
        }
    }
}

/// Parse a whole log file held in memory
pub fn parse_str(text: &str) -> ParsedLog {
    parse_lines(text.lines())
}

/// Parse an iterator of lines. Line numbers are 1-based.
pub fn parse_lines<'a, I>(lines: I) -> ParsedLog
where
    I: IntoIterator<Item = &'a str>,
{
    let mut log = ParsedLog::default();

    for (idx, line) in lines.into_iter().enumerate() {
        let line_no = idx + 1;
        log.report.total_lines += 1;

        if line.trim().is_empty() {
            log.report.blank += 1;
            continue;
        }

        match parse_line(line_no, line) {
            Ok(event) => {
                log.report.parsed += 1;
                log.events.push(event);
            }
            Err(reason) => {
                log.report.skipped += 1;
                tracing::debug!(line = line_no, %reason, "Skipping log line");
            }
        }
    }

    log
}

fn parse_line(line_no: usize, line: &str) -> Result<Event, Skip> {
    let value: Value =
        serde_json::from_str(line.trim()).map_err(|e| Skip::InvalidJson(e.to_string()))?;
    let obj = value.as_object().ok_or(Skip::NotAnObject)?;

    let kind = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or(Skip::MissingType)?;
    let time = obj.get("time").and_then(Value::as_str).map(str::to_string);
    let msg = obj.get("msg").unwrap_or(&NULL);

    let kind = match kind {
        TRIGGER_TYPE => EventKind::QuestionTrigger {
            text: msg
                .as_str()
                .map(str::to_string)
                .ok_or(Skip::MissingTriggerText)?,
        },
        RESPONSE_TYPE => EventKind::ResponseEnvelope(parse_response(msg)?),
        other => EventKind::Other {
            name: other.to_string(),
        },
    };

    Ok(Event {
        line: line_no,
        time,
        kind,
    })
}

fn parse_response(msg: &Value) -> Result<ResponseEvent, Skip> {
    let id = match msg.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(Skip::MissingCorrelationId),
    };

    let data = msg.get("data").unwrap_or(&NULL);
    let payload = match msg.get("type").and_then(Value::as_str) {
        Some(CLASSIFICATION_TYPE) => SubEvent::Classification(ClassificationPayload {
            language: string_field(data, "language"),
            question_type: string_field(data, "question_type"),
            opening_text: string_field(data, "opening_text"),
            audio_id: string_field(data, "audio_id"),
        }),
        Some(FRAGMENT_TYPE) => SubEvent::StreamFragment(FragmentPayload {
            text: string_field(data, "result").unwrap_or_default(),
            finished: data.get("finished").and_then(Value::as_bool).unwrap_or(false),
            style: string_field(data, "style"),
            style_degree: data.get("styledegree").and_then(number_as_f64),
        }),
        Some(other) => SubEvent::Other {
            name: other.to_string(),
        },
        None => SubEvent::Other {
            name: String::new(),
        },
    };

    Ok(ResponseEvent {
        id,
        timestamp_ms: msg.get("timestamp").and_then(number_as_i64),
        code: msg.get("code").and_then(number_as_i64).unwrap_or(SUCCESS_CODE),
        payload,
    })
}

/// String field, accepting numbers too (`audio_id` is logged either way)
fn string_field(data: &Value, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn number_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIGGER: &str = r#"{"type":"stt","time":"2026/2/15 6:53:43","msg":"מה אתה אוכל בבוקר?"}"#;
    const CLASSIFICATION: &str = r#"{"type":"ai_message","time":"2026/2/15 6:53:45","msg":{"type":"waiting_audio","timestamp":1771131225000,"id":"abc123","code":200,"data":{"language":"he-IL","question_type":"Closed questions","opening_text":"שאלה טובה","audio_id":3}}}"#;
    const FRAGMENT: &str = r#"{"type":"ai_message","time":"2026/2/15 6:53:47","msg":{"type":"stream_chunk","timestamp":1771131227000,"id":"abc123","data":{"result":"בבוקר ","finished":false,"style":"neutral","styledegree":1}}}"#;

    #[test]
    fn test_parse_trigger() {
        let log = parse_str(TRIGGER);
        assert_eq!(log.events.len(), 1);
        assert_eq!(log.events[0].line, 1);
        assert_eq!(log.events[0].time.as_deref(), Some("2026/2/15 6:53:43"));
        assert_eq!(log.events[0].as_trigger(), Some("מה אתה אוכל בבוקר?"));
    }

    #[test]
    fn test_parse_classification() {
        let log = parse_str(CLASSIFICATION);
        let resp = log.events[0].as_response().unwrap();
        assert_eq!(resp.id, "abc123");
        assert_eq!(resp.timestamp_ms, Some(1771131225000));
        assert!(resp.is_success());
        match &resp.payload {
            SubEvent::Classification(c) => {
                assert_eq!(c.language.as_deref(), Some("he-IL"));
                assert_eq!(c.audio_id.as_deref(), Some("3"));
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_parse_fragment_defaults_code() {
        let log = parse_str(FRAGMENT);
        let resp = log.events[0].as_response().unwrap();
        assert_eq!(resp.code, SUCCESS_CODE);
        match &resp.payload {
            SubEvent::StreamFragment(f) => {
                assert_eq!(f.text, "בבוקר ");
                assert!(!f.finished);
                assert_eq!(f.style.as_deref(), Some("neutral"));
                assert_eq!(f.style_degree, Some(1.0));
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = format!(
            "{}\nnot json at all\n\n[1,2,3]\n{{\"time\":\"x\"}}\n{{\"type\":\"ai_message\",\"msg\":{{\"type\":\"stream_chunk\"}}}}\n{}",
            TRIGGER, FRAGMENT
        );
        let log = parse_str(&text);
        assert_eq!(log.events.len(), 2);
        assert_eq!(log.report.total_lines, 7);
        assert_eq!(log.report.blank, 1);
        assert_eq!(log.report.skipped, 4);
        assert_eq!(log.report.parsed, 2);
        assert_eq!(log.events[1].line, 7);
    }

    #[test]
    fn test_unknown_types_are_kept_as_other() {
        let log = parse_str(r#"{"type":"heartbeat","time":"2026/2/15 6:00:00","msg":{}}"#);
        assert_eq!(
            log.events[0].kind,
            EventKind::Other {
                name: "heartbeat".into()
            }
        );
    }

    #[test]
    fn test_non_success_code() {
        let log = parse_str(
            r#"{"type":"ai_message","time":"2026/2/15 6:53:45","msg":{"type":"stream_chunk","id":"x","code":500,"timestamp":"1000","data":{}}}"#,
        );
        let resp = log.events[0].as_response().unwrap();
        assert_eq!(resp.code, 500);
        assert_eq!(resp.timestamp_ms, Some(1000));
        assert!(!resp.is_success());
    }
}
