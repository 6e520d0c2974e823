//! Visitor sessions and session-level anomalies

use serde::{Deserialize, Serialize};

use crate::anomaly::Severity;
use crate::classification::Topic;
use crate::language::Language;

/// A run of interactions with no gap above the session threshold
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// 1-based
    pub number: usize,
    pub interaction_ids: Vec<String>,
    pub start_time: String,
    pub end_time: String,
    pub count: usize,
    /// First-seen order
    pub languages: Vec<Language>,
    pub topics: Vec<Topic>,
}

/// Pattern spanning several interactions of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionAnomaly {
    LanguageSwitch {
        session: usize,
        interaction_id: String,
        time: String,
        from: Language,
        to: Language,
    },
    QuestionTypeSkew {
        session: usize,
        question_type: String,
        count: usize,
        share: f64,
    },
}

impl SessionAnomaly {
    pub fn code(&self) -> &'static str {
        match self {
            Self::LanguageSwitch { .. } => "LANGUAGE_SWITCH",
            Self::QuestionTypeSkew { .. } => "QUESTION_TYPE_SKEW",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Operational
    }

    pub fn session(&self) -> usize {
        match self {
            Self::LanguageSwitch { session, .. } | Self::QuestionTypeSkew { session, .. } => *session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_anomaly_tagging() {
        let anomaly = SessionAnomaly::LanguageSwitch {
            session: 1,
            interaction_id: "abc".into(),
            time: "10:00:00".into(),
            from: Language::Hebrew,
            to: Language::English,
        };
        let json = serde_json::to_value(&anomaly).unwrap();
        assert_eq!(json["type"], "LANGUAGE_SWITCH");
        assert_eq!(json["from"], "he-IL");
        assert_eq!(anomaly.code(), "LANGUAGE_SWITCH");
        assert_eq!(anomaly.severity(), Severity::Operational);
        assert_eq!(anomaly.session(), 1);
    }
}
