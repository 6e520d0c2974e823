//! Label types produced by the keyword classifiers and by the external
//! classification service.

use serde::{Deserialize, Serialize};

/// Conversation topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Topic {
    Kashrut,
    #[serde(rename = "Military & Draft")]
    MilitaryDraft,
    Theology,
    #[serde(rename = "Torah & Text")]
    TorahText,
    #[serde(rename = "Jewish Law")]
    JewishLaw,
    Philosophy,
    Interfaith,
    #[serde(rename = "Personal Life")]
    PersonalLife,
    History,
    Relationships,
    Meta,
    Blessings,
    #[serde(rename = "Daily Life")]
    DailyLife,
    Greetings,
    #[default]
    General,
}

impl Topic {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Kashrut => "Kashrut",
            Self::MilitaryDraft => "Military & Draft",
            Self::Theology => "Theology",
            Self::TorahText => "Torah & Text",
            Self::JewishLaw => "Jewish Law",
            Self::Philosophy => "Philosophy",
            Self::Interfaith => "Interfaith",
            Self::PersonalLife => "Personal Life",
            Self::History => "History",
            Self::Relationships => "Relationships",
            Self::Meta => "Meta",
            Self::Blessings => "Blessings",
            Self::DailyLife => "Daily Life",
            Self::Greetings => "Greetings",
            Self::General => "General",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How carefully the answer on a topic must be reviewed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Sensitivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A "thank you" that ends the answer early
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThankYou {
    /// English "thank you": the kiosk treats it as a stop command
    Stop,
    /// Hebrew thanks: courtesy, the answer is cut off
    Polite,
}

/// Labels returned by the external classification service.
///
/// Wire form is one pipe-delimited line:
/// `QuestionType|Topic|Sensitivity|Accuracy|IsGreeting|VIP`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationLabels {
    pub question_type: String,
    pub topic: String,
    pub sensitivity: Sensitivity,
    pub accuracy: String,
    pub is_greeting: bool,
    pub vip: Option<String>,
}

impl Default for ClassificationLabels {
    fn default() -> Self {
        Self {
            question_type: "Generic questions".to_string(),
            topic: "Uncategorized".to_string(),
            sensitivity: Sensitivity::Low,
            accuracy: "correct".to_string(),
            is_greeting: false,
            vip: None,
        }
    }
}

impl ClassificationLabels {
    pub const FIELD_COUNT: usize = 6;

    /// Parse the pipe-delimited reply. Returns `None` unless exactly six
    /// fields are present.
    pub fn parse(reply: &str) -> Option<Self> {
        let line = reply
            .lines()
            .map(str::trim)
            .find(|l| l.contains('|'))?;
        let parts: Vec<&str> = line.split('|').map(str::trim).collect();
        if parts.len() != Self::FIELD_COUNT {
            return None;
        }

        let vip = match parts[5] {
            "" => None,
            v if v.eq_ignore_ascii_case("null") || v.eq_ignore_ascii_case("none") => None,
            v => Some(v.to_string()),
        };

        Some(Self {
            question_type: parts[0].to_string(),
            topic: parts[1].to_string(),
            sensitivity: Sensitivity::from_str_loose(parts[2]).unwrap_or_default(),
            accuracy: parts[3].to_lowercase(),
            is_greeting: parts[4].eq_ignore_ascii_case("true"),
            vip,
        })
    }
}
