//! Sensitivity rating of a topic

use kiosk_insight_core::{Sensitivity, Topic};

use crate::keywords::{find_keyword, normalize};

/// Keywords that make any question critical regardless of topic
pub const CRITICAL_KEYWORDS: &[&str] = &[
    "עבודה זרה",
    "idolatry",
    "נצרות",
    "ישו",
    "jesus",
    "נתניהו",
    "netanyahu",
    "bibi",
    "ביבי",
    "government",
    "ממשלה",
];

/// Sensitivity of a topic when no critical keyword is present
pub fn topic_sensitivity(topic: Topic) -> Sensitivity {
    match topic {
        Topic::Interfaith => Sensitivity::Critical,
        Topic::MilitaryDraft => Sensitivity::High,
        Topic::Kashrut | Topic::Theology | Topic::JewishLaw => Sensitivity::Medium,
        Topic::TorahText
        | Topic::Philosophy
        | Topic::PersonalLife
        | Topic::History
        | Topic::Relationships
        | Topic::Meta
        | Topic::Blessings
        | Topic::DailyLife
        | Topic::Greetings
        | Topic::General => Sensitivity::Low,
    }
}

/// Rate a question: critical keywords override the topic table
pub fn rate_sensitivity(topic: Topic, text: &str) -> Sensitivity {
    let normalized = normalize(text);
    if let Some(keyword) = find_keyword(&normalized, CRITICAL_KEYWORDS) {
        tracing::debug!(keyword, "Critical keyword in question");
        return Sensitivity::Critical;
    }
    topic_sensitivity(topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_table() {
        assert_eq!(topic_sensitivity(Topic::MilitaryDraft), Sensitivity::High);
        assert_eq!(topic_sensitivity(Topic::Interfaith), Sensitivity::Critical);
        assert_eq!(topic_sensitivity(Topic::Kashrut), Sensitivity::Medium);
        assert_eq!(topic_sensitivity(Topic::General), Sensitivity::Low);
    }

    #[test]
    fn test_critical_keyword_overrides_topic() {
        assert_eq!(
            rate_sensitivity(Topic::General, "What do you think of the government?"),
            Sensitivity::Critical
        );
        assert_eq!(
            rate_sensitivity(Topic::General, "מה דעתך על נתניהו"),
            Sensitivity::Critical
        );
    }

    #[test]
    fn test_without_keywords_uses_topic() {
        assert_eq!(
            rate_sensitivity(Topic::Theology, "Does the soul live on?"),
            Sensitivity::Medium
        );
    }
}
