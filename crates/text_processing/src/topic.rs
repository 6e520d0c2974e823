//! Topic classification
//!
//! Two declarative tables: which keywords indicate a topic, and which topic
//! wins when several match. Both are plain data so they can be reviewed
//! without reading the matching code.

use kiosk_insight_core::Topic;

use crate::greeting::GREETING_MAX_CHARS;
use crate::keywords::{contains_keyword, normalize};

/// Keywords per topic, Hebrew and English
pub const TOPIC_RULES: &[(Topic, &[&str])] = &[
    (
        Topic::Kashrut,
        &["בשר", "חלב", "כשר", "meat", "dairy", "kosher", "טרף", "שחיטה"],
    ),
    (
        Topic::MilitaryDraft,
        &[
            "צבא", "גיוס", "חרדי", "army", "military", "draft", "haredi", "ultra-orthodox",
            "yeshiva", "ישיבות", "חיילות", "soldiers", "חייל",
        ],
    ),
    (
        Topic::Theology,
        &[
            "אלוהים", "אלהים", "god", "השגחה", "שכינה", "divine", "creator", "נשמה", "soul",
            "miracle", "נס",
        ],
    ),
    (
        Topic::TorahText,
        &[
            "פרשת", "תורה", "torah", "parsha", "בראשית", "ספר", "פסוק", "verse", "scripture",
            "תלמוד", "talmud", "גמרא",
        ],
    ),
    (
        Topic::JewishLaw,
        &[
            "הלכה", "halacha", "mitzvah", "מצוו", "נדר", "shabbat", "שבת", "נביא", "צדיק",
            "משיח", "תשובה",
        ],
    ),
    (
        Topic::Philosophy,
        &[
            "חכמה", "wisdom", "מוסר", "ethics", "virtue", "truth", "אמת", "tolerance",
            "סובלנות", "justice", "צדק", "meaning of life",
        ],
    ),
    (
        Topic::Interfaith,
        &[
            "נצרות", "christian", "islam", "מוסלמ", "ישו", "jesus", "church", "כנסייה",
            "mosque", "מסגד", "עבודה זרה", "idolatry",
        ],
    ),
    (
        Topic::PersonalLife,
        &[
            "ילד", "child", "education", "חינוך", "medicine", "רפואה", "doctor", "family",
            "משפחה", "advice", "anger", "כעס",
        ],
    ),
    (
        Topic::History,
        &[
            "egypt", "מצרים", "spain", "ספרד", "where did you live", "ארץ ישראל", "holocaust",
            "born", "נולד",
        ],
    ),
    (
        Topic::Relationships,
        &["אהבה", "זוגיות", "love", "marriage", "נישואין", "couple"],
    ),
    (
        Topic::Meta,
        &[
            "מוזיאון", "museum", "הולוגרמ", "hologram", "robot", "ai",
            "artificial intelligence", "בינה מלאכותית", "technology", "טכנולוגיה",
        ],
    ),
    (
        Topic::Blessings,
        &["ברכ", "bless", "תברך", "prayer", "תפילה"],
    ),
    (
        Topic::DailyLife,
        &[
            "קפה", "coffee", "sleep", "שנת", "רחץ", "wash", "tea", "walk", "הליכ", "breakfast",
            "morning routine",
        ],
    ),
    (
        Topic::Greetings,
        &[
            "בוקר טוב", "good morning", "שלום", "hello", "thank you", "תודה", "bye", "להתראות",
        ],
    ),
];

/// Tie-break order when several topics match: earlier wins
pub const TOPIC_PRIORITY: &[Topic] = &[
    Topic::Kashrut,
    Topic::MilitaryDraft,
    Topic::Interfaith,
    Topic::Theology,
    Topic::TorahText,
    Topic::JewishLaw,
    Topic::Philosophy,
    Topic::PersonalLife,
    Topic::History,
    Topic::Relationships,
    Topic::Meta,
    Topic::Blessings,
    Topic::DailyLife,
    Topic::Greetings,
];

/// All topics whose keywords appear in the text, in table order
pub fn matching_topics(text: &str) -> Vec<Topic> {
    let normalized = normalize(text);
    TOPIC_RULES
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| contains_keyword(&normalized, kw)))
        .map(|(topic, _)| *topic)
        .collect()
}

/// Classify a question into a single topic.
///
/// The highest-priority matching topic wins. With no match, short text is
/// a greeting and anything else is `General`.
pub fn classify_topic(text: &str) -> Topic {
    let matches = matching_topics(text);
    if let Some(topic) = TOPIC_PRIORITY.iter().find(|t| matches.contains(t)) {
        return *topic;
    }
    if text.trim().chars().count() < GREETING_MAX_CHARS {
        Topic::Greetings
    } else {
        Topic::General
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_rule_topic_has_priority() {
        for (topic, _) in TOPIC_RULES {
            assert!(TOPIC_PRIORITY.contains(topic), "{topic} missing from priority");
        }
    }

    #[test]
    fn test_single_topic() {
        assert_eq!(classify_topic("Why do we keep meat and milk apart?"), Topic::Kashrut);
        assert_eq!(classify_topic("מה דעתך על גיוס בני ישיבות?"), Topic::MilitaryDraft);
        assert_eq!(classify_topic("Do you drink coffee in the morning?"), Topic::DailyLife);
    }

    #[test]
    fn test_priority_breaks_ties() {
        // Theology ("god") and Interfaith ("jesus"): Interfaith ranks higher
        let text = "What did you think of Jesus and his idea of God?";
        let matches = matching_topics(text);
        assert!(matches.contains(&Topic::Theology));
        assert!(matches.contains(&Topic::Interfaith));
        assert_eq!(classify_topic(text), Topic::Interfaith);
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(classify_topic("ok rabbi"), Topic::Greetings);
        assert_eq!(
            classify_topic("Tell me something interesting please"),
            Topic::General
        );
    }

    #[test]
    fn test_ai_is_whole_word() {
        assert_eq!(classify_topic("Are you an AI or a real person?"), Topic::Meta);
        assert_ne!(classify_topic("What did the sages say about rain?"), Topic::Meta);
    }
}
