//! Table-driven checks over realistic kiosk utterances

use kiosk_insight_core::{Language, Sensitivity, ThankYou, Topic};
use kiosk_insight_text_processing::{
    classify_topic, detect_language, detect_thank_you, detect_vip, is_fallback_answer,
    is_greeting, persona_break, rate_sensitivity,
};

struct Case {
    text: &'static str,
    language: Language,
    greeting: bool,
    topic: Topic,
    sensitivity: Sensitivity,
}

const CASES: &[Case] = &[
    Case {
        text: "שלום",
        language: Language::Hebrew,
        greeting: true,
        topic: Topic::Greetings,
        sensitivity: Sensitivity::Low,
    },
    Case {
        text: "מה דעתך על הגיוס של חרדים לצבא?",
        language: Language::Hebrew,
        greeting: false,
        topic: Topic::MilitaryDraft,
        sensitivity: Sensitivity::High,
    },
    Case {
        text: "What do you think about Christianity and Jesus?",
        language: Language::English,
        greeting: false,
        topic: Topic::Interfaith,
        sensitivity: Sensitivity::Critical,
    },
    Case {
        text: "Can I eat kosher meat with dairy afterwards?",
        language: Language::English,
        greeting: false,
        topic: Topic::Kashrut,
        sensitivity: Sensitivity::Medium,
    },
    Case {
        text: "Is the government doing a good job with the museum?",
        language: Language::English,
        greeting: false,
        topic: Topic::Meta,
        sensitivity: Sensitivity::Critical,
    },
];

#[test]
fn test_cases() {
    for case in CASES {
        assert_eq!(detect_language(case.text), case.language, "{}", case.text);
        assert_eq!(is_greeting(case.text), case.greeting, "{}", case.text);
        let topic = classify_topic(case.text);
        assert_eq!(topic, case.topic, "{}", case.text);
        assert_eq!(rate_sensitivity(topic, case.text), case.sensitivity, "{}", case.text);
    }
}

#[test]
fn test_classifiers_are_deterministic() {
    for case in CASES {
        assert_eq!(classify_topic(case.text), classify_topic(case.text));
        assert_eq!(detect_vip(case.text), detect_vip(case.text));
    }
}

#[test]
fn test_answer_checks() {
    assert!(is_fallback_answer("Please rephrase your question."));
    assert!(persona_break("There was a technical issue, try again").is_some());
    assert!(!is_fallback_answer("שבת שלום"));
}

#[test]
fn test_thank_you_and_vip() {
    assert_eq!(detect_thank_you("Thank you"), Some(ThankYou::Stop));
    assert_eq!(detect_vip("קוראים לי רחל").as_deref(), Some("רחל"));
}
