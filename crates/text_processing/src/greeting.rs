//! Greeting, farewell and thank-you detection

use kiosk_insight_core::ThankYou;

use crate::keywords::{contains_keyword, normalize};
use crate::word_count;

/// Trimmed utterances shorter than this are treated as greetings
pub const GREETING_MAX_CHARS: usize = 15;

/// Greeting and farewell phrases, Hebrew and English
pub const GREETING_PHRASES: &[&str] = &[
    "שלום",
    "היי",
    "הי",
    "בוקר טוב",
    "ערב טוב",
    "מה שלומך",
    "מה נשמע",
    "hello",
    "hi",
    "hey",
    "good morning",
    "good evening",
    "how are you",
    "תודה",
    "thank",
    "bye",
    "להתראות",
    "שלום רב",
];

/// An English thanks longer than this many words is part of a question,
/// not a stop command
const STOP_MAX_WORDS: usize = 4;

const ENGLISH_THANKS: &[&str] = &["thank you", "thanks"];
const HEBREW_THANKS: &[&str] = &["תודה"];

/// Greeting or pleasantry: a known phrase anywhere in the text, or a very
/// short utterance.
pub fn is_greeting(text: &str) -> bool {
    let normalized = normalize(text);
    if normalized.chars().count() < GREETING_MAX_CHARS {
        return true;
    }
    GREETING_PHRASES
        .iter()
        .any(|phrase| contains_keyword(&normalized, phrase))
}

/// Classify a thank-you in the visitor's question.
///
/// A short English "thank you" is the kiosk's stop command; a Hebrew
/// "תודה" is politeness.
pub fn detect_thank_you(question: &str) -> Option<ThankYou> {
    let normalized = normalize(question);
    if normalized.is_empty() {
        return None;
    }
    let english = ENGLISH_THANKS
        .iter()
        .any(|kw| contains_keyword(&normalized, kw));
    if english && word_count(&normalized) <= STOP_MAX_WORDS {
        return Some(ThankYou::Stop);
    }
    if HEBREW_THANKS.iter().any(|kw| contains_keyword(&normalized, kw)) {
        return Some(ThankYou::Polite);
    }
    None
}
