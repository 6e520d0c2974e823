//! Answer-side checks: comprehension fallbacks and persona breaks

use crate::keywords::{find_keyword, normalize};

/// Phrases the kiosk uses when it did not understand the question
pub const FALLBACK_PHRASES: &[&str] = &[
    "please rephrase",
    "לא הבנתי",
    "אנא נסח",
    "could you repeat",
    "i didn't understand",
];

/// Phrases that reveal the underlying assistant instead of the character
pub const PERSONA_BREAK_PHRASES: &[&str] = &[
    "i only support",
    "i don't have access",
    "as an ai",
    "i cannot provide",
    "system error",
    "technical issue",
];

/// The answer is a "please rephrase" style fallback
pub fn is_fallback_answer(answer: &str) -> bool {
    find_keyword(&normalize(answer), FALLBACK_PHRASES).is_some()
}

/// First persona-break phrase found in the answer
pub fn persona_break(answer: &str) -> Option<&'static str> {
    find_keyword(&normalize(answer), PERSONA_BREAK_PHRASES)
}
