//! Classifier tables for kiosk conversations
//!
//! Pure, stateless keyword and pattern classifiers:
//! - **Language**: script-count detection (Hebrew, English, Russian, Arabic)
//! - **Greeting**: phrase list plus a short-utterance rule, thank-you kinds
//! - **Topic**: keyword table with an explicit priority order
//! - **Sensitivity**: topic table overridden by critical keywords
//! - **VIP**: self-introduction patterns
//! - **Response**: comprehension fallbacks and persona breaks
//!
//! # Example
//!
//! ```
//! use kiosk_insight_text_processing::{classify_topic, rate_sensitivity};
//! use kiosk_insight_core::{Sensitivity, Topic};
//!
//! let topic = classify_topic("Should soldiers from yeshivas be drafted?");
//! assert_eq!(topic, Topic::MilitaryDraft);
//! assert_eq!(rate_sensitivity(topic, "Should soldiers from yeshivas be drafted?"), Sensitivity::High);
//! ```

pub mod greeting;
pub mod keywords;
pub mod language;
pub mod response;
pub mod sensitivity;
pub mod topic;
pub mod vip;

use unicode_segmentation::UnicodeSegmentation;

pub use greeting::{detect_thank_you, is_greeting, GREETING_MAX_CHARS};
pub use language::{detect_language, ScriptCounts};
pub use response::{is_fallback_answer, persona_break};
pub use sensitivity::{rate_sensitivity, topic_sensitivity};
pub use topic::{classify_topic, matching_topics};
pub use vip::detect_vip;

/// Number of words, using Unicode word boundaries
pub fn word_count(text: &str) -> usize {
    text.unicode_words().count()
}
