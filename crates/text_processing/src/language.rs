//! Script-count language detection

use kiosk_insight_core::{Language, Script};

/// Share of Hebrew letters above which text is Hebrew
pub const HEBREW_THRESHOLD: f64 = 0.4;
pub const LATIN_THRESHOLD: f64 = 0.4;
pub const CYRILLIC_THRESHOLD: f64 = 0.2;
pub const ARABIC_THRESHOLD: f64 = 0.2;

/// Letter counts per script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptCounts {
    pub hebrew: usize,
    pub latin: usize,
    pub cyrillic: usize,
    pub arabic: usize,
}

impl ScriptCounts {
    pub fn of(text: &str) -> Self {
        let mut counts = Self::default();
        for c in text.chars() {
            if Script::Hebrew.contains_char(c) {
                counts.hebrew += 1;
            } else if Script::Latin.contains_char(c) {
                counts.latin += 1;
            } else if Script::Cyrillic.contains_char(c) {
                counts.cyrillic += 1;
            } else if Script::Arabic.contains_char(c) {
                counts.arabic += 1;
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.hebrew + self.latin + self.cyrillic + self.arabic
    }
}

/// Detect the language of a text from its letters.
///
/// Hebrew and Latin need more than 40% of the counted letters, Cyrillic and
/// Arabic more than 20%, checked in that order. Text with no counted
/// letters is `Unknown`.
pub fn detect_language(text: &str) -> Language {
    let counts = ScriptCounts::of(text);
    let total = counts.total();
    if total == 0 {
        return Language::Unknown;
    }
    let share = |n: usize| n as f64 / total as f64;

    if share(counts.hebrew) > HEBREW_THRESHOLD {
        Language::Hebrew
    } else if share(counts.latin) > LATIN_THRESHOLD {
        Language::English
    } else if share(counts.cyrillic) > CYRILLIC_THRESHOLD {
        Language::Russian
    } else if share(counts.arabic) > ARABIC_THRESHOLD {
        Language::Arabic
    } else {
        Language::Unknown
    }
}
