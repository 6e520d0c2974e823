//! Languages spoken at the kiosk
//!
//! The upstream classifier declares a locale tag (`he-IL`, `en-US`, ...);
//! the local detector works on Unicode script counts. Both map onto
//! [`Language`].

use serde::{Deserialize, Serialize};

/// Conversation language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Language {
    #[serde(rename = "he-IL", alias = "he")]
    Hebrew,
    #[serde(rename = "en-US", alias = "en")]
    English,
    #[serde(rename = "ru-RU", alias = "ru")]
    Russian,
    #[serde(rename = "ar-IL", alias = "ar")]
    Arabic,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl Language {
    /// Locale tag as emitted in output documents
    pub fn locale(&self) -> &'static str {
        match self {
            Self::Hebrew => "he-IL",
            Self::English => "en-US",
            Self::Russian => "ru-RU",
            Self::Arabic => "ar-IL",
            Self::Unknown => "unknown",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hebrew => "Hebrew",
            Self::English => "English",
            Self::Russian => "Russian",
            Self::Arabic => "Arabic",
            Self::Unknown => "Unknown",
        }
    }

    /// Parse a declared locale or language name (case-insensitive).
    ///
    /// Region suffixes are ignored, so `he-IL`, `he_il` and `iw` all map to
    /// Hebrew. Returns `None` for anything unrecognised, including an
    /// explicit `unknown`.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let primary = s.split(['-', '_']).next().unwrap_or("");
        match primary {
            "he" | "iw" | "heb" | "hebrew" => Some(Self::Hebrew),
            "en" | "eng" | "english" => Some(Self::English),
            "ru" | "rus" | "russian" => Some(Self::Russian),
            "ar" | "ara" | "arabic" => Some(Self::Arabic),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.locale())
    }
}

/// Writing systems the language detector counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Script {
    Latin,
    Hebrew,
    Cyrillic,
    Arabic,
}

impl Script {
    /// Unicode range for this script (letters only for Latin)
    pub fn unicode_range(&self) -> (u32, u32) {
        match self {
            Self::Latin => ('a' as u32, 'z' as u32),
            Self::Hebrew => (0x0590, 0x05FF),
            Self::Cyrillic => (0x0400, 0x04FF),
            Self::Arabic => (0x0600, 0x06FF),
        }
    }

    /// Check if a character belongs to this script.
    ///
    /// Latin is matched case-insensitively.
    pub fn contains_char(&self, c: char) -> bool {
        let code = match self {
            Self::Latin => c.to_ascii_lowercase() as u32,
            _ => c as u32,
        };
        let (start, end) = self.unicode_range();
        code >= start && code <= end
    }
}
