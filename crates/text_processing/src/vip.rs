//! VIP detection from self-introductions

use once_cell::sync::Lazy;
use regex::Regex;

// Self-introduction patterns, tried in order
static VIP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)(?:אני|שמי|קוראים לי)\s+(.+?)(?:\s*[,.]|$)").unwrap(),
        Regex::new(r"(?i)(?:my name is|i'm|i am)\s+(.+?)(?:\s*[,.]|$)").unwrap(),
        Regex::new(r"(?i)(?:פרופסור|דוקטור|professor|doctor|dr\.?)\s+(\S+)").unwrap(),
    ]
});

/// Name the visitor introduced themselves with, if any
pub fn detect_vip(text: &str) -> Option<String> {
    let text = text.trim();
    VIP_PATTERNS.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|name| !name.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_introduction() {
        assert_eq!(detect_vip("My name is David Levi, nice to meet you").as_deref(), Some("David Levi"));
        assert_eq!(detect_vip("I am Sarah.").as_deref(), Some("Sarah"));
    }

    #[test]
    fn test_hebrew_introduction() {
        assert_eq!(detect_vip("שמי משה כהן, שלום").as_deref(), Some("משה כהן"));
    }

    #[test]
    fn test_title() {
        assert_eq!(detect_vip("Professor Schwartz wants to ask").as_deref(), Some("Schwartz"));
        assert_eq!(detect_vip("Hello dr. Katz").as_deref(), Some("Katz"));
    }

    #[test]
    fn test_no_vip() {
        assert_eq!(detect_vip("What is kashrut?"), None);
    }
}
