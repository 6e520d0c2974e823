//! Keyword matching shared by the classifier tables
//!
//! Matching is done on lowercased text. Hebrew keywords are matched as plain
//! substrings because single-letter prefixes (ה, ו, ב, ל, ש) attach to the
//! word. Latin keywords must start on a word boundary. Short keywords
//! (three Latin or two non-Latin characters) must match a whole word.

const SHORT_LATIN_CHARS: usize = 3;
const SHORT_OTHER_CHARS: usize = 2;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// Check whether `haystack` (already lowercased) contains `keyword`
/// (already lowercased) under the rules above.
pub fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    let limit = if keyword.is_ascii() { SHORT_LATIN_CHARS } else { SHORT_OTHER_CHARS };
    let short = keyword.chars().count() <= limit;
    let need_start = short || keyword.is_ascii();
    let need_end = short;

    if !need_start && !need_end {
        return haystack.contains(keyword);
    }

    haystack.match_indices(keyword).any(|(i, m)| {
        let before_ok = !need_start
            || !haystack[..i].chars().next_back().is_some_and(is_word_char);
        let after_ok = !need_end
            || !haystack[i + m.len()..].chars().next().is_some_and(is_word_char);
        before_ok && after_ok
    })
}

/// First keyword of `keywords` found in `haystack`
pub fn find_keyword<'a>(haystack: &str, keywords: &[&'a str]) -> Option<&'a str> {
    keywords
        .iter()
        .copied()
        .find(|kw| contains_keyword(haystack, kw))
}

/// Lowercase and trim, the normal form every table matches against
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_keywords_need_whole_word() {
        assert!(contains_keyword("are you an ai?", "ai"));
        assert!(!contains_keyword("i said hello", "ai"));
        assert!(contains_keyword("hi there", "hi"));
        assert!(!contains_keyword("this is it", "hi"));
        assert!(!contains_keyword("teach me", "tea"));
    }

    #[test]
    fn test_latin_prefix_match() {
        assert!(contains_keyword("bless me, rabbi", "bless"));
        assert!(contains_keyword("a blessing please", "bless"));
        assert!(!contains_keyword("unblessed", "bless"));
        assert!(contains_keyword("what about soldiers", "soldiers"));
    }

    #[test]
    fn test_hebrew_substring_match() {
        // prefixed with ה
        assert!(contains_keyword("מה דעתך על הכשרות", "כשר"));
        assert!(contains_keyword("בשבת", "שבת"));
        assert!(contains_keyword("מה זה נס?", "נס"));
        assert!(!contains_keyword("הנסיעה", "נס"));
    }

    #[test]
    fn test_find_keyword_order() {
        let kws = ["meat", "dairy", "kosher"];
        assert_eq!(find_keyword("is dairy kosher", &kws), Some("dairy"));
        assert_eq!(find_keyword("nothing here", &kws), None);
    }
}
