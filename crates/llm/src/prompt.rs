//! Chat messages and the two enrichment prompts

use std::fmt;

use serde::{Deserialize, Serialize};

use kiosk_insight_core::Language;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

const TRANSLATION_SYSTEM: &str = "You translate visitor questions and kiosk answers \
from a museum installation. Reply with the translation only: no quotes, notes or \
explanations. Keep names and religious terms transliterated.";

const CLASSIFICATION_TEMPLATE: &str = r#"Classify this interaction from the museum kiosk:

Question: {question}
Answer: {answer}

Return ONLY a single line with these classifications separated by |:
QuestionType|Topic|Sensitivity|Accuracy|IsGreeting|VIP

QuestionType: one of [Closed questions, Open ended questions, Generic questions, Personal advice or current event questions, Statement / Clarification, Greeting]
Topic: one of [Kashrut, Military & Draft, Theology, Torah & Text, Jewish Law, Philosophy, Interfaith, Personal Life, History, Relationships, Meta, Blessings, Daily Life, Greetings, Uncategorized]
Sensitivity: one of [low, medium, high, critical]
Accuracy: one of [correct, partial, incorrect, guardrail, fallback]
IsGreeting: one of [true, false]
VIP: person name with title if mentioned, otherwise "null"

Example output: Closed questions|Kashrut|low|correct|false|null"#;

/// Messages asking for a plain translation of `text`
pub fn translation_prompt(text: &str, from: Language, to: Language) -> Vec<Message> {
    let source = match from {
        Language::Unknown => "the source language".to_string(),
        other => other.name().to_string(),
    };
    vec![
        Message::system(TRANSLATION_SYSTEM),
        Message::user(format!(
            "Translate from {} to {}:\n\n{}",
            source,
            to.name(),
            text
        )),
    ]
}

/// Messages asking for one pipe-delimited label line
pub fn classification_prompt(question: &str, answer: &str) -> Vec<Message> {
    vec![Message::user(
        CLASSIFICATION_TEMPLATE
            .replace("{question}", question)
            .replace("{answer}", answer),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(Role::System.to_string(), "system");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }

    #[test]
    fn test_translation_prompt_names_languages() {
        let messages = translation_prompt("שלום", Language::Hebrew, Language::English);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[1].content.contains("Hebrew"));
        assert!(messages[1].content.contains("English"));
        assert!(messages[1].content.ends_with("שלום"));

        let guessed = translation_prompt("x", Language::Unknown, Language::English);
        assert!(guessed[1].content.contains("the source language"));
    }

    #[test]
    fn test_classification_prompt_fills_placeholders() {
        let messages = classification_prompt("Is coffee kosher?", "Yes.");
        let content = &messages[0].content;
        assert!(content.contains("Question: Is coffee kosher?"));
        assert!(content.contains("Answer: Yes."));
        assert!(!content.contains("{question}"));
    }
}
