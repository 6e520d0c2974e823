//! Chat-completion client for the optional enrichment pass
//!
//! Implements [`Translator`](kiosk_insight_core::Translator) and
//! [`InteractionClassifier`](kiosk_insight_core::InteractionClassifier)
//! against an OpenAI-compatible `/v1/chat/completions` endpoint.

pub mod client;
pub mod prompt;

pub use client::{ChatClient, ChatConfig};
pub use prompt::{classification_prompt, translation_prompt, Message, Role};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for kiosk_insight_core::Error {
    fn from(err: LlmError) -> Self {
        kiosk_insight_core::Error::Llm(err.to_string())
    }
}
