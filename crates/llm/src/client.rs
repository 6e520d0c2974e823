//! OpenAI-compatible chat completions client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use kiosk_insight_config::EnrichmentConfig;
use kiosk_insight_core::{
    ClassificationLabels, Error, InteractionClassifier, Language, Result, Translator,
};

use crate::prompt::{classification_prompt, translation_prompt, Message};
use crate::LlmError;

/// Request settings derived from [`EnrichmentConfig`]
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub model: String,
    /// Base URL, without the `/v1/...` path
    pub endpoint: String,
    pub api_key: String,
    pub timeout: Duration,
    pub max_retries: u32,
    /// Initial backoff duration (doubles each retry)
    pub initial_backoff: Duration,
    pub temperature: f32,
    pub max_tokens: usize,
}

impl ChatConfig {
    pub fn from_enrichment(config: &EnrichmentConfig) -> std::result::Result<Self, LlmError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::Configuration("enrichment.api_key is not set".to_string()))?;

        Ok(Self {
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
            timeout: Duration::from_secs(config.timeout_secs),
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(250),
            temperature: 0.2,
            max_tokens: 400,
        })
    }
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    config: ChatConfig,
}

impl ChatClient {
    /// Fails when the API key is missing or the HTTP client cannot be built
    pub fn new(config: &EnrichmentConfig) -> std::result::Result<Self, LlmError> {
        Self::with_config(ChatConfig::from_enrichment(config)?)
    }

    pub fn with_config(config: ChatConfig) -> std::result::Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn api_url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.endpoint)
    }

    async fn execute_request(
        &self,
        request: &ChatRequest<'_>,
    ) -> std::result::Result<String, LlmError> {
        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            // 5xx errors are retryable, 4xx are not
            if status.is_server_error() {
                return Err(LlmError::Network(format!("Server error {}: {}", status, error)));
            }
            return Err(LlmError::Api(format!("{}: {}", status, error)));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        extract_content(body)
    }

    fn is_retryable(error: &LlmError) -> bool {
        matches!(error, LlmError::Network(_) | LlmError::Timeout)
    }

    /// Send messages and return the first choice's content, retrying
    /// transient failures with exponential backoff
    pub async fn complete(&self, messages: &[Message]) -> std::result::Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let mut last_error = None;
        let mut backoff = self.config.initial_backoff;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::warn!(
                    "Chat request failed, retrying in {:?} (attempt {}/{})",
                    backoff,
                    attempt,
                    self.config.max_retries
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }

            match self.execute_request(&request).await {
                Ok(content) => return Ok(content),
                Err(e) if Self::is_retryable(&e) => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Network("Max retries exceeded".to_string())))
    }
}

#[async_trait]
impl Translator for ChatClient {
    async fn translate(&self, text: &str, from: Language, to: Language) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }
        let reply = self
            .complete(&translation_prompt(text, from, to))
            .await
            .map_err(|e| Error::Translation(e.to_string()))?;
        Ok(reply.trim().to_string())
    }

    fn name(&self) -> &str {
        "chat-completions"
    }
}

#[async_trait]
impl InteractionClassifier for ChatClient {
    async fn classify(&self, question: &str, answer: &str) -> Result<ClassificationLabels> {
        let reply = self
            .complete(&classification_prompt(question, answer))
            .await
            .map_err(|e| Error::Classification(e.to_string()))?;
        ClassificationLabels::parse(&reply)
            .ok_or_else(|| Error::Classification(format!("Malformed label line: {}", reply.trim())))
    }

    fn name(&self) -> &str {
        "chat-completions"
    }
}

// OpenAI API types
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

fn extract_content(body: ChatResponse) -> std::result::Result<String, LlmError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrichment(api_key: Option<&str>) -> EnrichmentConfig {
        EnrichmentConfig {
            enabled: true,
            api_key: api_key.map(str::to_string),
            endpoint: "http://localhost:9/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_api_key_is_configuration_error() {
        assert!(matches!(
            ChatClient::new(&enrichment(None)),
            Err(LlmError::Configuration(_))
        ));
        assert!(matches!(
            ChatClient::new(&enrichment(Some("  "))),
            Err(LlmError::Configuration(_))
        ));
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let client = ChatClient::new(&enrichment(Some("sk-test"))).unwrap();
        assert_eq!(client.api_url(), "http://localhost:9/v1/chat/completions");
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_request_serialization() {
        let messages = vec![Message::user("hi")];
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: &messages,
            temperature: 0.2,
            max_tokens: 10,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_extract_content() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Open ended questions|History|low|correct|false|null"}}]}"#,
        )
        .unwrap();
        let content = extract_content(body).unwrap();
        let labels = ClassificationLabels::parse(&content).unwrap();
        assert_eq!(labels.topic, "History");

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            extract_content(empty),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_retryable_errors() {
        assert!(ChatClient::is_retryable(&LlmError::Timeout));
        assert!(ChatClient::is_retryable(&LlmError::Network("reset".into())));
        assert!(!ChatClient::is_retryable(&LlmError::Api("401".into())));
    }

    #[tokio::test]
    async fn test_empty_text_skips_request() {
        let client = ChatClient::new(&enrichment(Some("sk-test"))).unwrap();
        let out = client
            .translate("   ", Language::Hebrew, Language::English)
            .await
            .unwrap();
        assert!(out.is_empty());
    }
}
