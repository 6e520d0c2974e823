//! Text processing traits

use async_trait::async_trait;

use crate::{ClassificationLabels, Language, Result};

/// Translation interface
///
/// Implementations:
/// - `ChatClient` (llm crate) - OpenAI-compatible chat completions
/// - `NoopTranslator` - disabled, always returns empty text
///
/// # Example
///
/// ```ignore
/// let translator: Arc<dyn Translator> = Arc::new(ChatClient::new(config)?);
/// let english = translator
///     .translate("מה אתה אוכל בבוקר?", Language::Hebrew, Language::English)
///     .await?;
/// ```
#[async_trait]
pub trait Translator: Send + Sync + 'static {
    /// Translate text between languages
    ///
    /// # Arguments
    /// * `text` - Text to translate
    /// * `from` - Source language (`Unknown` lets the service guess)
    /// * `to` - Target language
    async fn translate(&self, text: &str, from: Language, to: Language) -> Result<String>;

    /// Whether this implementation does any work
    fn is_enabled(&self) -> bool {
        true
    }

    fn name(&self) -> &str;
}

/// Generative classification of a whole exchange
#[async_trait]
pub trait InteractionClassifier: Send + Sync + 'static {
    async fn classify(&self, question: &str, answer: &str) -> Result<ClassificationLabels>;

    fn is_enabled(&self) -> bool {
        true
    }

    fn name(&self) -> &str;
}

/// Pass-through translator used when enrichment is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTranslator;

#[async_trait]
impl Translator for NoopTranslator {
    async fn translate(&self, _text: &str, _from: Language, _to: Language) -> Result<String> {
        Ok(String::new())
    }

    fn is_enabled(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "noop"
    }
}

/// Returns the default labels without calling anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopClassifier;

#[async_trait]
impl InteractionClassifier for NoopClassifier {
    async fn classify(&self, _question: &str, _answer: &str) -> Result<ClassificationLabels> {
        Ok(ClassificationLabels::default())
    }

    fn is_enabled(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "noop"
    }
}
