//! Best-effort enrichment through the external text services
//!
//! Translation fills `question_en` / `answer_en`; classification attaches
//! [`ClassificationLabels`]. Every failure is logged and skipped, leaving the
//! interaction as reconstructed.

use std::sync::Arc;
use std::time::Duration;

use kiosk_insight_config::EnrichmentConfig;
use kiosk_insight_core::{
    ClassificationLabels, Interaction, InteractionClassifier, Language, NoopClassifier,
    NoopTranslator, Translator,
};

/// Counts from one enrichment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentStats {
    pub translated: usize,
    pub classified: usize,
    pub failures: usize,
}

pub struct Enricher {
    translator: Arc<dyn Translator>,
    classifier: Arc<dyn InteractionClassifier>,
    delay: Duration,
    max_chars: usize,
}

impl Enricher {
    pub fn new(
        translator: Arc<dyn Translator>,
        classifier: Arc<dyn InteractionClassifier>,
        config: &EnrichmentConfig,
    ) -> Self {
        Self {
            translator,
            classifier,
            delay: Duration::from_millis(config.delay_ms),
            max_chars: config.max_chars,
        }
    }

    /// Enricher that does nothing
    pub fn disabled() -> Self {
        Self {
            translator: Arc::new(NoopTranslator),
            classifier: Arc::new(NoopClassifier),
            delay: Duration::ZERO,
            max_chars: usize::MAX,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.translator.is_enabled() || self.classifier.is_enabled()
    }

    pub async fn enrich(&self, interactions: &mut [Interaction]) -> EnrichmentStats {
        let mut stats = EnrichmentStats::default();
        if !self.is_enabled() {
            return stats;
        }

        let mut first_call = true;
        for interaction in interactions.iter_mut() {
            if self.translator.is_enabled() && interaction.needs_translation {
                self.pause(&mut first_call).await;
                self.translate(interaction, &mut stats).await;
            }
            if self.classifier.is_enabled() && !interaction.question.trim().is_empty() {
                self.pause(&mut first_call).await;
                self.classify(interaction, &mut stats).await;
            }
        }

        tracing::info!(
            translator = self.translator.name(),
            classifier = self.classifier.name(),
            translated = stats.translated,
            classified = stats.classified,
            failures = stats.failures,
            "Enrichment finished"
        );
        stats
    }

    async fn pause(&self, first_call: &mut bool) {
        if !*first_call && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        *first_call = false;
    }

    async fn translate(&self, interaction: &mut Interaction, stats: &mut EnrichmentStats) {
        let from = interaction.language;
        let mut ok = true;

        if interaction.question_en.is_empty() && !interaction.question.trim().is_empty() {
            match self.translate_text(&interaction.question, from).await {
                Some(text) => interaction.question_en = text,
                None => ok = false,
            }
        }
        if interaction.answer_en.is_empty() && !interaction.answer.trim().is_empty() {
            match self.translate_text(&interaction.answer, from).await {
                Some(text) => interaction.answer_en = text,
                None => ok = false,
            }
        }

        if ok {
            stats.translated += 1;
        } else {
            stats.failures += 1;
        }
    }

    async fn translate_text(&self, text: &str, from: Language) -> Option<String> {
        let text = truncate_chars(text, self.max_chars);
        match self.translator.translate(text, from, Language::English).await {
            Ok(translated) => Some(translated.trim().to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "Translation failed, leaving text untranslated");
                None
            }
        }
    }

    async fn classify(&self, interaction: &mut Interaction, stats: &mut EnrichmentStats) {
        let question = truncate_chars(&interaction.question, self.max_chars);
        let answer = truncate_chars(&interaction.answer, self.max_chars);
        let labels = match self.classifier.classify(question, answer).await {
            Ok(labels) => {
                stats.classified += 1;
                labels
            }
            Err(e) => {
                tracing::warn!(id = %interaction.id, error = %e, "Classification failed, using defaults");
                stats.failures += 1;
                ClassificationLabels::default()
            }
        };
        interaction.accuracy = Some(labels.accuracy.clone());
        interaction.labels = Some(labels);
    }
}

/// Prefix of at most `max` characters, on a char boundary
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
