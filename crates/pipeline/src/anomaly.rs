//! Per-interaction anomaly detection
//!
//! Each check is independent and reads only fields already on the
//! interaction. Missing data never triggers a check. Codes come out in
//! battery order, so `anomaly_type` (the first code) is stable.

use kiosk_insight_config::AnomalyThresholds;
use kiosk_insight_core::{AnomalyCode, Interaction, Language};
use kiosk_insight_text_processing::{is_fallback_answer, persona_break, word_count};

const NEUTRAL_STYLE: &str = "neutral";

#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    thresholds: AnomalyThresholds,
}

impl AnomalyDetector {
    pub fn new(thresholds: AnomalyThresholds) -> Self {
        Self { thresholds }
    }

    /// Run the whole battery
    pub fn detect(&self, i: &Interaction) -> Vec<AnomalyCode> {
        let t = &self.thresholds;
        let mut codes = Vec::new();

        if i.is_orphan && !i.is_greeting {
            codes.push(AnomalyCode::SttDropped);
        }
        if i.language == Language::Unknown && !(i.is_orphan && i.is_greeting) {
            codes.push(AnomalyCode::LangUnknown);
        }
        if i.has_classification && !i.response_received {
            codes.push(AnomalyCode::LlmError);
        }
        if i.response_received && i.answer.trim().is_empty() {
            codes.push(AnomalyCode::EmptyResponse);
        }
        if i.response_received && !i.is_complete {
            codes.push(AnomalyCode::IncompleteResponse);
        }

        match i.latency_ms {
            Some(ms) if ms > t.latency_critical_ms => codes.push(AnomalyCode::LatencySpikeCritical),
            Some(ms) if ms > t.latency_warn_ms => codes.push(AnomalyCode::LatencySpikeWarn),
            _ => {}
        }
        match i.opening_latency_ms {
            Some(ms) if ms > t.opening_critical_ms => {
                codes.push(AnomalyCode::OpeningLatencyCritical)
            }
            Some(ms) if ms > t.opening_warn_ms => codes.push(AnomalyCode::OpeningLatencyWarn),
            _ => {}
        }

        let clip_ms = i.opening_audio_duration_ms.unwrap_or(t.opening_clip_ms);
        if i.generation_ms.is_some_and(|g| g > clip_ms) {
            codes.push(AnomalyCode::ThinkOverflow);
        }

        if i.is_out_of_order {
            codes.push(AnomalyCode::OutOfOrder);
        }
        if !i.error_codes.is_empty() {
            codes.push(AnomalyCode::Non200Code);
        }
        if is_fallback_answer(&i.answer) {
            codes.push(AnomalyCode::FallbackTriggered);
        }
        if persona_break(&i.answer).is_some() {
            codes.push(AnomalyCode::PersonaBreak);
        }
        if i
            .style
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty() && !s.eq_ignore_ascii_case(NEUTRAL_STYLE))
        {
            codes.push(AnomalyCode::StyleAnomaly);
        }

        let question = i.question.trim();
        if !question.is_empty()
            && !i.is_greeting
            && word_count(question) < t.stt_truncation_words
        {
            codes.push(AnomalyCode::SttTruncation);
        }

        codes
    }

    /// Detect and write the results onto the interaction
    pub fn annotate(&self, interaction: &mut Interaction) {
        let codes = self.detect(interaction);
        interaction.anomaly_type = codes.first().copied();
        interaction.is_anomaly = !codes.is_empty();
        interaction.is_comprehension_failure = codes.contains(&AnomalyCode::FallbackTriggered);
        if !codes.is_empty() {
            tracing::trace!(id = %interaction.id, ?codes, "Anomalies detected");
        }
        interaction.anomalies = codes;
    }

    pub fn annotate_all(&self, interactions: &mut [Interaction]) {
        for interaction in interactions.iter_mut() {
            self.annotate(interaction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answered() -> Interaction {
        Interaction {
            id: "abc".into(),
            question: "What is the meaning of the Sabbath day?".into(),
            answer: "The Sabbath is a day of rest.".into(),
            language: Language::English,
            has_classification: true,
            response_received: true,
            is_complete: true,
            style: Some("neutral".into()),
            opening_audio_duration_ms: Some(3000),
            ..Default::default()
        }
    }

    fn detector() -> AnomalyDetector {
        AnomalyDetector::default()
    }

    #[test]
    fn test_clean_interaction() {
        assert!(detector().detect(&answered()).is_empty());
    }

    #[test]
    fn test_orphan_stt_dropped_first() {
        let mut orphan = Interaction {
            id: "orphan_0".into(),
            is_orphan: true,
            question: "why is kashrut so complicated".into(),
            is_no_answer: true,
            language: Language::English,
            ..Default::default()
        };
        detector().annotate(&mut orphan);
        assert_eq!(orphan.anomaly_type, Some(AnomalyCode::SttDropped));
        assert!(orphan.is_anomaly);
    }

    #[test]
    fn test_greeting_orphan_is_clean() {
        let mut orphan = Interaction {
            id: "orphan_0".into(),
            is_orphan: true,
            is_greeting: true,
            question: "שלום".into(),
            language: Language::Hebrew,
            ..Default::default()
        };
        detector().annotate(&mut orphan);
        assert!(orphan.anomalies.is_empty());
        assert_eq!(orphan.anomaly_type, None);
        assert!(!orphan.is_anomaly);
    }

    #[test]
    fn test_unknown_language_greeting_orphan_is_clean() {
        for question in ["", "👋", "?"] {
            let orphan = Interaction {
                is_orphan: true,
                is_greeting: true,
                question: question.into(),
                language: Language::Unknown,
                ..Default::default()
            };
            assert!(detector().detect(&orphan).is_empty(), "{:?}", question);
        }

        let answered = Interaction {
            is_greeting: true,
            language: Language::Unknown,
            ..Default::default()
        };
        assert_eq!(detector().detect(&answered), vec![AnomalyCode::LangUnknown]);
    }

    #[test]
    fn test_no_response_vs_empty_response() {
        let mut no_response = answered();
        no_response.response_received = false;
        no_response.is_complete = false;
        no_response.answer.clear();
        let codes = detector().detect(&no_response);
        assert!(codes.contains(&AnomalyCode::LlmError));
        assert!(!codes.contains(&AnomalyCode::EmptyResponse));

        let mut empty = answered();
        empty.answer = "   ".into();
        let codes = detector().detect(&empty);
        assert!(codes.contains(&AnomalyCode::EmptyResponse));
        assert!(!codes.contains(&AnomalyCode::LlmError));
    }

    #[test]
    fn test_latency_critical_wins_over_warn() {
        let mut i = answered();
        i.latency_ms = Some(7000);
        let codes = detector().detect(&i);
        assert!(codes.contains(&AnomalyCode::LatencySpikeCritical));
        assert!(!codes.contains(&AnomalyCode::LatencySpikeWarn));

        i.latency_ms = Some(4000);
        let codes = detector().detect(&i);
        assert!(codes.contains(&AnomalyCode::LatencySpikeWarn));

        i.latency_ms = Some(3000);
        assert!(detector().detect(&i).is_empty());
    }

    #[test]
    fn test_opening_latency() {
        let mut i = answered();
        i.opening_latency_ms = Some(5001);
        assert!(detector().detect(&i).contains(&AnomalyCode::OpeningLatencyCritical));
        i.opening_latency_ms = Some(3500);
        assert!(detector().detect(&i).contains(&AnomalyCode::OpeningLatencyWarn));
    }

    #[test]
    fn test_think_overflow_uses_clip_duration() {
        let mut i = answered();
        i.generation_ms = Some(3200);
        assert!(detector().detect(&i).contains(&AnomalyCode::ThinkOverflow));
        i.opening_audio_duration_ms = Some(4000);
        assert!(!detector().detect(&i).contains(&AnomalyCode::ThinkOverflow));
    }

    #[test]
    fn test_independent_checks_accumulate() {
        let mut i = answered();
        i.language = Language::Unknown;
        i.is_out_of_order = true;
        i.error_codes = vec![500];
        i.answer = "As an AI I cannot say. Please rephrase.".into();
        i.style = Some("cheerful".into());
        let mut i2 = i.clone();
        detector().annotate(&mut i2);
        assert_eq!(
            i2.anomalies,
            vec![
                AnomalyCode::LangUnknown,
                AnomalyCode::OutOfOrder,
                AnomalyCode::Non200Code,
                AnomalyCode::FallbackTriggered,
                AnomalyCode::PersonaBreak,
                AnomalyCode::StyleAnomaly,
            ]
        );
        assert_eq!(i2.anomaly_type, Some(AnomalyCode::LangUnknown));
        assert!(i2.is_comprehension_failure);
    }

    #[test]
    fn test_stt_truncation() {
        let mut i = answered();
        i.question = "the laws concerning".into();
        assert!(detector().detect(&i).contains(&AnomalyCode::SttTruncation));
        i.is_greeting = true;
        assert!(!detector().detect(&i).contains(&AnomalyCode::SttTruncation));
    }

    #[test]
    fn test_missing_data_never_triggers() {
        let i = Interaction {
            language: Language::Hebrew,
            ..Default::default()
        };
        assert!(detector().detect(&i).is_empty());
    }
}
