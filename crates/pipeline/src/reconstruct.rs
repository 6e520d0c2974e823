//! Interaction reconstruction
//!
//! Turns the flat event list of one log file into interactions:
//! 1. Partition events into question-triggers and response groups keyed by
//!    correlation id (first-seen order).
//! 2. Derive the T1/T2/T3 markers of each group.
//! 3. Claim, for each group, the unclaimed trigger with the latest time not
//!    after the group's own time.
//! 4. Decompose latency into opening / generation / delivery phases.
//! 5. Emit every unclaimed trigger as an orphan.
//! 6. Sort by effective time and re-sequence.
//!
//! Claim state lives in a local ordered index; nothing survives the call.

use std::collections::{BTreeSet, HashMap};

use chrono::{NaiveDateTime, Timelike};
use chrono_tz::Tz;

use kiosk_insight_config::AnalysisConfig;
use kiosk_insight_core::time::{format_date, parse_local_time, parse_timezone, to_epoch_ms};
use kiosk_insight_core::{
    ClassificationPayload, Event, EventKind, FragmentPayload, Interaction, Language,
    LatencyBreakdown, Markers, Result, Sensitivity, SubEvent, ThankYou, Topic, ORPHAN_ID_PREFIX,
};
use kiosk_insight_text_processing::{
    classify_topic, detect_language, detect_thank_you, detect_vip, is_greeting, rate_sensitivity,
};

/// Question type when the classifier declared none
pub const DEFAULT_QUESTION_TYPE: &str = "General";
/// Question type of an unanswered greeting
pub const GREETING_QUESTION_TYPE: &str = "Greeting";

const NEUTRAL_STYLE: &str = "neutral";

#[derive(Debug)]
struct Trigger<'a> {
    index: usize,
    text: &'a str,
    raw_time: Option<&'a str>,
    time: Option<NaiveDateTime>,
}

#[derive(Debug)]
struct ResponseGroup<'a> {
    id: &'a str,
    raw_time: Option<&'a str>,
    time: Option<NaiveDateTime>,
    classification: Option<&'a ClassificationPayload>,
    classification_ts: Option<i64>,
    fragments: Vec<(&'a FragmentPayload, Option<i64>)>,
    error_codes: Vec<i64>,
}

impl<'a> ResponseGroup<'a> {
    fn new(id: &'a str, raw_time: Option<&'a str>) -> Self {
        Self {
            id,
            raw_time,
            time: raw_time.and_then(parse_local_time),
            classification: None,
            classification_ts: None,
            fragments: Vec::new(),
            error_codes: Vec::new(),
        }
    }

    fn markers(&self) -> Markers {
        let fragment_ts = self.fragments.iter().filter_map(|(_, ts)| *ts);
        Markers {
            t0: None,
            t1: self.classification_ts,
            t2: fragment_ts.clone().min(),
            t3: fragment_ts.max(),
        }
    }

    fn answer(&self) -> String {
        self.fragments.iter().map(|(f, _)| f.text.as_str()).collect()
    }

    /// First non-neutral style, else the first declared one
    fn style(&self) -> (Option<String>, Option<f64>) {
        let styled = self
            .fragments
            .iter()
            .map(|(f, _)| *f)
            .filter(|f| f.style.as_deref().is_some_and(|s| !s.trim().is_empty()));
        let pick = styled
            .clone()
            .find(|f| !f.style.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(NEUTRAL_STYLE)))
            .or_else(|| styled.clone().next());
        match pick {
            Some(f) => (f.style.clone(), f.style_degree),
            None => (None, None),
        }
    }
}

/// Split events into triggers and response groups
fn partition(events: &[Event]) -> (Vec<Trigger<'_>>, Vec<ResponseGroup<'_>>) {
    let mut triggers = Vec::new();
    let mut groups: Vec<ResponseGroup<'_>> = Vec::new();
    let mut group_index: HashMap<&str, usize> = HashMap::new();

    for event in events {
        match &event.kind {
            EventKind::QuestionTrigger { text } => {
                let raw_time = event.time.as_deref();
                triggers.push(Trigger {
                    index: triggers.len(),
                    text: text.trim(),
                    raw_time,
                    time: raw_time.and_then(parse_local_time),
                });
            }
            EventKind::ResponseEnvelope(resp) => {
                let idx = *group_index.entry(resp.id.as_str()).or_insert_with(|| {
                    groups.push(ResponseGroup::new(&resp.id, event.time.as_deref()));
                    groups.len() - 1
                });
                let group = &mut groups[idx];

                if !resp.is_success() && !group.error_codes.contains(&resp.code) {
                    group.error_codes.push(resp.code);
                }

                match &resp.payload {
                    SubEvent::Classification(payload) => {
                        if group.classification.is_none() {
                            group.classification = Some(payload);
                        }
                        group.classification_ts = match (group.classification_ts, resp.timestamp_ms) {
                            (Some(a), Some(b)) => Some(a.min(b)),
                            (a, b) => a.or(b),
                        };
                    }
                    SubEvent::StreamFragment(payload) => {
                        group.fragments.push((payload, resp.timestamp_ms));
                    }
                    SubEvent::Other { .. } => {}
                }
            }
            EventKind::Other { .. } => {}
        }
    }

    (triggers, groups)
}

/// For each group (in order), the index of the trigger it claims.
///
/// Candidates are unclaimed triggers whose time is not after the group's
/// time; the latest wins, and among equal times the earliest trigger.
/// Triggers or groups without a parseable time never match.
fn correlate(triggers: &[Trigger<'_>], groups: &[ResponseGroup<'_>]) -> Vec<Option<usize>> {
    let mut available: BTreeSet<(NaiveDateTime, usize)> = triggers
        .iter()
        .filter_map(|t| t.time.map(|time| (time, t.index)))
        .collect();

    groups
        .iter()
        .map(|group| {
            let group_time = group.time?;
            let (latest, _) = *available.range(..=(group_time, usize::MAX)).next_back()?;
            let claimed = *available.range((latest, 0)..=(latest, usize::MAX)).next()?;
            available.remove(&claimed);
            Some(claimed.1)
        })
        .collect()
}

/// Rebuilds interactions from one file's events
#[derive(Debug, Clone)]
pub struct Reconstructor {
    tz: Tz,
    analysis: AnalysisConfig,
}

impl Reconstructor {
    pub fn new(analysis: &AnalysisConfig) -> Result<Self> {
        Ok(Self {
            tz: parse_timezone(&analysis.timezone)?,
            analysis: analysis.clone(),
        })
    }

    /// Reconstruct all interactions of one file.
    ///
    /// `fallback_date` (`YYYY-MM-DD`) is used when an interaction's own time
    /// does not parse.
    pub fn reconstruct(&self, events: &[Event], fallback_date: Option<&str>) -> Vec<Interaction> {
        let (triggers, groups) = partition(events);
        let claims = correlate(&triggers, &groups);

        let mut claimed = vec![false; triggers.len()];
        let mut interactions: Vec<(Option<NaiveDateTime>, Interaction)> =
            Vec::with_capacity(groups.len() + triggers.len());

        for (group, claim) in groups.iter().zip(&claims) {
            let trigger = claim.map(|i| {
                claimed[i] = true;
                &triggers[i]
            });
            let interaction = self.build_answered(group, trigger, fallback_date);
            let sort_time = trigger.and_then(|t| t.time).or(group.time);
            interactions.push((sort_time, interaction));
        }

        let answered = interactions.len();
        for trigger in triggers.iter().filter(|t| !claimed[t.index]) {
            interactions.push((trigger.time, self.build_orphan(trigger, fallback_date)));
        }

        tracing::debug!(
            triggers = triggers.len(),
            groups = groups.len(),
            answered,
            orphans = interactions.len() - answered,
            "Reconstructed interactions"
        );

        // Stable: equal times keep discovery order
        interactions.sort_by_key(|(time, _)| *time);

        interactions
            .into_iter()
            .enumerate()
            .map(|(i, (_, mut interaction))| {
                interaction.seq = i + 1;
                interaction
            })
            .collect()
    }

    fn build_answered(
        &self,
        group: &ResponseGroup<'_>,
        trigger: Option<&Trigger<'_>>,
        fallback_date: Option<&str>,
    ) -> Interaction {
        let question = trigger.map(|t| t.text).unwrap_or_default();
        let (time, raw_time) = match trigger {
            Some(t) => (t.time, t.raw_time),
            None => (group.time, group.raw_time),
        };

        let mut markers = group.markers();
        markers.t0 = trigger
            .and_then(|t| t.time)
            .and_then(|dt| to_epoch_ms(dt, self.tz));
        let latency = LatencyBreakdown::from_markers(&markers);

        let classification = group.classification;
        let language = classification
            .and_then(|c| c.language.as_deref())
            .and_then(Language::from_str_loose)
            .unwrap_or(Language::Unknown);
        let audio_id = classification.and_then(|c| c.audio_id.clone());
        let clip_ms = classification
            .map(|_| self.analysis.clip_duration_ms(audio_id.as_deref()));

        let answer = group.answer();
        let (style, style_degree) = group.style();

        let mut interaction = Interaction {
            id: group.id.to_string(),
            question_type: classification
                .and_then(|c| c.question_type.clone())
                .filter(|q| !q.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_QUESTION_TYPE.to_string()),
            opening_text: classification
                .and_then(|c| c.opening_text.clone())
                .unwrap_or_default(),
            audio_id,
            language,
            opening_audio_duration_ms: clip_ms,
            net_gap_ms: latency.generation_ms.zip(clip_ms).and_then(|(g, c)| g.checked_sub(c)),
            answer_length: answer.chars().count(),
            chunk_count: group.fragments.len(),
            has_classification: classification.is_some(),
            response_received: !group.fragments.is_empty(),
            is_complete: group.fragments.iter().any(|(f, _)| f.finished),
            error_codes: group.error_codes.clone(),
            style,
            style_degree,
            is_out_of_order: markers.is_out_of_order(),
            ..Default::default()
        };
        interaction.apply_latency(latency);
        self.fill_question(&mut interaction, question);
        self.fill_time(&mut interaction, time, raw_time, fallback_date);
        fill_answer(&mut interaction, answer);
        interaction
    }

    fn build_orphan(&self, trigger: &Trigger<'_>, fallback_date: Option<&str>) -> Interaction {
        let mut interaction = Interaction {
            id: format!("{}{}", ORPHAN_ID_PREFIX, trigger.index),
            is_orphan: true,
            language: detect_language(trigger.text),
            ..Default::default()
        };
        self.fill_question(&mut interaction, trigger.text);
        // An unanswered short or empty utterance is a greeting
        interaction.is_greeting = is_greeting(trigger.text);
        interaction.question_type = if interaction.is_greeting {
            GREETING_QUESTION_TYPE
        } else {
            DEFAULT_QUESTION_TYPE
        }
        .to_string();
        self.fill_time(&mut interaction, trigger.time, trigger.raw_time, fallback_date);
        fill_answer(&mut interaction, String::new());
        interaction
    }

    /// Question-derived labels
    fn fill_question(&self, interaction: &mut Interaction, question: &str) {
        interaction.question = question.to_string();
        if question.is_empty() {
            interaction.topic = Topic::General;
            interaction.sensitivity = Sensitivity::Low;
            return;
        }
        interaction.topic = classify_topic(question);
        interaction.sensitivity = rate_sensitivity(interaction.topic, question);
        interaction.is_greeting = is_greeting(question);
        interaction.vip = detect_vip(question);
        interaction.thank_you = detect_thank_you(question);
        interaction.is_thank_you_interrupt = interaction.thank_you == Some(ThankYou::Stop);
        if detect_language(question) == Language::English {
            interaction.question_en = question.to_string();
        }
    }

    fn fill_time(
        &self,
        interaction: &mut Interaction,
        time: Option<NaiveDateTime>,
        raw_time: Option<&str>,
        fallback_date: Option<&str>,
    ) {
        match time {
            Some(dt) => {
                interaction.date = format_date(&dt);
                interaction.time = dt.format("%H:%M:%S").to_string();
                interaction.hour = dt.hour();
            }
            None => {
                interaction.date = fallback_date.unwrap_or_default().to_string();
                interaction.time = raw_time.unwrap_or_default().to_string();
            }
        }
    }
}

/// Answer-derived fields; language must already be set
fn fill_answer(interaction: &mut Interaction, answer: String) {
    interaction.is_no_answer = answer.trim().is_empty();
    if interaction.language == Language::English {
        interaction.answer_en = answer.clone();
    }
    interaction.needs_translation = interaction.language != Language::English
        && !(interaction.question.is_empty() && interaction.is_no_answer);
    interaction.answer = answer;
}
