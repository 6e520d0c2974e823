//! Session segmentation and session-level anomalies

use std::collections::BTreeMap;
use std::ops::Range;

use chrono::{Duration, NaiveDateTime};

use kiosk_insight_config::SessionConfig;
use kiosk_insight_core::{Interaction, Language, Session, SessionAnomaly};

/// Split a chronologically sorted day into visitor sessions.
///
/// A new session starts when the gap to the last parseable time exceeds
/// `gap`. An interaction whose time does not parse joins the current
/// session.
pub fn segment(interactions: &[Interaction], gap: Duration) -> Vec<Session> {
    let mut ranges: Vec<Range<usize>> = Vec::new();
    let mut last_time: Option<NaiveDateTime> = None;

    for (idx, interaction) in interactions.iter().enumerate() {
        let time = interaction.local_datetime();
        let split = match (last_time, time) {
            (Some(prev), Some(now)) => now - prev > gap,
            _ => false,
        };

        match ranges.last_mut() {
            Some(current) if !split => current.end = idx + 1,
            _ => ranges.push(idx..idx + 1),
        }
        if time.is_some() {
            last_time = time;
        }
    }

    ranges
        .into_iter()
        .enumerate()
        .map(|(n, range)| build_session(n + 1, &interactions[range]))
        .collect()
}

/// Language switches and question-type skew, per session.
///
/// `sessions` must come from [`segment`] over the same slice; members are
/// taken as consecutive runs of `session.count` interactions.
pub fn session_anomalies(
    interactions: &[Interaction],
    sessions: &[Session],
    skew_ratio: f64,
) -> Vec<SessionAnomaly> {
    let mut found = Vec::new();
    let mut offset = 0;

    for session in sessions {
        let end = (offset + session.count).min(interactions.len());
        let members = &interactions[offset..end];
        offset = end;

        language_switches(session.number, members, &mut found);

        if members.len() < 2 {
            continue;
        }
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for interaction in members {
            *counts.entry(interaction.question_type.as_str()).or_insert(0) += 1;
        }
        // Ties resolve to the alphabetically first type
        let dominant = counts
            .iter()
            .fold(None::<(&str, usize)>, |best, (qt, count)| match best {
                Some((_, best_count)) if best_count >= *count => best,
                _ => Some((qt, *count)),
            });
        if let Some((question_type, count)) = dominant {
            let share = count as f64 / members.len() as f64;
            if share > skew_ratio {
                found.push(SessionAnomaly::QuestionTypeSkew {
                    session: session.number,
                    question_type: question_type.to_string(),
                    count,
                    share,
                });
            }
        }
    }

    found
}

fn language_switches(session: usize, members: &[Interaction], found: &mut Vec<SessionAnomaly>) {
    let mut previous: Option<Language> = None;
    for interaction in members {
        if interaction.language == Language::Unknown {
            continue;
        }
        if let Some(from) = previous.filter(|l| *l != interaction.language) {
            found.push(SessionAnomaly::LanguageSwitch {
                session,
                interaction_id: interaction.id.clone(),
                time: interaction.time.clone(),
                from,
                to: interaction.language,
            });
        }
        previous = Some(interaction.language);
    }
}

/// [`segment`] and [`session_anomalies`] bound to configured thresholds
#[derive(Debug, Clone)]
pub struct SessionSegmenter {
    gap: Duration,
    skew_ratio: f64,
}

impl Default for SessionSegmenter {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

impl SessionSegmenter {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            gap: Duration::minutes(config.gap_minutes),
            skew_ratio: config.question_type_skew,
        }
    }

    pub fn segment(&self, interactions: &[Interaction]) -> Vec<Session> {
        segment(interactions, self.gap)
    }

    pub fn anomalies(&self, interactions: &[Interaction], sessions: &[Session]) -> Vec<SessionAnomaly> {
        let anomalies = session_anomalies(interactions, sessions, self.skew_ratio);
        for anomaly in &anomalies {
            tracing::debug!(
                session = anomaly.session(),
                code = anomaly.code(),
                severity = %anomaly.severity(),
                "Session anomaly"
            );
        }
        anomalies
    }
}

fn build_session(number: usize, members: &[Interaction]) -> Session {
    let mut languages = Vec::new();
    let mut topics = Vec::new();
    for interaction in members {
        if !languages.contains(&interaction.language) {
            languages.push(interaction.language);
        }
        if !topics.contains(&interaction.topic) {
            topics.push(interaction.topic);
        }
    }

    Session {
        number,
        interaction_ids: members.iter().map(|i| i.id.clone()).collect(),
        start_time: members.first().map(|i| i.time.clone()).unwrap_or_default(),
        end_time: members.last().map(|i| i.time.clone()).unwrap_or_default(),
        count: members.len(),
        languages,
        topics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiosk_insight_core::Topic;

    fn at(id: &str, time: &str, language: Language, question_type: &str) -> Interaction {
        Interaction {
            id: id.into(),
            date: "2026-02-15".into(),
            time: time.into(),
            language,
            question_type: question_type.into(),
            topic: Topic::General,
            ..Default::default()
        }
    }

    #[test]
    fn test_gap_splits_sessions() {
        let items = vec![
            at("a", "10:00:00", Language::Hebrew, "Open"),
            at("b", "10:29:00", Language::Hebrew, "Closed"),
            at("c", "11:00:00", Language::Hebrew, "Open"),
            at("d", "11:30:00", Language::Hebrew, "Closed"),
        ];
        let sessions = SessionSegmenter::default().segment(&items);
        // 10:29 -> 11:00 is 31 minutes; 11:00 -> 11:30 is exactly 30
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].interaction_ids, vec!["a", "b"]);
        assert_eq!(sessions[1].interaction_ids, vec!["c", "d"]);
        assert_eq!(sessions[1].number, 2);
        assert_eq!(sessions[1].start_time, "11:00:00");
        assert_eq!(sessions[1].end_time, "11:30:00");
    }

    #[test]
    fn test_unparseable_time_folds_into_current() {
        let items = vec![
            at("a", "10:00:00", Language::Hebrew, "Open"),
            at("b", "??", Language::Hebrew, "Open"),
            at("c", "10:20:00", Language::Hebrew, "Open"),
        ];
        let sessions = SessionSegmenter::default().segment(&items);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].count, 3);
    }

    #[test]
    fn test_empty_input() {
        assert!(SessionSegmenter::default().segment(&[]).is_empty());
        assert!(session_anomalies(&[], &[], 0.7).is_empty());
    }

    #[test]
    fn test_language_switch() {
        let items = vec![
            at("a", "10:00:00", Language::Hebrew, "Open"),
            at("b", "10:01:00", Language::Unknown, "Closed"),
            at("c", "10:02:00", Language::English, "Open"),
            at("d", "10:03:00", Language::English, "Closed"),
        ];
        let segmenter = SessionSegmenter::default();
        let anomalies = segmenter.anomalies(&items, &segmenter.segment(&items));
        assert_eq!(
            anomalies,
            vec![SessionAnomaly::LanguageSwitch {
                session: 1,
                interaction_id: "c".into(),
                time: "10:02:00".into(),
                from: Language::Hebrew,
                to: Language::English,
            }]
        );
    }

    #[test]
    fn test_question_type_skew() {
        let items = vec![
            at("a", "10:00:00", Language::Hebrew, "Closed"),
            at("b", "10:01:00", Language::Hebrew, "Closed"),
            at("c", "10:02:00", Language::Hebrew, "Closed"),
            at("d", "10:03:00", Language::Hebrew, "Open"),
        ];
        let segmenter = SessionSegmenter::default();
        let anomalies = segmenter.anomalies(&items, &segmenter.segment(&items));
        assert_eq!(anomalies.len(), 1);
        match &anomalies[0] {
            SessionAnomaly::QuestionTypeSkew {
                question_type,
                count,
                share,
                ..
            } => {
                assert_eq!(question_type, "Closed");
                assert_eq!(*count, 3);
                assert!((share - 0.75).abs() < f64::EPSILON);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_single_interaction_session_has_no_skew() {
        let items = vec![at("a", "10:00:00", Language::Hebrew, "Closed")];
        let sessions = segment(&items, Duration::minutes(30));
        assert!(session_anomalies(&items, &sessions, 0.7).is_empty());
    }
}
