//! Per-day aggregation

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use kiosk_insight_core::time::format_hh_mm;
use kiosk_insight_core::{Interaction, Session, SessionAnomaly};
use kiosk_insight_pipeline::{ParseReport, ProcessedLog};

use crate::sessions::SessionSegmenter;

/// Count / min / avg / max over the values that are present
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseStats {
    pub count: usize,
    pub min: Option<i64>,
    pub avg: Option<f64>,
    pub max: Option<i64>,
}

impl PhaseStats {
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let mut stats = Self::default();
        let mut sum = 0i128;
        for v in values {
            stats.count += 1;
            sum += i128::from(v);
            stats.min = Some(stats.min.map_or(v, |m| m.min(v)));
            stats.max = Some(stats.max.map_or(v, |m| m.max(v)));
        }
        if stats.count > 0 {
            stats.avg = Some(round1(sum as f64 / stats.count as f64));
        }
        stats
    }
}

/// Overall verdict for a day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    #[default]
    Healthy,
    Issues,
    Critical,
}

impl Health {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Issues => "issues",
            Self::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: String,
    pub day_of_week: String,
    pub total_conversations: usize,
    pub questions: usize,
    pub greetings: usize,

    pub opening_latency: PhaseStats,
    pub generation: PhaseStats,
    pub delivery: PhaseStats,
    pub total_latency: PhaseStats,

    pub language_distribution: BTreeMap<String, usize>,
    pub topic_distribution: BTreeMap<String, usize>,
    pub question_type_distribution: BTreeMap<String, usize>,
    /// Keyed by local hour 0..=23
    pub hourly_distribution: BTreeMap<u32, usize>,

    pub anomaly_count: usize,
    pub no_answer_count: usize,
    pub comprehension_failures: usize,
    pub out_of_order_count: usize,
    pub complete_count: usize,
    pub vip_count: usize,
    pub thank_you_interrupts: usize,
    /// Critical anomaly codes, counted per occurrence
    pub critical_count: usize,
    pub warning_count: usize,

    pub session_count: usize,
    pub first_interaction: Option<String>,
    pub last_interaction: Option<String>,
    pub health: Health,
}

/// Aggregate one day of interactions
pub fn summarize(date: &str, interactions: &[Interaction], sessions: &[Session]) -> DailySummary {
    let mut summary = DailySummary {
        date: date.to_string(),
        day_of_week: day_of_week(date).unwrap_or_default(),
        total_conversations: interactions.len(),
        session_count: sessions.len(),
        opening_latency: PhaseStats::from_values(
            interactions.iter().filter_map(|i| i.opening_latency_ms),
        ),
        generation: PhaseStats::from_values(interactions.iter().filter_map(|i| i.generation_ms)),
        delivery: PhaseStats::from_values(interactions.iter().filter_map(|i| i.delivery_ms)),
        total_latency: PhaseStats::from_values(interactions.iter().filter_map(|i| i.latency_ms)),
        ..Default::default()
    };

    let mut first: Option<NaiveDateTime> = None;
    let mut last: Option<NaiveDateTime> = None;

    for i in interactions {
        if i.is_greeting {
            summary.greetings += 1;
        } else {
            summary.questions += 1;
        }

        bump(&mut summary.language_distribution, i.language.locale());
        bump(&mut summary.topic_distribution, i.topic.name());
        bump(&mut summary.question_type_distribution, &i.question_type);

        if let Some(dt) = i.local_datetime() {
            *summary.hourly_distribution.entry(i.hour).or_insert(0) += 1;
            first = Some(first.map_or(dt, |f| f.min(dt)));
            last = Some(last.map_or(dt, |l| l.max(dt)));
        }

        summary.anomaly_count += usize::from(i.is_anomaly);
        summary.no_answer_count += usize::from(i.is_no_answer);
        summary.comprehension_failures += usize::from(i.is_comprehension_failure);
        summary.out_of_order_count += usize::from(i.is_out_of_order);
        summary.complete_count += usize::from(i.is_complete);
        summary.vip_count += usize::from(i.vip.is_some());
        summary.thank_you_interrupts += usize::from(i.is_thank_you_interrupt);

        for code in &i.anomalies {
            if code.is_critical() {
                summary.critical_count += 1;
            } else {
                summary.warning_count += 1;
            }
        }
    }

    summary.first_interaction = first.as_ref().map(format_hh_mm);
    summary.last_interaction = last.as_ref().map(format_hh_mm);
    summary.health = if summary.critical_count > 0 {
        Health::Critical
    } else if summary.warning_count > 0 {
        Health::Issues
    } else {
        Health::Healthy
    };

    summary
}

/// Everything produced for one log file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyDocument {
    pub date: String,
    pub filename: String,
    pub summary: DailySummary,
    pub interactions: Vec<Interaction>,
    pub sessions: Vec<Session>,
    pub session_anomalies: Vec<SessionAnomaly>,
    pub parse_report: ParseReport,
}

impl DailyDocument {
    /// Segment, summarize and package a processed log
    pub fn build(
        date: impl Into<String>,
        filename: impl Into<String>,
        processed: ProcessedLog,
        segmenter: &SessionSegmenter,
    ) -> Self {
        let date = date.into();
        let ProcessedLog {
            interactions,
            report,
        } = processed;

        let sessions = segmenter.segment(&interactions);
        let session_anomalies = segmenter.anomalies(&interactions, &sessions);
        let summary = summarize(&date, &interactions, &sessions);

        tracing::debug!(
            date = %date,
            sessions = sessions.len(),
            session_anomalies = session_anomalies.len(),
            health = summary.health.as_str(),
            "Built daily document"
        );

        Self {
            date,
            filename: filename.into(),
            summary,
            interactions,
            sessions,
            session_anomalies,
            parse_report: report,
        }
    }
}

fn bump(map: &mut BTreeMap<String, usize>, key: &str) {
    *map.entry(key.to_string()).or_insert(0) += 1;
}

fn day_of_week(date: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some(
        match date.weekday() {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
        .to_string(),
    )
}

pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
