//! Cross-day accumulation
//!
//! Merges daily documents into one corpus and recomputes every KPI from the
//! merged interactions. Nothing is carried over from previous runs.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kiosk_insight_core::{AnomalyCode, Interaction, Language, Severity, Topic};

use crate::summary::{round1, DailyDocument, DailySummary};

/// Characters of question text kept in the anomaly log
pub const QUESTION_PREVIEW_CHARS: usize = 80;

pub const GENERATED_BY: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusMeta {
    pub last_updated: DateTime<Utc>,
    pub total_days: usize,
    pub total_conversations: usize,
    pub date_range: Option<DateRange>,
    pub generated_by: String,
}

/// Average, maximum and nearest-rank percentiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub count: usize,
    pub avg: Option<f64>,
    pub max: Option<i64>,
    pub p50: Option<i64>,
    pub p90: Option<i64>,
    pub p95: Option<i64>,
    pub p99: Option<i64>,
}

impl Distribution {
    pub fn from_values(mut values: Vec<i64>) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        values.sort_unstable();
        let sum: i128 = values.iter().map(|v| i128::from(*v)).sum();
        Self {
            count: values.len(),
            avg: Some(round1(sum as f64 / values.len() as f64)),
            max: values.last().copied(),
            p50: percentile(&values, 50.0),
            p90: percentile(&values, 90.0),
            p95: percentile(&values, 95.0),
            p99: percentile(&values, 99.0),
        }
    }
}

/// Nearest-rank percentile over sorted values
pub fn percentile(sorted: &[i64], p: f64) -> Option<i64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted.get(rank.clamp(1, sorted.len()) - 1).copied()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub total_conversations: usize,
    pub total_days: usize,
    pub avg_per_day: f64,

    pub total_latency: Distribution,
    pub opening_latency: Distribution,
    pub generation: Distribution,
    /// Share of timed generations shorter than their opening clip
    pub seamless_rate: Option<f64>,
    pub avg_net_gap_ms: Option<f64>,

    pub anomaly_count: usize,
    pub anomaly_rate: f64,
    pub comprehension_failures: usize,
    pub failure_rate: f64,
    pub out_of_order_count: usize,
    pub out_of_order_rate: f64,

    pub language_distribution: BTreeMap<Language, usize>,
    pub topic_distribution: BTreeMap<Topic, usize>,
}

/// Topic counts for one day, flattened into `{date, <topic>: count}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicTrendRow {
    pub date: String,
    #[serde(flatten)]
    pub counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyLogEntry {
    pub date: String,
    pub time: String,
    pub id: String,
    pub code: AnomalyCode,
    pub severity: Severity,
    pub question: String,
    pub latency_ms: Option<i64>,
    pub language: Language,
    pub topic: Topic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    pub meta: CorpusMeta,
    pub kpi: Kpi,
    pub daily_stats: Vec<DailySummary>,
    pub topic_trend: Vec<TopicTrendRow>,
    pub anomaly_log: Vec<AnomalyLogEntry>,
    pub conversations: Vec<Interaction>,
}

/// Merge daily documents into one corpus
pub fn build_corpus(documents: &[DailyDocument], generated_at: DateTime<Utc>) -> Corpus {
    let mut days: Vec<&DailyDocument> = documents.iter().collect();
    days.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.filename.cmp(&b.filename)));

    let mut conversations: Vec<Interaction> = days
        .iter()
        .flat_map(|doc| {
            doc.interactions.iter().cloned().map(move |mut i| {
                i.source_file = Some(doc.filename.clone());
                i
            })
        })
        .collect();
    conversations.sort_by(|a, b| (&a.date, &a.time).cmp(&(&b.date, &b.time)));
    let renamed = dedup_ids(&mut conversations);
    if renamed > 0 {
        tracing::info!(renamed, "Renamed colliding interaction ids");
    }

    let mut distinct_dates: Vec<&str> = days.iter().map(|d| d.date.as_str()).collect();
    distinct_dates.dedup();
    let total_days = distinct_dates.len();

    let date_range = match (distinct_dates.first(), distinct_dates.last()) {
        (Some(start), Some(end)) => Some(DateRange {
            start: start.to_string(),
            end: end.to_string(),
        }),
        _ => None,
    };

    let corpus = Corpus {
        meta: CorpusMeta {
            last_updated: generated_at,
            total_days,
            total_conversations: conversations.len(),
            date_range,
            generated_by: GENERATED_BY.to_string(),
        },
        kpi: compute_kpi(&conversations, total_days),
        daily_stats: days.iter().map(|d| d.summary.clone()).collect(),
        topic_trend: topic_trend(&conversations),
        anomaly_log: anomaly_log(&conversations),
        conversations,
    };

    tracing::info!(
        days = corpus.meta.total_days,
        conversations = corpus.meta.total_conversations,
        anomalies = corpus.anomaly_log.len(),
        "Built corpus"
    );
    corpus
}

/// Give every interaction a unique id. The first occurrence keeps its id;
/// later ones get the lowest free `_<n>` suffix. Returns how many were renamed.
pub fn dedup_ids(interactions: &mut [Interaction]) -> usize {
    let mut taken: HashSet<String> = HashSet::with_capacity(interactions.len());
    let mut renamed = 0;

    for interaction in interactions.iter_mut() {
        if taken.insert(interaction.id.clone()) {
            continue;
        }
        let mut n = 1;
        let fresh = loop {
            let candidate = format!("{}_{}", interaction.id, n);
            if !taken.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        taken.insert(fresh.clone());
        interaction.id = fresh;
        renamed += 1;
    }

    renamed
}

fn compute_kpi(conversations: &[Interaction], total_days: usize) -> Kpi {
    let total = conversations.len();
    let rate = |count: usize| {
        if total == 0 {
            0.0
        } else {
            round1(count as f64 * 100.0 / total as f64)
        }
    };

    let timed: Vec<(i64, Option<i64>)> = conversations
        .iter()
        .filter_map(|i| i.generation_ms.map(|g| (g, i.opening_audio_duration_ms)))
        .collect();
    let with_clip: Vec<bool> = timed
        .iter()
        .filter_map(|(g, clip)| clip.map(|c| *g < c))
        .collect();
    let seamless_rate = (!with_clip.is_empty()).then(|| {
        round1(with_clip.iter().filter(|s| **s).count() as f64 * 100.0 / with_clip.len() as f64)
    });

    let gaps: Vec<i64> = conversations.iter().filter_map(|i| i.net_gap_ms).collect();
    let avg_net_gap_ms = (!gaps.is_empty()).then(|| {
        let sum: i128 = gaps.iter().map(|g| i128::from(*g)).sum();
        round1(sum as f64 / gaps.len() as f64)
    });

    let anomaly_count = conversations.iter().filter(|i| i.is_anomaly).count();
    let comprehension_failures = conversations
        .iter()
        .filter(|i| i.is_comprehension_failure)
        .count();
    let out_of_order_count = conversations.iter().filter(|i| i.is_out_of_order).count();

    let mut language_distribution = BTreeMap::new();
    let mut topic_distribution = BTreeMap::new();
    for i in conversations {
        *language_distribution.entry(i.language).or_insert(0) += 1;
        *topic_distribution.entry(i.topic).or_insert(0) += 1;
    }

    Kpi {
        total_conversations: total,
        total_days,
        avg_per_day: if total_days == 0 {
            0.0
        } else {
            round1(total as f64 / total_days as f64)
        },
        total_latency: Distribution::from_values(
            conversations.iter().filter_map(|i| i.latency_ms).collect(),
        ),
        opening_latency: Distribution::from_values(
            conversations.iter().filter_map(|i| i.opening_latency_ms).collect(),
        ),
        generation: Distribution::from_values(timed.iter().map(|(g, _)| *g).collect()),
        seamless_rate,
        avg_net_gap_ms,
        anomaly_count,
        anomaly_rate: rate(anomaly_count),
        comprehension_failures,
        failure_rate: rate(comprehension_failures),
        out_of_order_count,
        out_of_order_rate: rate(out_of_order_count),
        language_distribution,
        topic_distribution,
    }
}

fn topic_trend(conversations: &[Interaction]) -> Vec<TopicTrendRow> {
    let mut by_date: BTreeMap<&str, BTreeMap<String, usize>> = BTreeMap::new();
    for i in conversations {
        *by_date
            .entry(i.date.as_str())
            .or_default()
            .entry(i.topic.name().to_string())
            .or_insert(0) += 1;
    }
    by_date
        .into_iter()
        .map(|(date, counts)| TopicTrendRow {
            date: date.to_string(),
            counts,
        })
        .collect()
}

fn anomaly_log(conversations: &[Interaction]) -> Vec<AnomalyLogEntry> {
    conversations
        .iter()
        .flat_map(|i| {
            i.anomalies.iter().map(move |code| AnomalyLogEntry {
                date: i.date.clone(),
                time: i.time.clone(),
                id: i.id.clone(),
                code: *code,
                severity: code.severity(),
                question: i.question.chars().take(QUESTION_PREVIEW_CHARS).collect(),
                latency_ms: i.latency_ms,
                language: i.language,
                topic: i.topic,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_id(id: &str) -> Interaction {
        Interaction {
            id: id.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_percentile_nearest_rank() {
        let values: Vec<i64> = (1..=10).map(|v| v * 100).collect();
        assert_eq!(percentile(&values, 50.0), Some(500));
        assert_eq!(percentile(&values, 90.0), Some(900));
        assert_eq!(percentile(&values, 95.0), Some(1000));
        assert_eq!(percentile(&values, 99.0), Some(1000));
        assert_eq!(percentile(&[42], 50.0), Some(42));
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn test_distribution() {
        let d = Distribution::from_values(vec![300, 100, 200]);
        assert_eq!(d.count, 3);
        assert_eq!(d.avg, Some(200.0));
        assert_eq!(d.max, Some(300));
        assert_eq!(d.p50, Some(200));
        assert_eq!(Distribution::from_values(Vec::new()), Distribution::default());

        let wide = Distribution::from_values(vec![i64::MAX, i64::MAX, i64::MAX]);
        assert_eq!(wide.avg, Some(i64::MAX as f64));
        assert_eq!(wide.p99, Some(i64::MAX));
    }

    #[test]
    fn test_dedup_ids_skips_taken_suffixes() {
        let mut items = vec![with_id("abc"), with_id("abc_1"), with_id("abc"), with_id("abc")];
        assert_eq!(dedup_ids(&mut items), 2);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["abc", "abc_1", "abc_2", "abc_3"]);
    }

    #[test]
    fn test_anomaly_log_preview() {
        let i = Interaction {
            id: "x".into(),
            question: "א".repeat(120),
            anomalies: vec![AnomalyCode::SttDropped, AnomalyCode::PersonaBreak],
            ..Default::default()
        };
        let log = anomaly_log(&[i]);
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].question.chars().count(), QUESTION_PREVIEW_CHARS);
        assert_eq!(log[1].severity, Severity::Critical);
    }

    #[test]
    fn test_seamless_rate_only_counts_timed() {
        let mut fast = with_id("a");
        fast.generation_ms = Some(1000);
        fast.opening_audio_duration_ms = Some(3000);
        let mut slow = with_id("b");
        slow.generation_ms = Some(4000);
        slow.opening_audio_duration_ms = Some(3000);
        let untimed = with_id("c");

        let kpi = compute_kpi(&[fast, slow, untimed], 1);
        assert_eq!(kpi.seamless_rate, Some(50.0));
        assert_eq!(kpi.generation.count, 2);
        assert_eq!(kpi.avg_per_day, 3.0);
    }
}
