//! Session segmentation, daily summaries and the cross-day corpus
//!
//! Everything here is a pure aggregate over reconstructed interactions and
//! is recomputed wholesale on each run.

pub mod corpus;
pub mod sessions;
pub mod store;
pub mod summary;

pub use corpus::{
    build_corpus, dedup_ids, percentile, AnomalyLogEntry, Corpus, CorpusMeta, DateRange,
    Distribution, Kpi, TopicTrendRow,
};
pub use sessions::{segment, session_anomalies, SessionSegmenter};
pub use store::{read_documents, write_json};
pub use summary::{summarize, DailyDocument, DailySummary, Health, PhaseStats};
