//! Log processing pipeline
//!
//! ```text
//! raw lines ──► parser ──► events ──► reconstructor ──► interactions ──► anomaly detector
//!                                         │                                   │
//!                              classifier tables                   (optional) enricher
//! ```
//!
//! Parsing, reconstruction and detection are synchronous and pure over one
//! file. Enrichment is async because it talks to external services.

pub mod anomaly;
pub mod enrich;
pub mod parser;
pub mod reconstruct;

pub use anomaly::AnomalyDetector;
pub use enrich::{Enricher, EnrichmentStats};
pub use parser::{parse_lines, parse_str, ParseReport, ParsedLog};
pub use reconstruct::{Reconstructor, DEFAULT_QUESTION_TYPE, GREETING_QUESTION_TYPE};

use kiosk_insight_config::AnalysisConfig;
use kiosk_insight_core::{Interaction, Result};

/// Output of processing one log file
#[derive(Debug, Clone, Default)]
pub struct ProcessedLog {
    pub interactions: Vec<Interaction>,
    pub report: ParseReport,
}

/// Parse, reconstruct and annotate one file
#[derive(Debug, Clone)]
pub struct LogProcessor {
    reconstructor: Reconstructor,
    detector: AnomalyDetector,
}

impl LogProcessor {
    pub fn new(analysis: &AnalysisConfig) -> Result<Self> {
        Ok(Self {
            reconstructor: Reconstructor::new(analysis)?,
            detector: AnomalyDetector::new(analysis.thresholds.clone()),
        })
    }

    pub fn process_str(&self, text: &str, fallback_date: Option<&str>) -> ProcessedLog {
        let parsed = parse_str(text);
        let mut interactions = self.reconstructor.reconstruct(&parsed.events, fallback_date);
        self.detector.annotate_all(&mut interactions);

        tracing::info!(
            lines = parsed.report.total_lines,
            skipped = parsed.report.skipped,
            interactions = interactions.len(),
            anomalies = interactions.iter().filter(|i| i.is_anomaly).count(),
            "Processed log"
        );

        ProcessedLog {
            interactions,
            report: parsed.report,
        }
    }
}
