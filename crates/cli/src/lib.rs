//! Batch commands behind the `kiosk-insight` binary
//!
//! - `process`: one daily JSON document per log file
//! - `accumulate`: merge a directory of daily documents into the corpus

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};

use kiosk_insight_analytics::{build_corpus, read_documents, write_json, Corpus, DailyDocument, SessionSegmenter};
use kiosk_insight_config::{EnrichmentConfig, Settings};
use kiosk_insight_core::{InteractionClassifier, NoopClassifier, NoopTranslator, Translator};
use kiosk_insight_llm::ChatClient;
use kiosk_insight_pipeline::{Enricher, LogProcessor};

/// Date encoded in a log file stem: `YYYYMMDD` or `YYYYMMDD-n`
pub fn date_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let digits = match stem.split_once('-') {
        Some((date, suffix)) if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) => date,
        Some(_) => return None,
        None => stem,
    };
    if digits.len() != 8 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let date = NaiveDate::parse_from_str(digits, "%Y%m%d").ok()?;
    Some(date.format("%Y-%m-%d").to_string())
}

/// Output path of the daily document for `input`
pub fn output_path(input: &Path, out_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "log".to_string());
    out_dir.join(format!("{}.json", stem))
}

/// Chat-backed enricher, or a disabled one when enrichment is off or the
/// client cannot be built
pub fn build_enricher(config: &EnrichmentConfig, requested: bool) -> Enricher {
    if !(requested && config.enabled) {
        if requested {
            tracing::warn!("--enrich given but enrichment.enabled is false; skipping enrichment");
        }
        return Enricher::disabled();
    }

    let client = match ChatClient::new(config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::warn!(error = %e, "Enrichment client unavailable; continuing without it");
            return Enricher::disabled();
        }
    };
    tracing::info!(model = client.model(), "Enrichment enabled");

    let translator: Arc<dyn Translator> = if config.translate {
        client.clone()
    } else {
        Arc::new(NoopTranslator)
    };
    let classifier: Arc<dyn InteractionClassifier> = if config.classify {
        client
    } else {
        Arc::new(NoopClassifier)
    };
    Enricher::new(translator, classifier, config)
}

/// Process each log into `out_dir/<stem>.json`. Every input is checked
/// before anything is written.
pub async fn process_files(
    inputs: &[PathBuf],
    out_dir: &Path,
    settings: &Settings,
    enricher: &Enricher,
) -> Result<Vec<PathBuf>> {
    if inputs.is_empty() {
        bail!("no log files given");
    }
    for input in inputs {
        if !input.is_file() {
            bail!("log file not found: {}", input.display());
        }
    }

    let processor = LogProcessor::new(&settings.analysis)?;
    let segmenter = SessionSegmenter::new(&settings.sessions);
    let mut written = Vec::with_capacity(inputs.len());

    for input in inputs {
        let text = fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?;
        let file_date = date_from_path(input);
        if file_date.is_none() {
            tracing::warn!(
                file = %input.display(),
                "File name carries no YYYYMMDD date; using event timestamps"
            );
        }

        let mut processed = processor.process_str(&text, file_date.as_deref());
        enricher.enrich(&mut processed.interactions).await;

        let date = file_date
            .or_else(|| {
                processed
                    .interactions
                    .iter()
                    .map(|i| i.date.clone())
                    .find(|d| !d.is_empty())
            })
            .unwrap_or_default();
        let filename = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let document = DailyDocument::build(date, filename, processed, &segmenter);
        let path = output_path(input, out_dir);
        write_json(&path, &document)
            .with_context(|| format!("failed to write {}", path.display()))?;

        tracing::info!(
            file = %input.display(),
            output = %path.display(),
            date = %document.date,
            interactions = document.interactions.len(),
            health = document.summary.health.as_str(),
            "Wrote daily document"
        );
        written.push(path);
    }

    Ok(written)
}

/// Merge every daily document in `dir` and write the corpus to `out`
pub fn accumulate(dir: &Path, out: &Path, generated_at: DateTime<Utc>) -> Result<Corpus> {
    if !dir.is_dir() {
        bail!("not a directory: {}", dir.display());
    }
    let documents = read_documents(dir)
        .with_context(|| format!("failed to read daily documents from {}", dir.display()))?;
    let corpus = build_corpus(&documents, generated_at);
    write_json(out, &corpus).with_context(|| format!("failed to write {}", out.display()))?;
    Ok(corpus)
}
