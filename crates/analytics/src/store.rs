//! JSON persistence of daily documents and the corpus

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use kiosk_insight_core::{Error, Result};

use crate::summary::DailyDocument;

/// Write `value` as pretty-printed UTF-8 JSON, creating parent directories
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load every `*.json` daily document in `dir`, in file-name order.
///
/// Files that do not deserialize as a daily document are skipped with a
/// warning, so a corpus written into the same directory is ignored.
pub fn read_documents(dir: &Path) -> Result<Vec<DailyDocument>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let text = fs::read_to_string(&path)?;
        match serde_json::from_str::<DailyDocument>(&text) {
            Ok(doc) => documents.push(doc),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping non-daily JSON file");
            }
        }
    }

    if documents.is_empty() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no daily documents in {}", dir.display()),
        )));
    }
    Ok(documents)
}
