//! Watchlist input: the list of identifiers to process.
//!
//! Two supported forms, chosen by file extension:
//! - plain text: one code per line, blank lines and `#` comments skipped
//! - `.csv`: two columns `identifier,title`, with an optional header row
//!
//! Entries are returned untouched; checksum validation happens in the
//! pipeline so invalid codes are reported per item, not at load time.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("cannot read watchlist {}: {message}", path.display())]
    Unreadable { path: PathBuf, message: String },

    #[error("malformed watchlist row in {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },
}

/// One watchlist entry: the raw (not yet validated) code and an optional
/// display title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEntry {
    pub code: String,
    pub title: Option<String>,
}

impl WatchEntry {
    pub fn bare(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: None,
        }
    }
}

/// Read a watchlist file in either supported form.
pub fn read_watchlist(path: &Path) -> Result<Vec<WatchEntry>, WatchlistError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => read_csv(path),
        _ => read_plain(path),
    }
}

fn read_plain(path: &Path) -> Result<Vec<WatchEntry>, WatchlistError> {
    let content = std::fs::read_to_string(path).map_err(|e| WatchlistError::Unreadable {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(WatchEntry::bare)
        .collect())
}

fn read_csv(path: &Path) -> Result<Vec<WatchEntry>, WatchlistError> {
    let malformed = |message: String| WatchlistError::Malformed {
        path: path.to_path_buf(),
        message,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| WatchlistError::Unreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut entries = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| malformed(e.to_string()))?;
        let code = record
            .get(0)
            .ok_or_else(|| malformed(format!("row {} has no identifier column", i + 1)))?
            .to_string();

        if code.is_empty() {
            continue;
        }
        // Optional header row
        if i == 0 && matches!(code.to_ascii_lowercase().as_str(), "identifier" | "isin") {
            continue;
        }

        let title = record
            .get(1)
            .map(str::to_string)
            .filter(|t| !t.is_empty());
        entries.push(WatchEntry { code, title });
    }

    Ok(entries)
}
