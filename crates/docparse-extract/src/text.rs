//! Plain text and CSV extractors.

use async_trait::async_trait;
use docparse_core::{ContentExtractor, DocumentFormat, ExtractError};
use std::path::Path;
use tokio::fs;

use crate::run_blocking;

/// Read a file as UTF-8, replacing invalid sequences.
pub(crate) async fn read_lossy(path: &Path) -> Result<String, ExtractError> {
    let bytes = fs::read(path).await?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Extractor for plain text files.
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    /// Create a new text extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for PlainTextExtractor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Txt, DocumentFormat::Text]
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let text = read_lossy(path).await?;
        Ok(text
            .strip_prefix('\u{feff}')
            .map(str::to_string)
            .unwrap_or(text))
    }
}

/// Extractor for comma-separated values.
///
/// Each record becomes one line with its fields joined by `", "`. Quoting is
/// resolved and ragged rows are accepted.
pub struct CsvExtractor;

impl CsvExtractor {
    /// Create a new CSV extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for CsvExtractor {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Csv]
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let text = read_lossy(path).await?;
        run_blocking(move || csv_to_text(&text)).await
    }
}

fn csv_to_text(text: &str) -> Result<String, ExtractError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut lines = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ExtractError::Parse(format!("invalid CSV: {e}")))?;
        lines.push(record.iter().collect::<Vec<_>>().join(", "));
    }

    Ok(lines.join("\n"))
}
