//! PDF content extractor.
//!
//! Uses pdf-extract for the text layer. Scanned pages without a text layer
//! yield nothing; there is no OCR.

use async_trait::async_trait;
use docparse_core::{ContentExtractor, DocumentFormat, ExtractError};
use std::path::Path;
use tracing::debug;

use crate::run_blocking;

/// Extractor for PDF files.
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Pdf]
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        debug!("Extracting PDF: {:?}", path);

        let bytes = tokio::fs::read(path).await?;

        // pdf-extract is blocking and may panic on malformed input
        let text = run_blocking(move || extract_pdf_text(&bytes)).await?;

        debug!("Extracted {} bytes of PDF text", text.len());
        Ok(text)
    }
}

/// Extract text from PDF bytes using pdf-extract.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractError::Failed(format!("PDF extraction failed: {e}")))
}
