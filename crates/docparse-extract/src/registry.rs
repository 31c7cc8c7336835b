//! Extractor registry: routes a validated format to its capability.

use docparse_core::{ContentExtractor, DocumentFormat, ParseError, Result};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::{
    CsvExtractor, DocExtractor, DocxExtractor, EpubExtractor, HtmlExtractor, JsonExtractor,
    PdfExtractor, PlainTextExtractor, RtfExtractor, XmlExtractor, YamlExtractor,
};

/// Registry of extraction capabilities keyed by format.
pub struct ExtractorRegistry {
    extractors: HashMap<DocumentFormat, Arc<dyn ContentExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Registry with one capability for every supported format.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(DocxExtractor::new());
        registry.register(DocExtractor::new());
        registry.register(PdfExtractor::new());
        registry.register(PlainTextExtractor::new());
        registry.register(CsvExtractor::new());
        registry.register(HtmlExtractor::new());
        registry.register(XmlExtractor::new());
        registry.register(RtfExtractor::new());
        registry.register(EpubExtractor::new());
        registry.register(JsonExtractor::new());
        registry.register(YamlExtractor::new());
        registry
    }

    /// Register an extractor for every format it declares.
    ///
    /// A later registration replaces an earlier one for the same format.
    pub fn register<E: ContentExtractor + 'static>(&mut self, extractor: E) {
        let extractor: Arc<dyn ContentExtractor> = Arc::new(extractor);
        for format in extractor.formats() {
            self.extractors.insert(*format, Arc::clone(&extractor));
        }
    }

    /// Get the extractor for a format.
    #[must_use]
    pub fn get(&self, format: DocumentFormat) -> Option<Arc<dyn ContentExtractor>> {
        self.extractors.get(&format).cloned()
    }

    /// Number of formats with a registered extractor.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// Whether no extractor is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Extract text from a local file of an already validated format.
    ///
    /// Checks, in order: the file exists, it is non-empty, a capability is
    /// registered. Capability failures come back as
    /// [`ParseError::ExtractionFailed`] carrying the format label.
    pub async fn extract(&self, path: &Path, format: DocumentFormat) -> Result<String> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(ParseError::ResourceMissing),
            Err(e) => return Err(ParseError::Resource(e)),
        };

        if metadata.len() == 0 {
            return Err(ParseError::EmptyInput);
        }

        let extractor = self
            .get(format)
            .ok_or_else(|| ParseError::UnsupportedFormat {
                extension: format.extension().to_string(),
            })?;

        debug!(
            "Extracting {:?} ({} bytes) with {}",
            path,
            metadata.len(),
            extractor.name()
        );

        extractor
            .extract(path)
            .await
            .map_err(|e| ParseError::ExtractionFailed {
                label: format.label(),
                detail: e.to_string(),
            })
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
