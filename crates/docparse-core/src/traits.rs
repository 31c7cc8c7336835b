//! Core traits for docparse.
//!
//! [`ContentExtractor`] is the extraction capability: given a local file,
//! produce text or fail. Each implementation declares the formats it handles
//! and the dispatch registry routes on those.

use async_trait::async_trait;
use std::path::Path;

use crate::error::ExtractError;
use crate::types::DocumentFormat;

/// Trait for extracting text from a local file.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Short name of this capability, for logging.
    fn name(&self) -> &'static str;

    /// Formats this extractor handles.
    fn formats(&self) -> &[DocumentFormat];

    /// Check if this extractor handles the given format.
    fn can_extract(&self, format: DocumentFormat) -> bool {
        self.formats().contains(&format)
    }

    /// Extract text from a file.
    async fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}
