//! Structured-data extractors.
//!
//! JSON and YAML documents are parsed and re-serialized in a readable form,
//! so the output reflects the structure rather than the original bytes.

use async_trait::async_trait;
use docparse_core::{ContentExtractor, DocumentFormat, ExtractError};
use std::path::Path;

use crate::run_blocking;

/// Extractor for JSON documents.
///
/// Output is pretty-printed with two-space indentation; key order, number
/// literals and non-ASCII characters are kept as written.
pub struct JsonExtractor;

impl JsonExtractor {
    /// Create a new JSON extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for JsonExtractor {
    fn name(&self) -> &'static str {
        "json"
    }

    fn formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Json]
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = tokio::fs::read(path).await?;
        run_blocking(move || {
            let value: serde_json::Value = serde_json::from_slice(&bytes)
                .map_err(|e| ExtractError::Parse(format!("invalid JSON format: {e}")))?;
            serde_json::to_string_pretty(&value).map_err(|e| ExtractError::Failed(e.to_string()))
        })
        .await
    }
}

/// Extractor for YAML documents.
///
/// Output is block-style YAML.
pub struct YamlExtractor;

impl YamlExtractor {
    /// Create a new YAML extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for YamlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for YamlExtractor {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Yaml, DocumentFormat::Yml]
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = tokio::fs::read(path).await?;
        run_blocking(move || {
            let value: serde_yaml::Value = serde_yaml::from_slice(&bytes)
                .map_err(|e| ExtractError::Parse(format!("invalid YAML format: {e}")))?;
            serde_yaml::to_string(&value).map_err(|e| ExtractError::Failed(e.to_string()))
        })
        .await
    }
}
