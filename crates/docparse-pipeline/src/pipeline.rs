//! Parse orchestration.

use docparse_core::{ParseError, ParsedDocument, Result, SourceDescriptor};
use docparse_extract::ExtractorRegistry;
use std::sync::Arc;
use tokio::io::AsyncRead;
use tracing::{debug, info};

use crate::acquire::{drain_upload, AcquireConfig, Acquired, RemoteFetcher};

/// Composes validation, acquisition, extraction and cleanup.
///
/// Holds no per-call state, so one instance can serve any number of
/// concurrent parses.
pub struct DocumentPipeline {
    /// Extractor registry
    extractors: Arc<ExtractorRegistry>,
    /// Remote fetcher
    fetcher: RemoteFetcher,
}

impl DocumentPipeline {
    /// Create a pipeline over an existing registry and fetcher.
    pub fn new(extractors: Arc<ExtractorRegistry>, fetcher: RemoteFetcher) -> Self {
        Self {
            extractors,
            fetcher,
        }
    }

    /// Create a pipeline with every built-in extractor.
    pub fn with_config(config: &AcquireConfig) -> Result<Self> {
        Ok(Self::new(
            Arc::new(ExtractorRegistry::with_defaults()),
            RemoteFetcher::new(config)?,
        ))
    }

    /// Parse a document from a remote location.
    pub async fn parse_remote(&self, url: &str) -> Result<ParsedDocument> {
        let acquired = self.fetcher.fetch(url).await?;
        self.extract(acquired).await
    }

    /// Parse a document from an upload stream.
    pub async fn parse_upload<R>(&self, filename: Option<&str>, reader: R) -> Result<ParsedDocument>
    where
        R: AsyncRead + Unpin,
    {
        let acquired = drain_upload(filename, reader, self.fetcher.temp_dir()).await?;
        self.extract(acquired).await
    }

    /// Parse a document from either kind of source.
    pub async fn parse(&self, source: SourceDescriptor) -> Result<ParsedDocument> {
        match source {
            SourceDescriptor::Remote { url } => self.parse_remote(&url).await,
            SourceDescriptor::Upload { filename, reader } => {
                self.parse_upload(filename.as_deref(), reader).await
            }
        }
    }

    async fn extract(&self, acquired: Acquired) -> Result<ParsedDocument> {
        let Acquired {
            filename,
            format,
            resource,
        } = acquired;

        let outcome = self.extractors.extract(resource.path(), format).await;
        resource.release();
        let content = outcome?;

        if content.trim().is_empty() {
            debug!("{} produced no text", filename);
            return Err(ParseError::EmptyContent);
        }

        info!(
            "Parsed {} as {}: {} characters",
            filename,
            format.label(),
            content.chars().count()
        );

        Ok(ParsedDocument {
            filename,
            format,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docparse_core::DocumentFormat;
    use std::path::Path;
    use tempfile::tempdir;

    fn pipeline_in(dir: &Path) -> DocumentPipeline {
        let config = AcquireConfig {
            temp_dir: Some(dir.to_path_buf()),
            ..AcquireConfig::default()
        };
        DocumentPipeline::with_config(&config).unwrap()
    }

    fn assert_no_artifacts(dir: &Path) {
        assert_eq!(std::fs::read_dir(dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_parse_upload_text() {
        let temp_dir = tempdir().unwrap();
        let pipeline = pipeline_in(temp_dir.path());

        let doc = pipeline
            .parse_upload(Some("notes.txt"), &b"Hello, world"[..])
            .await
            .unwrap();

        assert_eq!(doc.filename, "notes.txt");
        assert_eq!(doc.format, DocumentFormat::Txt);
        assert_eq!(doc.content, "Hello, world");
        assert_no_artifacts(temp_dir.path());
    }

    #[tokio::test]
    async fn test_whitespace_content_is_empty() {
        let temp_dir = tempdir().unwrap();
        let pipeline = pipeline_in(temp_dir.path());

        let err = pipeline
            .parse_upload(Some("blank.txt"), &b"   \n\t  "[..])
            .await
            .unwrap_err();

        assert!(matches!(err, ParseError::EmptyContent));
        assert_no_artifacts(temp_dir.path());
    }

    #[tokio::test]
    async fn test_extraction_failure_releases_resource() {
        let temp_dir = tempdir().unwrap();
        let pipeline = pipeline_in(temp_dir.path());

        let err = pipeline
            .parse_upload(Some("broken.json"), &b"{not json"[..])
            .await
            .unwrap_err();

        match err {
            ParseError::ExtractionFailed { label, .. } => {
                assert_eq!(label, "JavaScript Object Notation");
            }
            other => panic!("Expected ExtractionFailed, got {other:?}"),
        }
        assert_no_artifacts(temp_dir.path());
    }

    #[tokio::test]
    async fn test_parse_dispatches_source() {
        let temp_dir = tempdir().unwrap();
        let pipeline = pipeline_in(temp_dir.path());

        let doc = pipeline
            .parse(SourceDescriptor::upload("data.json", &br#"{"a": 1}"#[..]))
            .await
            .unwrap();
        assert!(doc.content.contains("\"a\": 1"));

        let err = pipeline
            .parse(SourceDescriptor::remote(""))
            .await
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidInput(_)));

        let err = pipeline
            .parse(SourceDescriptor::Upload {
                filename: None,
                reader: Box::new(&b"x"[..]),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_concurrent_parses_share_pipeline() {
        let temp_dir = tempdir().unwrap();
        let pipeline = Arc::new(pipeline_in(temp_dir.path()));

        let mut handles = Vec::new();
        for i in 0..8 {
            let pipeline = Arc::clone(&pipeline);
            handles.push(tokio::spawn(async move {
                let body = format!("document {i}");
                pipeline
                    .parse_upload(Some("doc.txt"), body.as_bytes())
                    .await
                    .map(|doc| doc.content)
            }));
        }

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await.unwrap().unwrap(), format!("document {i}"));
        }
        assert_no_artifacts(temp_dir.path());
    }
}
