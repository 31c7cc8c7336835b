//! Core types for docparse.
//!
//! - [`DocumentFormat`]: one variant per supported extension
//! - [`SourceDescriptor`]: where a document's bytes come from
//! - [`ParsedDocument`]: successful pipeline output

use serde::Serialize;
use std::fmt;
use tokio::io::AsyncRead;

// ============================================================================
// Formats
// ============================================================================

/// A supported document format, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Docx,
    Doc,
    Pdf,
    Txt,
    Text,
    Csv,
    Html,
    Htm,
    Xml,
    Rtf,
    Epub,
    Json,
    Yaml,
    Yml,
}

impl DocumentFormat {
    /// Lowercase, dot-prefixed extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Docx => ".docx",
            Self::Doc => ".doc",
            Self::Pdf => ".pdf",
            Self::Txt => ".txt",
            Self::Text => ".text",
            Self::Csv => ".csv",
            Self::Html => ".html",
            Self::Htm => ".htm",
            Self::Xml => ".xml",
            Self::Rtf => ".rtf",
            Self::Epub => ".epub",
            Self::Json => ".json",
            Self::Yaml => ".yaml",
            Self::Yml => ".yml",
        }
    }

    /// Human-readable label, used in failure messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Docx => "Microsoft Word Document",
            Self::Doc => "Microsoft Word Document (Legacy)",
            Self::Pdf => "Portable Document Format",
            Self::Txt | Self::Text => "Plain Text",
            Self::Csv => "Comma Separated Values",
            Self::Html | Self::Htm => "HyperText Markup Language",
            Self::Xml => "Extensible Markup Language",
            Self::Rtf => "Rich Text Format",
            Self::Epub => "Electronic Publication",
            Self::Json => "JavaScript Object Notation",
            Self::Yaml | Self::Yml => "YAML Ain't Markup Language",
        }
    }

    /// Look up a format by its exact lowercase, dot-prefixed extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let format = match ext {
            ".docx" => Self::Docx,
            ".doc" => Self::Doc,
            ".pdf" => Self::Pdf,
            ".txt" => Self::Txt,
            ".text" => Self::Text,
            ".csv" => Self::Csv,
            ".html" => Self::Html,
            ".htm" => Self::Htm,
            ".xml" => Self::Xml,
            ".rtf" => Self::Rtf,
            ".epub" => Self::Epub,
            ".json" => Self::Json,
            ".yaml" => Self::Yaml,
            ".yml" => Self::Yml,
            _ => return None,
        };
        Some(format)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// ============================================================================
// Sources
// ============================================================================

/// Byte source for an upload.
pub type UploadReader = Box<dyn AsyncRead + Send + Unpin>;

/// Where a document comes from.
pub enum SourceDescriptor {
    /// Fetch from a remote location
    Remote { url: String },
    /// Drain an already-open byte stream
    Upload {
        filename: Option<String>,
        reader: UploadReader,
    },
}

impl SourceDescriptor {
    /// Remote source.
    pub fn remote(url: impl Into<String>) -> Self {
        Self::Remote { url: url.into() }
    }

    /// Upload source from any async reader.
    pub fn upload<R>(filename: impl Into<String>, reader: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self::Upload {
            filename: Some(filename.into()),
            reader: Box::new(reader),
        }
    }
}

impl fmt::Debug for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote { url } => f.debug_struct("Remote").field("url", url).finish(),
            Self::Upload { filename, .. } => f
                .debug_struct("Upload")
                .field("filename", filename)
                .finish_non_exhaustive(),
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// Text extracted from a document.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedDocument {
    /// Decoded file name the format was derived from
    pub filename: String,
    /// Validated format
    pub format: DocumentFormat,
    /// Full extracted text, never empty or whitespace-only
    pub content: String,
}

impl ParsedDocument {
    /// Length of the content in characters.
    #[must_use]
    pub fn content_length(&self) -> usize {
        self.content.chars().count()
    }

    /// First `max_chars` characters of the content.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.content.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.content[..idx],
            None => &self.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension_round_trips() {
        for ext in [".docx", ".pdf", ".htm", ".yml"] {
            let format = DocumentFormat::from_extension(ext).unwrap();
            assert_eq!(format.extension(), ext);
        }
    }

    #[test]
    fn test_from_extension_is_exact() {
        assert!(DocumentFormat::from_extension(".PDF").is_none());
        assert!(DocumentFormat::from_extension("pdf").is_none());
        assert!(DocumentFormat::from_extension(".md").is_none());
    }

    #[test]
    fn test_shared_labels() {
        assert_eq!(DocumentFormat::Txt.label(), DocumentFormat::Text.label());
        assert_eq!(DocumentFormat::Html.label(), DocumentFormat::Htm.label());
        assert_eq!(DocumentFormat::Yaml.label(), DocumentFormat::Yml.label());
    }

    #[test]
    fn test_display_is_extension() {
        assert_eq!(DocumentFormat::Epub.to_string(), ".epub");
    }

    #[test]
    fn test_preview_is_char_bounded() {
        let doc = ParsedDocument {
            filename: "a.txt".to_string(),
            format: DocumentFormat::Txt,
            content: "héllo wörld".to_string(),
        };
        assert_eq!(doc.preview(5), "héllo");
        assert_eq!(doc.preview(100), "héllo wörld");
        assert_eq!(doc.content_length(), 11);
    }

    #[test]
    fn test_source_descriptor_debug_hides_reader() {
        let source = SourceDescriptor::upload("a.txt", std::io::Cursor::new(vec![1u8, 2, 3]));
        let debug = format!("{source:?}");
        assert!(debug.contains("a.txt"));
        assert!(debug.starts_with("Upload"));
    }
}
