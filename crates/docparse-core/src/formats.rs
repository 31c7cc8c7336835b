//! Format registry: the fixed extension table.
//!
//! Classification is by name only. File content and magic bytes are never
//! inspected, so routing does not depend on payload size.

use crate::error::{ParseError, Result};
use crate::types::DocumentFormat;

/// One entry of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedFormat {
    /// Format variant
    pub format: DocumentFormat,
    /// Lowercase, dot-prefixed extension
    pub extension: &'static str,
    /// Human-readable label
    pub label: &'static str,
}

const fn entry(
    format: DocumentFormat,
    extension: &'static str,
    label: &'static str,
) -> SupportedFormat {
    SupportedFormat {
        format,
        extension,
        label,
    }
}

/// Every supported extension, in listing order.
pub const SUPPORTED_FORMATS: &[SupportedFormat] = &[
    entry(DocumentFormat::Docx, ".docx", "Microsoft Word Document"),
    entry(DocumentFormat::Doc, ".doc", "Microsoft Word Document (Legacy)"),
    entry(DocumentFormat::Pdf, ".pdf", "Portable Document Format"),
    entry(DocumentFormat::Txt, ".txt", "Plain Text"),
    entry(DocumentFormat::Text, ".text", "Plain Text"),
    entry(DocumentFormat::Csv, ".csv", "Comma Separated Values"),
    entry(DocumentFormat::Html, ".html", "HyperText Markup Language"),
    entry(DocumentFormat::Htm, ".htm", "HyperText Markup Language"),
    entry(DocumentFormat::Xml, ".xml", "Extensible Markup Language"),
    entry(DocumentFormat::Rtf, ".rtf", "Rich Text Format"),
    entry(DocumentFormat::Epub, ".epub", "Electronic Publication"),
    entry(DocumentFormat::Json, ".json", "JavaScript Object Notation"),
    entry(DocumentFormat::Yaml, ".yaml", "YAML Ain't Markup Language"),
    entry(DocumentFormat::Yml, ".yml", "YAML Ain't Markup Language"),
];

/// Comma-separated list of supported extensions.
#[must_use]
pub fn supported_list() -> String {
    SUPPORTED_FORMATS
        .iter()
        .map(|f| f.extension)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Raw suffix of `name`, dot included, case preserved.
///
/// Only the final `/`-separated component is considered, and leading dots
/// (as in `.bashrc`) do not start an extension.
#[must_use]
pub fn split_extension(name: &str) -> Option<&str> {
    let base = name.rsplit('/').next().unwrap_or(name);
    let dot = base.rfind('.')?;
    if base[..dot].bytes().all(|b| b == b'.') {
        return None;
    }
    Some(&base[dot..])
}

/// Read-only view over [`SUPPORTED_FORMATS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatRegistry;

impl FormatRegistry {
    /// Validate a file name and return its format.
    ///
    /// Fails with [`ParseError::UndeterminedFormat`] when the name has no
    /// suffix and [`ParseError::UnsupportedFormat`] when the lowercased
    /// suffix is not in the table.
    pub fn validate(name: &str) -> Result<DocumentFormat> {
        let ext = split_extension(name).ok_or_else(|| ParseError::UndeterminedFormat {
            name: name.to_string(),
        })?;
        let ext = ext.to_ascii_lowercase();
        DocumentFormat::from_extension(&ext).ok_or(ParseError::UnsupportedFormat { extension: ext })
    }

    /// Whether an extension (any case, dot-prefixed) is supported.
    #[must_use]
    pub fn is_supported(extension: &str) -> bool {
        DocumentFormat::from_extension(&extension.to_ascii_lowercase()).is_some()
    }

    /// Label for an extension, if supported.
    #[must_use]
    pub fn label(extension: &str) -> Option<&'static str> {
        DocumentFormat::from_extension(&extension.to_ascii_lowercase()).map(DocumentFormat::label)
    }

    /// All registry entries.
    #[must_use]
    pub fn supported() -> &'static [SupportedFormat] {
        SUPPORTED_FORMATS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_extensions_are_unique_and_lowercase() {
        let mut seen = HashSet::new();
        for f in SUPPORTED_FORMATS {
            assert!(seen.insert(f.extension), "duplicate {}", f.extension);
            assert!(f.extension.starts_with('.'));
            assert_eq!(f.extension, f.extension.to_ascii_lowercase());
        }
        assert_eq!(seen.len(), 14);
    }

    #[test]
    fn test_table_matches_enum() {
        for f in SUPPORTED_FORMATS {
            assert_eq!(f.format.extension(), f.extension);
            assert_eq!(f.format.label(), f.label);
        }
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("report.pdf"), Some(".pdf"));
        assert_eq!(split_extension("archive.tar.gz"), Some(".gz"));
        assert_eq!(split_extension("dir.v2/README"), None);
        assert_eq!(split_extension(".bashrc"), None);
        assert_eq!(split_extension("..hidden"), None);
        assert_eq!(split_extension("trailing."), Some("."));
        assert_eq!(split_extension(""), None);
    }

    #[test]
    fn test_validate_case_insensitive() {
        assert_eq!(
            FormatRegistry::validate("report final.PDF").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            FormatRegistry::validate("Notes.TxT").unwrap(),
            DocumentFormat::Txt
        );
    }

    #[test]
    fn test_validate_every_supported_extension() {
        for f in SUPPORTED_FORMATS {
            let name = format!("file{}", f.extension);
            assert_eq!(FormatRegistry::validate(&name).unwrap(), f.format);
        }
    }

    #[test]
    fn test_validate_no_extension() {
        let err = FormatRegistry::validate("README").unwrap_err();
        assert!(matches!(err, ParseError::UndeterminedFormat { .. }));
    }

    #[test]
    fn test_validate_unsupported() {
        match FormatRegistry::validate("setup.EXE").unwrap_err() {
            ParseError::UnsupportedFormat { extension } => assert_eq!(extension, ".exe"),
            other => panic!("Expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_label_lookup() {
        assert_eq!(FormatRegistry::label(".YML"), Some("YAML Ain't Markup Language"));
        assert_eq!(FormatRegistry::label(".md"), None);
        assert!(FormatRegistry::is_supported(".Htm"));
        assert!(!FormatRegistry::is_supported("htm"));
    }

    #[test]
    fn test_supported_list() {
        let list = supported_list();
        assert!(list.starts_with(".docx, .doc, .pdf"));
        assert!(list.ends_with(".yaml, .yml"));
    }
}
