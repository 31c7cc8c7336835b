//! # docparse-extract
//!
//! Text extraction capabilities for docparse, and the registry that
//! dispatches to them.
//!
//! Each capability implements [`ContentExtractor`](docparse_core::ContentExtractor):
//! given a local file, produce UTF-8 text or fail. [`ExtractorRegistry`]
//! routes a validated [`DocumentFormat`](docparse_core::DocumentFormat) to its
//! capability and re-wraps every capability failure as
//! [`ParseError::ExtractionFailed`](docparse_core::ParseError::ExtractionFailed).
//!
//! ## Supported Formats
//!
//! | Extractor | Formats | Backend |
//! |-----------|---------|---------|
//! | [`DocxExtractor`] | `.docx` | `zip` + `roxmltree`, body paragraphs |
//! | [`DocExtractor`] | `.doc` | `zip` + `roxmltree`, every paragraph |
//! | [`PdfExtractor`] | `.pdf` | `pdf-extract` |
//! | [`PlainTextExtractor`] | `.txt`, `.text` | lossy UTF-8 |
//! | [`CsvExtractor`] | `.csv` | `csv` |
//! | [`HtmlExtractor`] | `.html`, `.htm` | `scraper` |
//! | [`XmlExtractor`] | `.xml` | `roxmltree` |
//! | [`RtfExtractor`] | `.rtf` | built-in control-word stripper |
//! | [`EpubExtractor`] | `.epub` | `zip` + `roxmltree` + `scraper` |
//! | [`JsonExtractor`] | `.json` | `serde_json` |
//! | [`YamlExtractor`] | `.yaml`, `.yml` | `serde_yaml` |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docparse_core::DocumentFormat;
//! use docparse_extract::ExtractorRegistry;
//! use std::path::Path;
//!
//! let registry = ExtractorRegistry::with_defaults();
//! let text = registry.extract(Path::new("/tmp/report.pdf"), DocumentFormat::Pdf).await?;
//! ```

pub mod epub;
pub mod html;
pub mod pdf;
pub mod registry;
pub mod rtf;
pub mod structured;
pub mod text;
pub mod word;
pub mod xml;

pub use epub::EpubExtractor;
pub use html::HtmlExtractor;
pub use pdf::PdfExtractor;
pub use registry::ExtractorRegistry;
pub use rtf::RtfExtractor;
pub use structured::{JsonExtractor, YamlExtractor};
pub use text::{CsvExtractor, PlainTextExtractor};
pub use word::{DocExtractor, DocxExtractor};
pub use xml::XmlExtractor;

use docparse_core::ExtractError;

/// Run a CPU-bound parser off the async runtime.
///
/// A panic inside the parser surfaces as [`ExtractError::Failed`].
pub(crate) async fn run_blocking<F>(parse: F) -> Result<String, ExtractError>
where
    F: FnOnce() -> Result<String, ExtractError> + Send + 'static,
{
    tokio::task::spawn_blocking(parse)
        .await
        .map_err(|e| ExtractError::Failed(format!("Task join error: {e}")))?
}
