//! EPUB content extractor.
//!
//! Locates the package document through `META-INF/container.xml`, walks the
//! manifest in declaration order and reduces every XHTML item to text.

use async_trait::async_trait;
use docparse_core::{ContentExtractor, DocumentFormat, ExtractError};
use roxmltree::Document;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

use crate::html::html_to_text;
use crate::run_blocking;

const CONTAINER_PATH: &str = "META-INF/container.xml";
const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";

/// Extractor for EPUB e-books.
pub struct EpubExtractor;

impl EpubExtractor {
    /// Create a new EPUB extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for EpubExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for EpubExtractor {
    fn name(&self) -> &'static str {
        "epub"
    }

    fn formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Epub]
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = tokio::fs::read(path).await?;
        run_blocking(move || epub_text(&bytes)).await
    }
}

fn epub_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Parse(format!("not an EPUB container: {e}")))?;

    let container = read_entry(&mut archive, CONTAINER_PATH)?;
    let opf_path = rootfile_path(&container)?;
    let opf = read_entry(&mut archive, &opf_path)?;
    let documents = manifest_documents(&opf, &opf_path)?;

    debug!("EPUB manifest lists {} XHTML document(s)", documents.len());

    let mut sections = Vec::new();
    for href in documents {
        let source = read_entry(&mut archive, &href)?;
        let text = html_to_text(&source);
        let text = text.trim();
        if !text.is_empty() {
            sections.push(text.to_string());
        }
    }

    Ok(sections.join("\n\n"))
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, ExtractError> {
    let mut entry = archive
        .by_name(name)
        .map_err(|e| ExtractError::Parse(format!("missing {name}: {e}")))?;
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Path of the package document named by the container.
fn rootfile_path(container: &str) -> Result<String, ExtractError> {
    let document = Document::parse(container)
        .map_err(|e| ExtractError::Parse(format!("invalid {CONTAINER_PATH}: {e}")))?;

    document
        .descendants()
        .find(|n| n.tag_name().name() == "rootfile")
        .and_then(|n| n.attribute("full-path"))
        .map(str::to_string)
        .ok_or_else(|| ExtractError::Parse(format!("{CONTAINER_PATH} names no rootfile")))
}

/// Archive paths of the manifest's XHTML items, in manifest order.
fn manifest_documents(opf: &str, opf_path: &str) -> Result<Vec<String>, ExtractError> {
    let document = Document::parse(opf)
        .map_err(|e| ExtractError::Parse(format!("invalid package document: {e}")))?;

    let base = opf_path.rsplit_once('/').map_or("", |(dir, _)| dir);

    Ok(document
        .descendants()
        .filter(|n| n.tag_name().name() == "item")
        .filter(|n| n.attribute("media-type") == Some(XHTML_MEDIA_TYPE))
        .filter_map(|n| n.attribute("href"))
        .map(|href| resolve_href(base, href))
        .collect())
}

/// Resolve a manifest href against the package document's directory.
///
/// Hrefs are URLs, so each segment is percent-decoded to get the archive
/// entry name.
fn resolve_href(base: &str, href: &str) -> String {
    let href = href.split('#').next().unwrap_or(href);
    let mut parts: Vec<String> = base
        .split('/')
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    for segment in href.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => {
                let bytes = urlencoding::decode_binary(other.as_bytes());
                parts.push(String::from_utf8_lossy(&bytes).into_owned());
            }
        }
    }
    parts.join("/")
}
