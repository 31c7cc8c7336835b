//! Word document extractors.
//!
//! Both read the WordprocessingML part (`word/document.xml`) out of the zip
//! container. [`DocxExtractor`] returns the body's top-level paragraphs;
//! [`DocExtractor`] returns every paragraph in the part, tables included.
//! Legacy binary `.doc` files are not zip containers and fail to open.

use async_trait::async_trait;
use docparse_core::{ContentExtractor, DocumentFormat, ExtractError};
use roxmltree::{Document, Node};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

use crate::run_blocking;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DOCUMENT_PART: &str = "word/document.xml";

/// Which paragraphs of the document part to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParagraphScope {
    /// Direct children of `w:body`, joined by one newline
    Body,
    /// Every `w:p` in the part, joined by a blank line
    All,
}

/// Extractor for `.docx` files.
pub struct DocxExtractor;

impl DocxExtractor {
    /// Create a new DOCX extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for DocxExtractor {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Docx]
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = tokio::fs::read(path).await?;
        run_blocking(move || word_text(&bytes, ParagraphScope::Body)).await
    }
}

/// Extractor for legacy `.doc` names.
pub struct DocExtractor;

impl DocExtractor {
    /// Create a new DOC extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for DocExtractor {
    fn name(&self) -> &'static str {
        "doc"
    }

    fn formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Doc]
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = tokio::fs::read(path).await?;
        run_blocking(move || word_text(&bytes, ParagraphScope::All)).await
    }
}

fn word_text(bytes: &[u8], scope: ParagraphScope) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Parse(format!("not a Word zip container: {e}")))?;

    let body = part_paragraphs(&mut archive, DOCUMENT_PART, scope)?;

    let paragraphs = match scope {
        ParagraphScope::Body => body,
        ParagraphScope::All => {
            // Header parts, then the body, then footer parts
            let names: Vec<String> = archive.file_names().map(str::to_string).collect();
            let mut paragraphs = Vec::new();
            for name in names.iter().filter(|n| is_numbered_part(n, "word/header")) {
                paragraphs.extend(part_paragraphs(&mut archive, name, scope)?);
            }
            paragraphs.extend(body);
            for name in names.iter().filter(|n| is_numbered_part(n, "word/footer")) {
                paragraphs.extend(part_paragraphs(&mut archive, name, scope)?);
            }
            paragraphs
        }
    };

    debug!("Read {} paragraph(s)", paragraphs.len());

    let separator = match scope {
        ParagraphScope::Body => "\n",
        ParagraphScope::All => "\n\n",
    };
    Ok(paragraphs.join(separator))
}

/// Paragraph texts of one WordprocessingML part.
fn part_paragraphs<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
    scope: ParagraphScope,
) -> Result<Vec<String>, ExtractError> {
    let mut xml = String::new();
    archive
        .by_name(name)
        .map_err(|e| ExtractError::Parse(format!("missing {name}: {e}")))?
        .read_to_string(&mut xml)?;

    let document = Document::parse(&xml)
        .map_err(|e| ExtractError::Parse(format!("invalid {name}: {e}")))?;

    let paragraphs = match scope {
        ParagraphScope::Body => document
            .descendants()
            .find(|n| n.has_tag_name((WORD_NS, "body")))
            .map(|body| {
                body.children()
                    .filter(|n| n.has_tag_name((WORD_NS, "p")))
                    .map(paragraph_text)
                    .collect()
            })
            .unwrap_or_default(),
        ParagraphScope::All => document
            .descendants()
            .filter(|n| n.has_tag_name((WORD_NS, "p")))
            .map(paragraph_text)
            .collect(),
    };

    Ok(paragraphs)
}

/// Whether `name` is `<prefix><digits>.xml`, as in `word/header2.xml`.
fn is_numbered_part(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(".xml"))
        .is_some_and(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Text of one `w:p`: runs, tabs and breaks in document order.
fn paragraph_text(paragraph: Node<'_, '_>) -> String {
    let mut text = String::new();
    for node in paragraph.descendants() {
        if node.tag_name().namespace() != Some(WORD_NS) {
            continue;
        }
        match node.tag_name().name() {
            "t" => text.push_str(node.text().unwrap_or_default()),
            "tab" => text.push('\t'),
            "br" | "cr" => text.push('\n'),
            _ => {}
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;

    fn docx_bytes(body: &str) -> Vec<u8> {
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"{WORD_NS}\"><w:body>{body}</w:body></w:document>"
        );
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file(DOCUMENT_PART, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    const BODY: &str = "<w:p><w:r><w:t>Hello</w:t></w:r><w:r><w:t xml:space=\"preserve\"> world</w:t></w:r></w:p>\
         <w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
         <w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>";

    #[test]
    fn test_body_scope_skips_tables() {
        let text = word_text(&docx_bytes(BODY), ParagraphScope::Body).unwrap();
        assert_eq!(text, "Hello world\na\tb\nc");
    }

    #[test]
    fn test_all_scope_includes_tables() {
        let text = word_text(&docx_bytes(BODY), ParagraphScope::All).unwrap();
        assert_eq!(text, "Hello world\n\ncell\n\na\tb\nc");
    }

    fn docx_with_parts(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            for (name, xml) in parts {
                writer
                    .start_file(*name, SimpleFileOptions::default())
                    .unwrap();
                writer.write_all(xml.as_bytes()).unwrap();
            }
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_all_scope_wraps_body_in_headers_and_footers() {
        let header = format!("<w:hdr xmlns:w=\"{WORD_NS}\"><w:p><w:r><w:t>Confidential</w:t></w:r></w:p></w:hdr>");
        let footer = format!("<w:ftr xmlns:w=\"{WORD_NS}\"><w:p><w:r><w:t>Page</w:t></w:r></w:p></w:ftr>");
        let document = format!(
            "<w:document xmlns:w=\"{WORD_NS}\"><w:body><w:p><w:r><w:t>Body</w:t></w:r></w:p></w:body></w:document>"
        );
        let bytes = docx_with_parts(&[
            ("word/footer1.xml", footer.as_str()),
            (DOCUMENT_PART, document.as_str()),
            ("word/header1.xml", header.as_str()),
            ("word/headers.xml", "<not-a-part/>"),
        ]);

        let text = word_text(&bytes, ParagraphScope::All).unwrap();
        assert_eq!(text, "Confidential\n\nBody\n\nPage");

        let text = word_text(&bytes, ParagraphScope::Body).unwrap();
        assert_eq!(text, "Body");
    }

    #[test]
    fn test_is_numbered_part() {
        assert!(is_numbered_part("word/header1.xml", "word/header"));
        assert!(is_numbered_part("word/header.xml", "word/header"));
        assert!(!is_numbered_part("word/headers.xml", "word/header"));
        assert!(!is_numbered_part("word/footer1.xml.rels", "word/footer"));
    }

    #[test]
    fn test_not_a_zip_fails() {
        let err = word_text(b"\xD0\xCF\x11\xE0 legacy ole", ParagraphScope::All).unwrap_err();
        assert!(err.to_string().contains("not a Word zip container"));
    }

    #[test]
    fn test_zip_without_document_part_fails() {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("other.txt", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"x").unwrap();
            writer.finish().unwrap();
        }
        let err = word_text(&cursor.into_inner(), ParagraphScope::Body).unwrap_err();
        assert!(err.to_string().contains(DOCUMENT_PART));
    }

    #[tokio::test]
    async fn test_docx_extract_file() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("letter.docx");
        std::fs::write(&file_path, docx_bytes(BODY)).unwrap();

        let content = DocxExtractor::new().extract(&file_path).await.unwrap();
        assert!(content.starts_with("Hello world"));
    }

    #[test]
    fn test_formats_are_split() {
        assert!(DocxExtractor::new().can_extract(DocumentFormat::Docx));
        assert!(!DocxExtractor::new().can_extract(DocumentFormat::Doc));
        assert!(DocExtractor::new().can_extract(DocumentFormat::Doc));
    }
}
