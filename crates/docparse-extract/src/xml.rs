//! XML content extractor.
//!
//! Concatenates the root element's text depth-first: an element's own text,
//! then each child's text followed by the text trailing that child. Adjacent
//! text nodes are not separated, so `<a>x<b>y</b>z</a>` yields `xyz`.
//! Blank lines are then dropped and the rest trimmed.
//!
//! Input is decoded according to its byte-order mark or the `encoding`
//! named in the XML declaration, UTF-8 otherwise.

use async_trait::async_trait;
use docparse_core::{ContentExtractor, DocumentFormat, ExtractError};
use encoding_rs::{Encoding, UTF_8};
use roxmltree::{Document, Node, ParsingOptions};
use std::path::Path;

use crate::run_blocking;

/// Extractor for XML documents.
pub struct XmlExtractor;

impl XmlExtractor {
    /// Create a new XML extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for XmlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for XmlExtractor {
    fn name(&self) -> &'static str {
        "xml"
    }

    fn formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Xml]
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = tokio::fs::read(path).await?;
        run_blocking(move || xml_to_text(&decode_xml(&bytes)?)).await
    }
}

/// Decode raw XML to text and drop the XML declaration.
fn decode_xml(bytes: &[u8]) -> Result<String, ExtractError> {
    let encoding = match Encoding::for_bom(bytes) {
        Some((encoding, _)) => encoding,
        None => match declared_encoding(bytes) {
            // A declaration readable as ASCII cannot be UTF-16
            Some(label) => Encoding::for_label(label.as_bytes())
                .map(Encoding::output_encoding)
                .ok_or_else(|| ExtractError::Parse(format!("unsupported XML encoding: {label}")))?,
            None => UTF_8,
        },
    };

    let (text, encoding, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(ExtractError::Parse(format!(
            "invalid {} byte sequence",
            encoding.name()
        )));
    }

    Ok(strip_declaration(&text).to_string())
}

/// Value of the `encoding` pseudo-attribute of an ASCII-compatible declaration.
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let head = bytes.strip_prefix(b"<?xml")?;
    let end = head.windows(2).position(|w| w == b"?>")?;
    let declaration = std::str::from_utf8(&head[..end]).ok()?;

    let rest = &declaration[declaration.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    Some(value[..value.find(quote)?].to_string())
}

fn strip_declaration(text: &str) -> &str {
    match text.strip_prefix("<?xml") {
        Some(rest) if rest.starts_with(char::is_whitespace) => {
            rest.find("?>").map_or(text, |end| &rest[end + 2..])
        }
        _ => text,
    }
}

fn xml_to_text(source: &str) -> Result<String, ExtractError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(source, options)
        .map_err(|e| ExtractError::Parse(format!("invalid XML format: {e}")))?;

    let mut raw = String::new();
    element_text(document.root_element(), &mut raw);

    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}

fn element_text(node: Node<'_, '_>, out: &mut String) {
    for child in node.children() {
        if child.is_text() {
            out.push_str(child.text().unwrap_or_default());
        } else if child.is_element() {
            element_text(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_adjacent_text_is_concatenated() {
        assert_eq!(xml_to_text("<a>x<b>y</b>z</a>").unwrap(), "xyz");
    }

    #[test]
    fn test_siblings_without_whitespace_run_together() {
        let text = xml_to_text("<root><name>Ada</name><name>Grace</name></root>").unwrap();
        assert_eq!(text, "AdaGrace");
    }

    #[test]
    fn test_lines_are_trimmed_and_blank_lines_dropped() {
        let source = "<?xml version=\"1.0\"?>\n<catalog>\n  <book>\n    <title>Dune</title>\n  </book>\n\n  <book>\n    <title>Emma</title>\n  </book>\n</catalog>";
        assert_eq!(xml_to_text(source).unwrap(), "Dune\nEmma");
    }

    #[test]
    fn test_comments_are_ignored_and_entities_resolved() {
        let text = xml_to_text("<a><!-- hidden -->Tom &amp; Jerry<![CDATA[ <raw>]]></a>").unwrap();
        assert_eq!(text, "Tom & Jerry <raw>");
    }

    #[test]
    fn test_doctype_is_accepted() {
        let text = xml_to_text("<!DOCTYPE note SYSTEM \"note.dtd\"><note>hi</note>").unwrap();
        assert_eq!(text, "hi");
    }

    #[test]
    fn test_invalid_xml_fails() {
        let err = xml_to_text("<a><b></a>").unwrap_err();
        assert!(err.to_string().contains("invalid XML format"));
    }

    #[test]
    fn test_declared_encoding() {
        assert_eq!(
            declared_encoding(b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><a/>").as_deref(),
            Some("ISO-8859-1")
        );
        assert_eq!(
            declared_encoding(b"<?xml version='1.0' encoding = 'utf-8' ?><a/>").as_deref(),
            Some("utf-8")
        );
        assert_eq!(declared_encoding(b"<?xml version=\"1.0\"?><a/>"), None);
        assert_eq!(declared_encoding(b"<a/>"), None);
    }

    #[test]
    fn test_latin1_declaration_is_honored() {
        let bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><a>caf\xE9</a>";
        let text = xml_to_text(&decode_xml(bytes).unwrap()).unwrap();
        assert_eq!(text, "caf\u{e9}");
    }

    #[test]
    fn test_utf16_bom_is_honored() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "<a>h\u{e9}</a>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let text = xml_to_text(&decode_xml(&bytes).unwrap()).unwrap();
        assert_eq!(text, "h\u{e9}");
    }

    #[test]
    fn test_undeclared_non_utf8_fails() {
        let err = decode_xml(b"<a>caf\xE9</a>").unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_unknown_encoding_fails() {
        let err = decode_xml(b"<?xml version=\"1.0\" encoding=\"x-nope\"?><a/>").unwrap_err();
        assert!(err.to_string().contains("unsupported XML encoding"));
    }

    #[test]
    fn test_stylesheet_instruction_is_not_a_declaration() {
        let text = "<?xml-stylesheet href=\"s.xsl\"?><a>x</a>";
        assert_eq!(strip_declaration(text), text);
    }

    #[tokio::test]
    async fn test_extract_latin1_file() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("latin.xml");
        std::fs::write(
            &file_path,
            b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<menu><item>cr\xE8me br\xFBl\xE9e</item></menu>",
        )
        .unwrap();

        let content = XmlExtractor::new().extract(&file_path).await.unwrap();
        assert_eq!(content, "cr\u{e8}me br\u{fb}l\u{e9}e");
    }

    #[tokio::test]
    async fn test_extract_file() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("data.xml");
        std::fs::write(&file_path, "<doc><p>Hello</p>\n<p>World</p></doc>").unwrap();

        let content = XmlExtractor::new().extract(&file_path).await.unwrap();
        assert_eq!(content, "Hello\nWorld");
    }
}
