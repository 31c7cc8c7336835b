//! HTML content extractor.
//!
//! Uses scraper to parse the document and collects its visible text.

use async_trait::async_trait;
use docparse_core::{ContentExtractor, DocumentFormat, ExtractError};
use scraper::{ElementRef, Html, Node};
use std::path::Path;

use crate::run_blocking;
use crate::text::read_lossy;

/// Elements whose text is never visible.
const SKIPPED: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that start a new line.
const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "title", "tr", "ul",
];

/// Extractor for HTML documents.
pub struct HtmlExtractor;

impl HtmlExtractor {
    /// Create a new HTML extractor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentExtractor for HtmlExtractor {
    fn name(&self) -> &'static str {
        "html"
    }

    fn formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Html, DocumentFormat::Htm]
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let source = read_lossy(path).await?;
        run_blocking(move || Ok(html_to_text(&source))).await
    }
}

/// Visible text of an HTML document, one trimmed line per block.
///
/// HTML parsing is error-tolerant, so this never fails.
pub fn html_to_text(source: &str) -> String {
    let document = Html::parse_document(source);
    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if SKIPPED.contains(&name) {
        return;
    }

    let block = BLOCKS.contains(&name);
    if block {
        out.push('\n');
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text(child, out);
                }
            }
            _ => {}
        }
    }

    if block {
        out.push('\n');
    }
}
