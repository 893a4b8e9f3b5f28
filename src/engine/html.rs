//! Marked-up (HTML) extraction variant.
//!
//! Emits one complete HTML document per extraction pass: header with the
//! document title and configured charset, a paragraph per text line, and
//! a closing footer. An embedded attachment extracted after the primary
//! document therefore contributes its own self-contained HTML document
//! to the stream.

use crate::config::ExtractionConfig;
use crate::document::PdfDocument;
use crate::error::Result;

use super::{page_text, pages_in_range, TextExtractionEngine};

/// Wraps extracted text in simple HTML markup.
pub struct HtmlEngine;

impl TextExtractionEngine for HtmlEngine {
    fn extract(&self, doc: &PdfDocument, config: &ExtractionConfig) -> Result<Vec<String>> {
        let title = doc.title().unwrap_or_default();
        let mut fragments = vec![format!(
            "<html><head><title>{}</title>\n\
             <meta http-equiv=\"Content-Type\" content=\"text/html; charset={}\">\n\
             </head>\n<body>\n",
            escape(&title),
            config.encoding
        )];

        for page_id in pages_in_range(doc, config) {
            let text = page_text(doc, page_id, config)?;
            let mut page = String::new();
            for line in text.lines() {
                if line.is_empty() {
                    continue;
                }
                page.push_str("<p>");
                page.push_str(&escape(line));
                page.push_str("</p>\n");
            }
            fragments.push(page);
        }

        fragments.push("</body></html>\n".to_string());
        Ok(fragments)
    }
}

/// Escape HTML-significant characters.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b & c > \"d\""), "a &lt; b &amp; c &gt; &quot;d&quot;");
        assert_eq!(escape("plain"), "plain");
    }
}
