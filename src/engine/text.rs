//! Plain text extraction variant.

use crate::config::ExtractionConfig;
use crate::document::PdfDocument;
use crate::error::Result;

use super::{page_text, pages_in_range, TextExtractionEngine};

/// Extracts the page range as raw linearized text, one fragment per
/// page.
pub struct PlainTextEngine;

impl TextExtractionEngine for PlainTextEngine {
    fn extract(&self, doc: &PdfDocument, config: &ExtractionConfig) -> Result<Vec<String>> {
        let mut fragments = Vec::new();
        for page_id in pages_in_range(doc, config) {
            fragments.push(page_text(doc, page_id, config)?);
        }
        Ok(fragments)
    }
}
