//! Text extraction engines.
//!
//! [`TextExtractionEngine`] is the seam between the orchestrator and the
//! glyph-to-text algorithm. Two variants exist: plain text and lightly
//! marked-up HTML. Both honor the configured page range, position
//! sorting, and bead separation; the orchestrator is oblivious to which
//! variant it holds.

pub mod beads;
pub mod html;
pub mod spans;
pub mod text;

use lopdf::ObjectId;

use crate::config::{ExtractionConfig, OutputMode};
use crate::document::PdfDocument;
use crate::error::Result;

pub use html::HtmlEngine;
pub use text::PlainTextEngine;

/// Produces text fragments for the pages of a document.
///
/// The returned fragments, written to the sink in order, form the
/// document's complete output for one extraction pass.
pub trait TextExtractionEngine {
    /// Extract the configured page range as an ordered fragment list.
    fn extract(&self, doc: &PdfDocument, config: &ExtractionConfig) -> Result<Vec<String>>;
}

/// Select the engine variant for an output mode.
pub fn engine_for(mode: OutputMode) -> Box<dyn TextExtractionEngine> {
    match mode {
        OutputMode::Text => Box::new(PlainTextEngine),
        OutputMode::Html => Box::new(HtmlEngine),
    }
}

/// Page ids inside the configured range, in page-number order. An
/// inverted range yields no pages.
fn pages_in_range(doc: &PdfDocument, config: &ExtractionConfig) -> Vec<ObjectId> {
    doc.raw_doc()
        .get_pages()
        .into_iter()
        .filter(|(num, _)| config.includes_page(*num))
        .map(|(_, id)| id)
        .collect()
}

/// Linearized text for one page, with bead partitioning applied when
/// configured and the page carries beads.
fn page_text(doc: &PdfDocument, page_id: ObjectId, config: &ExtractionConfig) -> Result<String> {
    let raw = doc.raw_doc();
    let page_spans = spans::extract_page_spans(raw, page_id)?;

    if config.separate_beads {
        let rects = beads::page_bead_rects(raw, page_id);
        if !rects.is_empty() {
            let (groups, rest) = beads::partition_by_beads(page_spans, &rects);
            let mut out = String::new();
            for group in groups {
                out.push_str(&spans::assemble_text(group, config.sort_by_position));
            }
            out.push_str(&spans::assemble_text(rest, config.sort_by_position));
            return Ok(out);
        }
    }

    Ok(spans::assemble_text(page_spans, config.sort_by_position))
}
