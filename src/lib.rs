//! # pdftext
//!
//! Extract plain text or lightly marked-up HTML from a PDF document and
//! from every PDF attached inside it.
//!
//! The extraction walks the primary document's page range first, then
//! the document's embedded-files tree in lexicographic name order,
//! recursing into each attachment whose MIME subtype is
//! `application/pdf`. Everything is appended to one output sink in that
//! fixed order.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdftext::{extract_file, ExtractionConfig};
//!
//! fn main() -> pdftext::Result<()> {
//!     let config = ExtractionConfig::new().with_sort_by_position(true);
//!     let text = extract_file("document.pdf", &config)?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Embedded PDFs**: attachments that are themselves PDFs are
//!   extracted after the primary document, in a deterministic order
//! - **Page ranges**: 1-based inclusive bounds; an inverted range is
//!   empty, not an error
//! - **Position sorting** and **bead separation** flags, honored for
//!   the primary document and every attachment alike
//! - **Output encodings**: UTF-8, UTF-16, and every legacy encoding
//!   `encoding_rs` can encode
//! - **Permission gate**: documents whose rights metadata forbids
//!   content extraction produce no output

pub mod config;
pub mod detect;
pub mod document;
pub mod embedded;
pub mod engine;
pub mod error;
pub mod extract;
pub mod sink;

// Re-export commonly used types
pub use config::{ExtractionConfig, OutputMode};
pub use detect::is_pdf_bytes;
pub use document::{AccessPermission, PdfDocument};
pub use embedded::{EmbeddedFileEntry, EmbeddedFileTree, PDF_MIME_SUBTYPE};
pub use engine::{HtmlEngine, PlainTextEngine, TextExtractionEngine};
pub use error::{Error, Result};
pub use extract::{EntryOutcome, Extractor, SkipReason};
pub use sink::OutputSink;

use std::path::Path;

/// Extract a PDF file to a string.
///
/// Convenience wrapper that loads the document with the configured
/// password, runs the extractor, and collects the output. The returned
/// string is always UTF-8; the configuration's encoding label only
/// applies when writing to an [`OutputSink`] you open yourself.
pub fn extract_file<P: AsRef<Path>>(path: P, config: &ExtractionConfig) -> Result<String> {
    let doc = PdfDocument::load(path, config.password.as_deref())?;
    extract_to_string(&doc, config)
}

/// Extract an in-memory PDF to a string.
pub fn extract_bytes(data: &[u8], config: &ExtractionConfig) -> Result<String> {
    let doc = PdfDocument::from_bytes(data, config.password.as_deref())?;
    extract_to_string(&doc, config)
}

/// Run the extractor over an already-loaded document, collecting the
/// output into a string.
pub fn extract_to_string(doc: &PdfDocument, config: &ExtractionConfig) -> Result<String> {
    let mut sink = OutputSink::new(Vec::new(), "UTF-8")?;
    let extractor = Extractor::new(config.clone());
    extractor.run(doc, &mut sink)?;
    String::from_utf8(sink.into_inner()).map_err(|e| Error::TextExtract(e.to_string()))
}
