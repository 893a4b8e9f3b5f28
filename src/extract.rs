//! Extraction orchestration.
//!
//! [`Extractor::run`] drives one end-to-end extraction: permission gate,
//! primary document, then every PDF attachment in the embedded-files
//! tree, all appended to a single sink. The walk is strictly sequential
//! and entries are visited in lexicographic name order, so the output
//! stream layout is deterministic: primary text first, then each
//! qualifying attachment's full output, contiguous, in name order.

use std::io::Write;
use std::time::Instant;

use crate::config::ExtractionConfig;
use crate::document::PdfDocument;
use crate::embedded::EmbeddedFileEntry;
use crate::engine::{engine_for, TextExtractionEngine};
use crate::error::{Error, Result};
use crate::sink::OutputSink;

/// Why an embedded entry contributed no output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The file specification carries no embedded stream.
    NoEmbeddedStream,
    /// The attachment's MIME subtype is not `application/pdf`.
    NotPdf,
}

/// Outcome of processing one embedded entry. Skips are non-fatal by
/// design; anything fatal propagates as an error instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// The attachment was loaded and its text written to the sink.
    Extracted,
    /// The entry was passed over without contributing output.
    Skipped(SkipReason),
}

/// Drives text extraction over a document and its embedded PDFs.
///
/// The engine variant is selected once from the configuration's output
/// mode; the same configuration (page range, sort and bead flags) is
/// reused verbatim for every embedded document.
pub struct Extractor {
    config: ExtractionConfig,
    engine: Box<dyn TextExtractionEngine>,
}

impl Extractor {
    /// Build an extractor for the given configuration.
    pub fn new(config: ExtractionConfig) -> Self {
        let engine = engine_for(config.mode);
        Self { config, engine }
    }

    /// The configuration this extractor runs with.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract the document and its embedded PDFs into the sink.
    ///
    /// Fails with [`Error::PermissionDenied`] before writing anything
    /// when the document forbids content extraction, and with
    /// [`Error::EmbeddedLoad`] when an attachment that claims to be a
    /// PDF cannot be loaded (fail-fast: entries after it are not
    /// processed). Output already written stays in the sink; the caller
    /// owns the sink and the root document on every exit path.
    pub fn run<W: Write>(&self, doc: &PdfDocument, sink: &mut OutputSink<W>) -> Result<()> {
        if !doc.permissions().can_extract_content() {
            return Err(Error::PermissionDenied);
        }

        let started = Instant::now();
        self.write_document(doc, sink)?;
        log::debug!("primary extraction took {:.3?}", started.elapsed());

        let Some(tree) = doc.embedded_files()? else {
            return Ok(());
        };

        for entry in tree.entries() {
            match self.process_entry(entry, sink)? {
                EntryOutcome::Extracted => {
                    log::debug!("extracted embedded file {:?}", entry.name());
                }
                EntryOutcome::Skipped(reason) => {
                    log::debug!("skipped embedded file {:?}: {:?}", entry.name(), reason);
                }
            }
        }

        log::debug!("extraction took {:.3?}", started.elapsed());
        Ok(())
    }

    /// Process one embedded entry.
    ///
    /// The sub-document's lifetime is confined to this call: it is
    /// loaded, extracted from, and dropped before the next sibling is
    /// visited, so no two sub-documents are ever held at once.
    fn process_entry<W: Write>(
        &self,
        entry: &EmbeddedFileEntry<'_>,
        sink: &mut OutputSink<W>,
    ) -> Result<EntryOutcome> {
        if !entry.has_embedded_stream() {
            return Ok(EntryOutcome::Skipped(SkipReason::NoEmbeddedStream));
        }
        if !entry.is_pdf() {
            return Ok(EntryOutcome::Skipped(SkipReason::NotPdf));
        }

        log::debug!(
            "processing embedded file {:?} (size={:?})",
            entry.name(),
            entry.size()
        );

        // Embedded sub-documents are assumed unencrypted; no password
        let sub_doc = entry
            .read_bytes()
            .and_then(|bytes| PdfDocument::from_bytes(&bytes, None))
            .map_err(|e| Error::EmbeddedLoad {
                name: entry.name().to_string(),
                source: Box::new(e),
            })?;

        self.write_document(&sub_doc, sink)?;
        Ok(EntryOutcome::Extracted)
    }

    /// Run the engine over one document and append its fragments.
    fn write_document<W: Write>(
        &self,
        doc: &PdfDocument,
        sink: &mut OutputSink<W>,
    ) -> Result<()> {
        for fragment in self.engine.extract(doc, &self.config)? {
            sink.write_str(&fragment)?;
        }
        Ok(())
    }
}
