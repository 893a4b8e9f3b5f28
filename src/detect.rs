//! PDF format detection.

use crate::error::{Error, Result};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// How far into the file the header may start. Some producers prepend
/// junk bytes; viewers tolerate a header within the first kilobyte.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Check that the given bytes start a PDF document.
///
/// # Returns
/// * `Ok(())` if a PDF header is found
/// * `Err(Error::UnknownFormat)` otherwise
pub fn check_pdf_header(data: &[u8]) -> Result<()> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    if window
        .windows(PDF_MAGIC.len())
        .any(|w| w == PDF_MAGIC)
    {
        Ok(())
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check if bytes look like a PDF document.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    check_pdf_header(data).is_ok()
}
