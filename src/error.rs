//! Error types for the pdftext library.

use std::io;
use thiserror::Error;

/// Result type alias for pdftext operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during text extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the document or writing the output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// A page bound given as text is not a valid integer.
    #[error("Invalid page bound: {0:?} is not a number")]
    InvalidPageBound(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and requires a password.
    #[error("Document is encrypted")]
    Encrypted,

    /// The provided password is incorrect.
    #[error("Invalid password")]
    InvalidPassword,

    /// The document's rights metadata forbids content extraction.
    #[error("You do not have permission to extract text")]
    PermissionDenied,

    /// An embedded attachment claims to be a PDF but fails to load.
    #[error("Embedded file {name:?} could not be loaded as a PDF: {source}")]
    EmbeddedLoad {
        /// Entry name in the document's embedded-files tree.
        name: String,
        /// The underlying load failure.
        #[source]
        source: Box<Error>,
    },

    /// The requested output encoding is not supported.
    #[error("Unsupported output encoding: {0}")]
    Encoding(String),

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::InvalidPageBound("abc".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid page bound: \"abc\" is not a number"
        );
    }

    #[test]
    fn test_embedded_load_names_entry() {
        let err = Error::EmbeddedLoad {
            name: "attach.pdf".to_string(),
            source: Box::new(Error::UnknownFormat),
        };
        assert!(err.to_string().contains("attach.pdf"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
