//! Encoding-aware output sink.
//!
//! The orchestrator appends every extracted fragment to a single
//! [`OutputSink`]. The sink transcodes from Rust strings to the
//! configured output encoding: UTF-8 and UTF-16 are handled natively,
//! everything else goes through `encoding_rs`. The caller owns the sink
//! and is responsible for closing the underlying writer after the run.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};

enum TextEncoding {
    Utf8,
    Utf16Be { bom: bool },
    Utf16Le { bom: bool },
    Legacy(&'static encoding_rs::Encoding),
}

/// A writable text stream in a fixed output encoding.
pub struct OutputSink<W: Write> {
    inner: W,
    encoding: TextEncoding,
    bom_pending: bool,
}

impl OutputSink<Box<dyn Write>> {
    /// Open a file sink.
    pub fn file<P: AsRef<Path>>(path: P, encoding: &str) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(Box::new(BufWriter::new(file)) as Box<dyn Write>, encoding)
    }

    /// Open a console (stdout) sink.
    pub fn console(encoding: &str) -> Result<Self> {
        Self::new(Box::new(io::stdout()) as Box<dyn Write>, encoding)
    }
}

impl<W: Write> OutputSink<W> {
    /// Wrap a writer, resolving the encoding label.
    ///
    /// Fails with [`Error::Encoding`] for labels no encoder exists for.
    /// This is where an unsupported `-encoding` value surfaces.
    pub fn new(inner: W, encoding: &str) -> Result<Self> {
        let resolved = match encoding.to_ascii_uppercase().as_str() {
            "UTF-8" | "UTF8" => TextEncoding::Utf8,
            "UTF-16" => TextEncoding::Utf16Be { bom: true },
            "UTF-16BE" => TextEncoding::Utf16Be { bom: false },
            "UTF-16LE" => TextEncoding::Utf16Le { bom: false },
            _ => {
                let enc = encoding_rs::Encoding::for_label(encoding.as_bytes())
                    .ok_or_else(|| Error::Encoding(encoding.to_string()))?;
                // encoding_rs can decode UTF-16 but not encode it; the
                // native arms above cover those labels
                if enc == encoding_rs::UTF_16BE || enc == encoding_rs::UTF_16LE {
                    return Err(Error::Encoding(encoding.to_string()));
                }
                TextEncoding::Legacy(enc)
            }
        };
        let bom_pending = matches!(
            resolved,
            TextEncoding::Utf16Be { bom: true } | TextEncoding::Utf16Le { bom: true }
        );
        Ok(Self {
            inner,
            encoding: resolved,
            bom_pending,
        })
    }

    /// Append a string fragment, transcoded to the output encoding.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        match &self.encoding {
            TextEncoding::Utf8 => self.inner.write_all(s.as_bytes())?,
            TextEncoding::Utf16Be { .. } => {
                let mut buf = Vec::with_capacity(s.len() * 2 + 2);
                if self.bom_pending {
                    buf.extend_from_slice(&[0xFE, 0xFF]);
                    self.bom_pending = false;
                }
                for unit in s.encode_utf16() {
                    buf.extend_from_slice(&unit.to_be_bytes());
                }
                self.inner.write_all(&buf)?;
            }
            TextEncoding::Utf16Le { .. } => {
                let mut buf = Vec::with_capacity(s.len() * 2 + 2);
                if self.bom_pending {
                    buf.extend_from_slice(&[0xFF, 0xFE]);
                    self.bom_pending = false;
                }
                for unit in s.encode_utf16() {
                    buf.extend_from_slice(&unit.to_le_bytes());
                }
                self.inner.write_all(&buf)?;
            }
            TextEncoding::Legacy(enc) => {
                let (bytes, _, _) = enc.encode(s);
                self.inner.write_all(&bytes)?;
            }
        }
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Consume the sink, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_passthrough() {
        let mut sink = OutputSink::new(Vec::new(), "UTF-8").unwrap();
        sink.write_str("héllo").unwrap();
        assert_eq!(sink.into_inner(), "héllo".as_bytes());
    }

    #[test]
    fn test_utf16be() {
        let mut sink = OutputSink::new(Vec::new(), "UTF-16BE").unwrap();
        sink.write_str("Hi").unwrap();
        assert_eq!(sink.into_inner(), vec![0x00, 0x48, 0x00, 0x69]);
    }

    #[test]
    fn test_utf16_writes_bom_once() {
        let mut sink = OutputSink::new(Vec::new(), "UTF-16").unwrap();
        sink.write_str("A").unwrap();
        sink.write_str("B").unwrap();
        assert_eq!(
            sink.into_inner(),
            vec![0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42]
        );
    }

    #[test]
    fn test_latin1() {
        let mut sink = OutputSink::new(Vec::new(), "ISO-8859-1").unwrap();
        sink.write_str("café").unwrap();
        assert_eq!(sink.into_inner(), vec![b'c', b'a', b'f', 0xE9]);
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        let result = OutputSink::new(Vec::new(), "EBCDIC-37");
        assert!(matches!(result, Err(Error::Encoding(_))));
    }

    #[test]
    fn test_case_insensitive_labels() {
        assert!(OutputSink::new(Vec::new(), "utf-8").is_ok());
        assert!(OutputSink::new(Vec::new(), "iso-8859-1").is_ok());
    }
}
