//! Loaded PDF document handle and access permissions.

use std::io::Read;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object};

use crate::detect::check_pdf_header;
use crate::embedded::EmbeddedFileTree;
use crate::error::{Error, Result};

/// Permission bit for content extraction in the encryption dictionary's
/// `/P` mask (bit position 5 in the PDF specification).
const PERM_EXTRACT: i64 = 1 << 4;
/// Permission bit for printing (bit position 3).
const PERM_PRINT: i64 = 1 << 2;
/// Permission bit for modifying the document (bit position 4).
const PERM_MODIFY: i64 = 1 << 3;

/// Access permissions attached to a document.
///
/// Derived from the encryption dictionary's `/P` mask; unencrypted
/// documents grant everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPermission {
    bits: i64,
}

impl AccessPermission {
    /// All operations permitted (the state of an unencrypted document).
    pub fn all() -> Self {
        Self { bits: -1 }
    }

    /// Build from a raw `/P` permission mask.
    pub fn from_permission_bits(bits: i64) -> Self {
        Self { bits }
    }

    /// Whether text and graphics may be extracted from the document.
    pub fn can_extract_content(&self) -> bool {
        self.bits & PERM_EXTRACT != 0
    }

    /// Whether the document may be printed.
    pub fn can_print(&self) -> bool {
        self.bits & PERM_PRINT != 0
    }

    /// Whether the document contents may be modified.
    pub fn can_modify(&self) -> bool {
        self.bits & PERM_MODIFY != 0
    }
}

impl Default for AccessPermission {
    fn default() -> Self {
        Self::all()
    }
}

/// A loaded PDF document ready for text extraction.
///
/// Thin wrapper over `lopdf::Document` that adds access permissions and
/// the embedded-files view. The handle is exclusively owned by its
/// extraction step and dropped when that step finishes.
pub struct PdfDocument {
    doc: LopdfDocument,
    permissions: AccessPermission,
}

impl PdfDocument {
    /// Load a PDF file from disk.
    pub fn load<P: AsRef<Path>>(path: P, password: Option<&str>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data, password)
    }

    /// Load a PDF from an in-memory byte slice.
    pub fn from_bytes(data: &[u8], password: Option<&str>) -> Result<Self> {
        check_pdf_header(data)?;

        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        // Note: password-protected PDFs are not decrypted by lopdf 0.34;
        // the permission mask is still honored below.
        if password.is_some() && doc.is_encrypted() {
            log::warn!("Password was provided but lopdf 0.34 doesn't support decryption");
        }

        let permissions = read_permissions(&doc);
        Ok(Self { doc, permissions })
    }

    /// Load a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R, password: Option<&str>) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data, password)
    }

    /// Override the access permissions.
    ///
    /// For callers that decrypt a document externally and resolve its
    /// permissions themselves.
    pub fn with_permissions(mut self, permissions: AccessPermission) -> Self {
        self.permissions = permissions;
        self
    }

    /// The document's access permissions.
    pub fn permissions(&self) -> AccessPermission {
        self.permissions
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Whether the document carries an encryption dictionary.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Document title from the Info dictionary, if present.
    pub fn title(&self) -> Option<String> {
        let info = self.doc.trailer.get(b"Info").ok()?;
        let info_ref = info.as_reference().ok()?;
        let info_dict = self.doc.get_dictionary(info_ref).ok()?;
        match info_dict.get(b"Title") {
            Ok(Object::String(bytes, _)) => Some(decode_pdf_string(bytes)),
            _ => None,
        }
    }

    /// The document's embedded-files tree, or `None` when the catalog has
    /// no name dictionary or no embedded-files node.
    pub fn embedded_files(&self) -> Result<Option<EmbeddedFileTree<'_>>> {
        EmbeddedFileTree::from_document(&self.doc)
    }

    /// Direct access to the underlying `lopdf::Document`.
    pub fn raw_doc(&self) -> &LopdfDocument {
        &self.doc
    }
}

/// Read the `/P` permission mask from the trailer's encryption
/// dictionary. Unencrypted documents grant everything.
fn read_permissions(doc: &LopdfDocument) -> AccessPermission {
    let encrypt = match doc.trailer.get(b"Encrypt") {
        Ok(obj) => obj,
        Err(_) => return AccessPermission::all(),
    };

    let dict = match encrypt {
        Object::Reference(r) => match doc.get_object(*r) {
            Ok(Object::Dictionary(d)) => d,
            _ => return AccessPermission::all(),
        },
        Object::Dictionary(d) => d,
        _ => return AccessPermission::all(),
    };

    match dict.get(b"P") {
        Ok(Object::Integer(p)) => AccessPermission::from_permission_bits(*p),
        _ => AccessPermission::all(),
    }
}

/// Decode a PDF text string: UTF-16BE with BOM, then UTF-8, then Latin-1.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}
