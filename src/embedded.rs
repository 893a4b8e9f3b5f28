//! Embedded-files name tree.
//!
//! A PDF document may carry file attachments under the catalog's
//! `/Names /EmbeddedFiles` name tree. This module flattens that tree into
//! a name-keyed map. The tree's native iteration order is not
//! semantically guaranteed, so entries are held in a `BTreeMap` and
//! always traversed in lexicographic order of their names.

use std::collections::BTreeMap;

use lopdf::{Document as LopdfDocument, Dictionary, Object, ObjectId, Stream};

use crate::document::decode_pdf_string;
use crate::error::{Error, Result};

/// MIME subtype marking an attachment as a PDF, making it eligible for
/// recursive extraction.
pub const PDF_MIME_SUBTYPE: &str = "application/pdf";

/// One attachment in a document's embedded-files tree.
#[derive(Debug)]
pub struct EmbeddedFileEntry<'a> {
    doc: &'a LopdfDocument,
    name: String,
    mime_subtype: Option<String>,
    size: Option<i64>,
    stream_id: Option<ObjectId>,
}

impl<'a> EmbeddedFileEntry<'a> {
    /// Entry name (the key in the name tree).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// MIME subtype declared on the embedded stream, if any.
    pub fn mime_subtype(&self) -> Option<&str> {
        self.mime_subtype.as_deref()
    }

    /// Uncompressed byte length from the stream's `/Params /Size`, if
    /// declared.
    pub fn size(&self) -> Option<i64> {
        self.size
    }

    /// Whether the file specification actually carries an embedded
    /// stream. Entries without one cannot be read.
    pub fn has_embedded_stream(&self) -> bool {
        self.stream_id.is_some()
    }

    /// Whether this attachment declares itself to be a PDF.
    pub fn is_pdf(&self) -> bool {
        self.mime_subtype.as_deref() == Some(PDF_MIME_SUBTYPE)
    }

    /// Read the attachment's bytes, decompressing if necessary.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        let id = self
            .stream_id
            .ok_or_else(|| Error::PdfParse(format!("entry {:?} has no embedded stream", self.name)))?;
        match self.doc.get_object(id) {
            Ok(Object::Stream(stream)) => stream_data(stream),
            Ok(_) => Err(Error::PdfParse(format!(
                "embedded file {:?} is not a stream",
                self.name
            ))),
            Err(e) => Err(e.into()),
        }
    }
}

/// Flattened view of a document's embedded-files name tree.
pub struct EmbeddedFileTree<'a> {
    entries: BTreeMap<String, EmbeddedFileEntry<'a>>,
}

impl<'a> EmbeddedFileTree<'a> {
    /// Build the tree from a document's catalog.
    ///
    /// Returns `Ok(None)` when the catalog has no `/Names` dictionary or
    /// that dictionary has no `/EmbeddedFiles` node; an absent tree is
    /// not an error.
    pub fn from_document(doc: &'a LopdfDocument) -> Result<Option<Self>> {
        let catalog = doc.catalog()?;

        let names = match catalog.get(b"Names").ok().map(|o| deref(doc, o)) {
            Some(Object::Dictionary(d)) => d,
            _ => return Ok(None),
        };

        let root = match names.get(b"EmbeddedFiles").ok().map(|o| deref(doc, o)) {
            Some(Object::Dictionary(d)) => d,
            _ => return Ok(None),
        };

        let mut entries = BTreeMap::new();
        collect_node(doc, root, &mut entries)?;
        Ok(Some(Self { entries }))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in lexicographic name order.
    pub fn entries(&self) -> impl Iterator<Item = &EmbeddedFileEntry<'a>> {
        self.entries.values()
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&EmbeddedFileEntry<'a>> {
        self.entries.get(name)
    }
}

/// Walk one name-tree node: leaf `/Names` pairs plus intermediate
/// `/Kids` nodes.
fn collect_node<'a>(
    doc: &'a LopdfDocument,
    node: &'a Dictionary,
    entries: &mut BTreeMap<String, EmbeddedFileEntry<'a>>,
) -> Result<()> {
    if let Ok(names) = node.get(b"Names") {
        if let Object::Array(pairs) = deref(doc, names) {
            for pair in pairs.chunks(2) {
                let [name_obj, spec_obj] = pair else { continue };
                let Object::String(name_bytes, _) = deref(doc, name_obj) else {
                    continue;
                };
                let name = decode_pdf_string(name_bytes);
                if let Some(entry) = resolve_filespec(doc, spec_obj, name.clone()) {
                    entries.insert(name, entry);
                }
            }
        }
    }

    if let Ok(kids) = node.get(b"Kids") {
        if let Object::Array(kids) = deref(doc, kids) {
            for kid in kids {
                if let Object::Dictionary(kid) = deref(doc, kid) {
                    collect_node(doc, kid, entries)?;
                }
            }
        }
    }

    Ok(())
}

/// Resolve a file specification dictionary into an entry. The embedded
/// stream lives under `/EF /F` (or `/EF /UF`); its dictionary carries
/// the MIME subtype and size parameters.
fn resolve_filespec<'a>(
    doc: &'a LopdfDocument,
    spec_obj: &'a Object,
    name: String,
) -> Option<EmbeddedFileEntry<'a>> {
    let Object::Dictionary(spec) = deref(doc, spec_obj) else {
        return None;
    };

    let mut entry = EmbeddedFileEntry {
        doc,
        name,
        mime_subtype: None,
        size: None,
        stream_id: None,
    };

    let ef = match spec.get(b"EF").ok().map(|o| deref(doc, o)) {
        Some(Object::Dictionary(d)) => d,
        // A filespec without /EF is a reference to an external file;
        // keep the entry so the caller can report it as skipped.
        _ => return Some(entry),
    };

    let stream_obj = ef.get(b"F").or_else(|_| ef.get(b"UF")).ok()?;
    let stream_id = stream_obj.as_reference().ok()?;

    if let Ok(Object::Stream(stream)) = doc.get_object(stream_id) {
        entry.stream_id = Some(stream_id);
        if let Ok(Object::Name(subtype)) = stream.dict.get(b"Subtype") {
            entry.mime_subtype = Some(String::from_utf8_lossy(subtype).to_string());
        }
        if let Ok(params) = stream.dict.get(b"Params") {
            if let Object::Dictionary(params) = deref(doc, params) {
                if let Ok(Object::Integer(size)) = params.get(b"Size") {
                    entry.size = Some(*size);
                }
            }
        }
    }

    Some(entry)
}

/// Follow references until a direct object is reached.
fn deref<'a>(doc: &'a LopdfDocument, mut obj: &'a Object) -> &'a Object {
    while let Object::Reference(r) = obj {
        match doc.get_object(*r) {
            Ok(inner) => obj = inner,
            Err(_) => break,
        }
    }
    obj
}

/// Stream payload, decompressed when a filter is present.
pub(crate) fn stream_data(stream: &Stream) -> Result<Vec<u8>> {
    if stream.dict.has(b"Filter") {
        stream
            .decompressed_content()
            .map_err(|e| Error::PdfParse(e.to_string()))
    } else {
        Ok(stream.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    /// Minimal document with an embedded-files name tree holding the
    /// given (name, subtype, payload) attachments.
    fn doc_with_attachments(files: &[(&str, &str, &[u8])]) -> LopdfDocument {
        let mut doc = LopdfDocument::with_version("1.5");

        let mut name_pairs: Vec<Object> = Vec::new();
        for (name, subtype, payload) in files {
            let ef_stream = Stream::new(
                dictionary! {
                    "Type" => "EmbeddedFile",
                    "Subtype" => Object::Name(subtype.as_bytes().to_vec()),
                    "Params" => dictionary! { "Size" => payload.len() as i64 },
                },
                payload.to_vec(),
            );
            let ef_id = doc.add_object(ef_stream);
            let spec_id = doc.add_object(dictionary! {
                "Type" => "Filespec",
                "F" => Object::string_literal(*name),
                "EF" => dictionary! { "F" => Object::Reference(ef_id) },
            });
            name_pairs.push(Object::string_literal(*name));
            name_pairs.push(Object::Reference(spec_id));
        }

        let tree_id = doc.add_object(dictionary! { "Names" => name_pairs });
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
            "Names" => dictionary! { "EmbeddedFiles" => Object::Reference(tree_id) },
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_absent_tree_is_none() {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", catalog_id);

        assert!(EmbeddedFileTree::from_document(&doc).unwrap().is_none());
    }

    #[test]
    fn test_entries_in_lexicographic_order() {
        let doc = doc_with_attachments(&[
            ("zeta.pdf", "application/pdf", b"z"),
            ("alpha.pdf", "application/pdf", b"a"),
            ("midway.png", "image/png", b"m"),
        ]);

        let tree = EmbeddedFileTree::from_document(&doc).unwrap().unwrap();
        let names: Vec<&str> = tree.entries().map(|e| e.name()).collect();
        assert_eq!(names, vec!["alpha.pdf", "midway.png", "zeta.pdf"]);
    }

    #[test]
    fn test_entry_metadata() {
        let doc = doc_with_attachments(&[("attach.pdf", "application/pdf", b"hello")]);
        let tree = EmbeddedFileTree::from_document(&doc).unwrap().unwrap();

        let entry = tree.get("attach.pdf").unwrap();
        assert_eq!(entry.mime_subtype(), Some("application/pdf"));
        assert!(entry.is_pdf());
        assert_eq!(entry.size(), Some(5));
        assert!(entry.has_embedded_stream());
        assert_eq!(entry.read_bytes().unwrap(), b"hello");
    }

    #[test]
    fn test_non_pdf_subtype() {
        let doc = doc_with_attachments(&[("photo.png", "image/png", b"\x89PNG")]);
        let tree = EmbeddedFileTree::from_document(&doc).unwrap().unwrap();
        let entry = tree.get("photo.png").unwrap();
        assert!(!entry.is_pdf());
    }
}
