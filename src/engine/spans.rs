//! Content-stream text extraction.
//!
//! Walks a page's content stream and produces positioned text spans,
//! decoding string operands with the font's declared encoding. Layout
//! analysis is limited to what text linearization needs: baseline
//! positions for line breaks, optional geometric sorting, and bead
//! partitioning (see [`super::beads`]).

use lopdf::{Document as LopdfDocument, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::embedded::stream_data;
use crate::error::{Error, Result};

/// Baseline tolerance when deciding whether two spans share a line.
const LINE_TOLERANCE: f32 = 1.0;

/// Kerning adjustment (in 1/1000 text-space units) treated as a word
/// space inside a TJ array.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A text span with its baseline position.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// Decoded, NFC-normalized text.
    pub text: String,
    /// X position of the baseline start.
    pub x: f32,
    /// Y position of the baseline.
    pub y: f32,
}

/// Text-space transformation state (Tm / Td / T*).
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        // Default line leading; a TL-aware renderer would track it
        self.f -= 12.0 * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }
}

/// Extract positioned text spans from one page's content stream.
pub fn extract_page_spans(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<TextSpan>> {
    let lopdf_fonts = doc.get_page_fonts(page_id).unwrap_or_default();

    let content = page_content(doc, page_id)?;
    if content.is_empty() {
        return Ok(Vec::new());
    }
    let content =
        lopdf::content::Content::decode(&content).map_err(|e| Error::PdfParse(e.to_string()))?;

    let mut spans = Vec::new();
    let mut current_font_name: Vec<u8> = Vec::new();
    let mut text_matrix = TextMatrix::default();
    let mut in_text_block = false;

    for op in content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text_block = true;
                text_matrix = TextMatrix::default();
            }
            "ET" => {
                in_text_block = false;
            }
            "Tf" => {
                if let Some(Object::Name(font_name)) = op.operands.first() {
                    current_font_name = font_name.clone();
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    text_matrix.translate(tx, ty);
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    text_matrix.set(
                        get_number(&op.operands[0]).unwrap_or(1.0),
                        get_number(&op.operands[1]).unwrap_or(0.0),
                        get_number(&op.operands[2]).unwrap_or(0.0),
                        get_number(&op.operands[3]).unwrap_or(1.0),
                        get_number(&op.operands[4]).unwrap_or(0.0),
                        get_number(&op.operands[5]).unwrap_or(0.0),
                    );
                }
            }
            "T*" => {
                text_matrix.next_line();
            }
            "Tj" | "TJ" => {
                if in_text_block {
                    let encoding = lopdf_fonts
                        .get(&current_font_name)
                        .and_then(|f| f.get_font_encoding(doc).ok());

                    let text = if op.operator == "TJ" {
                        // TJ: array of strings and kerning adjustments;
                        // large negative adjustments act as word spaces
                        if let Some(Object::Array(arr)) = op.operands.first() {
                            let mut combined = String::new();
                            for item in arr {
                                match item {
                                    Object::String(bytes, _) => {
                                        combined.push_str(&decode_with(encoding.as_ref(), bytes));
                                    }
                                    Object::Integer(n) => {
                                        if -(*n as f32) > TJ_SPACE_THRESHOLD
                                            && !combined.is_empty()
                                            && !combined.ends_with(' ')
                                        {
                                            combined.push(' ');
                                        }
                                    }
                                    Object::Real(n) => {
                                        if -n > TJ_SPACE_THRESHOLD
                                            && !combined.is_empty()
                                            && !combined.ends_with(' ')
                                        {
                                            combined.push(' ');
                                        }
                                    }
                                    _ => {}
                                }
                            }
                            combined
                        } else {
                            String::new()
                        }
                    } else if let Some(Object::String(bytes, _)) = op.operands.first() {
                        decode_with(encoding.as_ref(), bytes)
                    } else {
                        String::new()
                    };

                    if !text.trim().is_empty() {
                        let (x, y) = text_matrix.position();
                        spans.push(TextSpan { text, x, y });
                    }
                }
            }
            "'" | "\"" => {
                text_matrix.next_line();
                if in_text_block {
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let encoding = lopdf_fonts
                            .get(&current_font_name)
                            .and_then(|f| f.get_font_encoding(doc).ok());
                        let text = decode_with(encoding.as_ref(), bytes);
                        if !text.trim().is_empty() {
                            let (x, y) = text_matrix.position();
                            spans.push(TextSpan { text, x, y });
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(spans)
}

/// Assemble spans into linearized text.
///
/// With `sort` set, spans are reordered top-to-bottom then
/// left-to-right; otherwise content-stream order is kept. A newline is
/// emitted whenever the baseline moves, and the result ends with a
/// newline when any text was produced.
pub fn assemble_text(mut spans: Vec<TextSpan>, sort: bool) -> String {
    if spans.is_empty() {
        return String::new();
    }

    if sort {
        // Stable: spans on the same baseline keep relative order on ties
        spans.sort_by(|a, b| {
            b.y.partial_cmp(&a.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
        });
    }

    let mut out = String::new();
    let mut last_y: Option<f32> = None;
    for span in &spans {
        if let Some(y) = last_y {
            if (span.y - y).abs() > LINE_TOLERANCE {
                out.push('\n');
            }
        }
        out.push_str(&span.text);
        last_y = Some(span.y);
    }
    out.push('\n');
    out
}

/// Decode a string operand, NFC-normalizing the result.
fn decode_with(encoding: Option<&lopdf::Encoding>, bytes: &[u8]) -> String {
    let decoded = match encoding {
        Some(enc) => LopdfDocument::decode_text(enc, bytes).unwrap_or_default(),
        None => crate::document::decode_pdf_string(bytes),
    };
    decoded.nfc().collect()
}

/// Concatenated, decompressed content stream bytes for a page.
fn page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let contents = match page_dict.get(b"Contents") {
        Ok(obj) => obj,
        // A page without contents is simply empty
        Err(_) => return Ok(Vec::new()),
    };

    match contents {
        Object::Reference(r) => {
            if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                return stream_data(s);
            }
            Err(Error::PdfParse("Invalid content stream".to_string()))
        }
        Object::Array(arr) => {
            let mut content = Vec::new();
            for obj in arr {
                if let Object::Reference(r) = obj {
                    if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                        if let Ok(data) = stream_data(s) {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                    }
                }
            }
            Ok(content)
        }
        Object::Stream(s) => stream_data(s),
        _ => Err(Error::PdfParse("Invalid content stream".to_string())),
    }
}

/// Helper to extract a number from a PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
