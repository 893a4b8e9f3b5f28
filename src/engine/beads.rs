//! Article-bead flow separation.
//!
//! PDF article threads chain rectangular "beads" across pages
//! (catalog `/Threads`, each thread's first bead at `/F`, chained via
//! `/N`, with page `/P` and rectangle `/R`). When bead separation is
//! enabled, text inside a page's beads is linearized per bead in thread
//! order, ahead of the text outside any bead.

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use super::spans::TextSpan;

/// Axis-aligned bead rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeadRect {
    pub llx: f32,
    pub lly: f32,
    pub urx: f32,
    pub ury: f32,
}

impl BeadRect {
    /// Build from a PDF `/R` array, normalizing corner order.
    fn from_array(arr: &[Object]) -> Option<Self> {
        if arr.len() < 4 {
            return None;
        }
        let mut nums = [0.0f32; 4];
        for (i, obj) in arr.iter().take(4).enumerate() {
            nums[i] = match obj {
                Object::Integer(n) => *n as f32,
                Object::Real(r) => *r,
                _ => return None,
            };
        }
        Some(Self {
            llx: nums[0].min(nums[2]),
            lly: nums[1].min(nums[3]),
            urx: nums[0].max(nums[2]),
            ury: nums[1].max(nums[3]),
        })
    }

    /// Whether a span's baseline origin falls inside the rectangle.
    pub fn contains(&self, span: &TextSpan) -> bool {
        span.x >= self.llx && span.x <= self.urx && span.y >= self.lly && span.y <= self.ury
    }
}

/// Bead rectangles on one page, in thread order then chain order.
pub fn page_bead_rects(doc: &LopdfDocument, page_id: ObjectId) -> Vec<BeadRect> {
    let mut rects = Vec::new();

    let Ok(catalog) = doc.catalog() else {
        return rects;
    };
    let Some(Object::Array(threads)) = catalog.get(b"Threads").ok().map(|o| deref(doc, o)) else {
        return rects;
    };

    for thread in threads {
        let Object::Dictionary(thread) = deref(doc, thread) else {
            continue;
        };
        let Some(first) = thread.get(b"F").ok().and_then(|o| o.as_reference().ok()) else {
            continue;
        };

        // Beads form a circular list; stop when the chain loops back
        let mut current = first;
        loop {
            let Ok(Object::Dictionary(bead)) = doc.get_object(current) else {
                break;
            };

            let on_page = bead
                .get(b"P")
                .ok()
                .and_then(|o| o.as_reference().ok())
                .map(|p| p == page_id)
                .unwrap_or(false);
            if on_page {
                if let Some(Object::Array(r)) = bead.get(b"R").ok().map(|o| deref(doc, o)) {
                    if let Some(rect) = BeadRect::from_array(r) {
                        rects.push(rect);
                    }
                }
            }

            match bead.get(b"N").ok().and_then(|o| o.as_reference().ok()) {
                Some(next) if next != first => current = next,
                _ => break,
            }
        }
    }

    rects
}

/// Partition spans into per-bead groups plus the remainder outside any
/// bead. Group order follows `rects`; span order within a group follows
/// the input.
pub fn partition_by_beads(
    spans: Vec<TextSpan>,
    rects: &[BeadRect],
) -> (Vec<Vec<TextSpan>>, Vec<TextSpan>) {
    let mut groups: Vec<Vec<TextSpan>> = vec![Vec::new(); rects.len()];
    let mut rest = Vec::new();

    for span in spans {
        match rects.iter().position(|r| r.contains(&span)) {
            Some(i) => groups[i].push(span),
            None => rest.push(span),
        }
    }

    (groups, rest)
}

fn deref<'a>(doc: &'a LopdfDocument, mut obj: &'a Object) -> &'a Object {
    while let Object::Reference(r) = obj {
        match doc.get_object(*r) {
            Ok(inner) => obj = inner,
            Err(_) => break,
        }
    }
    obj
}
