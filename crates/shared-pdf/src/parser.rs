//! PDF parsing and page geometry using lopdf

use crate::error::PdfError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use shared_types::NaturalDocumentFrame;

/// Inherited page attributes are looked up at most this many levels up the
/// page tree
pub(crate) const MAX_TREE_DEPTH: usize = 32;

/// A page's MediaBox normalised to lower-left origin plus size, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl MediaBox {
    pub const fn letter() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 612.0,
            height: 792.0,
        }
    }

    pub fn frame(&self) -> NaturalDocumentFrame {
        NaturalDocumentFrame::new(self.width, self.height)
    }
}

/// Wrapper around lopdf::Document for the signing flow
pub struct PdfDocument {
    pub(crate) doc: Document,
}

impl PdfDocument {
    /// Load a PDF from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        let doc = Document::load_mem(bytes).map_err(|e| PdfError::ParseError(e.to_string()))?;
        if doc.get_pages().is_empty() {
            return Err(PdfError::ParseError("document has no pages".to_string()));
        }
        Ok(Self { doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Page object ID for a 0-based page index
    pub fn page_id(&self, page_index: usize) -> Option<ObjectId> {
        let page_number = u32::try_from(page_index).ok()?.checked_add(1)?;
        self.doc.get_pages().get(&page_number).copied()
    }

    pub(crate) fn require_page(&self, page_index: usize) -> Result<ObjectId, PdfError> {
        self.page_id(page_index).ok_or(PdfError::PageNotFound {
            index: page_index,
            count: self.page_count(),
        })
    }

    /// MediaBox of a page, falling back to inherited values and then to
    /// US Letter when the page tree declares none
    pub fn media_box(&self, page_index: usize) -> Result<MediaBox, PdfError> {
        let page_id = self.require_page(page_index)?;

        let mut node_id = page_id;
        for _ in 0..MAX_TREE_DEPTH {
            let node = self.dictionary(node_id)?;

            if let Ok(media_box) = node.get(b"MediaBox") {
                return self.parse_rect(media_box);
            }

            match node.get(b"Parent").and_then(Object::as_reference) {
                Ok(parent_id) => node_id = parent_id,
                Err(_) => break,
            }
        }

        tracing::debug!(page_index, "no MediaBox in page tree, assuming US Letter");
        Ok(MediaBox::letter())
    }

    pub(crate) fn dictionary(&self, id: ObjectId) -> Result<&Dictionary, PdfError> {
        self.doc
            .get_object(id)
            .and_then(Object::as_dict)
            .map_err(|e| PdfError::MalformedPage(format!("object {:?}: {}", id, e)))
    }

    /// Parse a PDF rectangle array into a normalised MediaBox
    fn parse_rect(&self, obj: &Object) -> Result<MediaBox, PdfError> {
        let arr = match obj {
            Object::Array(a) => a,
            Object::Reference(id) => self
                .doc
                .get_object(*id)
                .and_then(Object::as_array)
                .map_err(|e| PdfError::MalformedPage(format!("MediaBox reference: {}", e)))?,
            _ => return Err(PdfError::MalformedPage("MediaBox is not an array".to_string())),
        };

        if arr.len() != 4 {
            return Err(PdfError::MalformedPage(format!(
                "MediaBox has {} elements, expected 4",
                arr.len()
            )));
        }

        let mut values = [0.0f64; 4];
        for (i, obj) in arr.iter().enumerate() {
            values[i] = self.extract_number(obj)?;
        }

        // Corners may be given in any order
        let [x1, y1, x2, y2] = values;
        Ok(MediaBox {
            x: x1.min(x2),
            y: y1.min(y2),
            width: (x2 - x1).abs(),
            height: (y2 - y1).abs(),
        })
    }

    fn extract_number(&self, obj: &Object) -> Result<f64, PdfError> {
        match obj {
            Object::Integer(i) => Ok(*i as f64),
            Object::Real(r) => Ok(*r as f64),
            Object::Reference(id) => {
                let resolved = self
                    .doc
                    .get_object(*id)
                    .map_err(|e| PdfError::MalformedPage(format!("Failed to resolve: {}", e)))?;
                self.extract_number(resolved)
            }
            _ => Err(PdfError::MalformedPage(
                "Expected number in rectangle".to_string(),
            )),
        }
    }

    /// Serialize the document to bytes
    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>, PdfError> {
        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(buffer)
    }
}
