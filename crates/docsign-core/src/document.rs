//! Source documents opened for signing

use crate::error::DocumentLoadError;
use crate::raster::decode_upright;
use image::ImageFormat;
use shared_pdf::{MediaBox, PdfDocument};
use shared_types::NaturalDocumentFrame;

/// How far into the file a PDF header may appear
const PDF_HEADER_WINDOW: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Image(ImageFormat),
}

#[derive(Debug, Clone, PartialEq)]
enum Pages {
    Pdf(Vec<MediaBox>),
    Image(NaturalDocumentFrame),
}

/// An uploaded PDF or raster image with the page geometry the signing flow
/// needs. The bytes are kept untouched; every export starts from them.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    name: Option<String>,
    bytes: Vec<u8>,
    kind: DocumentKind,
    pages: Pages,
}

impl SourceDocument {
    /// Open a document, detecting whether it is a PDF or an image.
    /// `name` is the original file name, if the host knows it.
    pub fn load(name: Option<&str>, bytes: Vec<u8>) -> Result<Self, DocumentLoadError> {
        if bytes.is_empty() {
            return Err(DocumentLoadError::Empty);
        }
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        let (kind, pages) = if looks_like_pdf(&bytes) {
            (DocumentKind::Pdf, Pages::Pdf(read_media_boxes(&bytes)?))
        } else {
            let format = image::guess_format(&bytes)
                .map_err(|_| DocumentLoadError::Unsupported(describe(name.as_deref())))?;
            let decoded = decode_upright(&bytes, format)
                .map_err(|e| DocumentLoadError::Image(e.to_string()))?;
            let frame = NaturalDocumentFrame::new(
                f64::from(decoded.width()),
                f64::from(decoded.height()),
            );
            (DocumentKind::Image(format), Pages::Image(frame))
        };

        tracing::info!(
            name = name.as_deref().unwrap_or("<unnamed>"),
            ?kind,
            size = bytes.len(),
            "loaded source document"
        );

        Ok(Self {
            name,
            bytes,
            kind,
            pages,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn mime_type(&self) -> &'static str {
        match self.kind {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Image(format) => format.to_mime_type(),
        }
    }

    pub fn page_count(&self) -> usize {
        match &self.pages {
            Pages::Pdf(boxes) => boxes.len(),
            Pages::Image(_) => 1,
        }
    }

    /// Natural size of a page: points for PDF, pixels for images
    pub fn natural_frame(&self, page_index: usize) -> Option<NaturalDocumentFrame> {
        match &self.pages {
            Pages::Pdf(boxes) => boxes.get(page_index).map(MediaBox::frame),
            Pages::Image(frame) => (page_index == 0).then_some(*frame),
        }
    }

    /// The declared MediaBox of a PDF page
    pub fn media_box(&self, page_index: usize) -> Option<MediaBox> {
        match &self.pages {
            Pages::Pdf(boxes) => boxes.get(page_index).copied(),
            Pages::Image(_) => None,
        }
    }

    /// File name for the signed copy: `signed_` plus the original name
    pub fn signed_file_name(&self) -> String {
        match (&self.name, self.kind) {
            (Some(name), _) => format!("signed_{}", name),
            (None, DocumentKind::Pdf) => "signed_document.pdf".to_string(),
            (None, DocumentKind::Image(format)) => {
                let ext = format.extensions_str().first().copied().unwrap_or("img");
                format!("signed_image.{}", ext)
            }
        }
    }
}

fn looks_like_pdf(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(PDF_HEADER_WINDOW)];
    window.windows(5).any(|w| w == b"%PDF-")
}

fn read_media_boxes(bytes: &[u8]) -> Result<Vec<MediaBox>, DocumentLoadError> {
    let doc = PdfDocument::from_bytes(bytes)
        .map_err(|e| DocumentLoadError::Pdf(e.to_string()))?;
    (0..doc.page_count())
        .map(|index| {
            doc.media_box(index)
                .map_err(|e| DocumentLoadError::Pdf(e.to_string()))
        })
        .collect()
}

fn describe(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{} is neither a PDF nor a supported image", name),
        None => "content is neither a PDF nor a supported image".to_string(),
    }
}
