//! One document being signed: the overlay, the page being viewed, the
//! signature, and the export trigger

use crate::coords::Placement;
use crate::document::{DocumentKind, SourceDocument};
use crate::engine::{GestureState, OverlayEngine, PlacementConfig};
use crate::error::ExportFailure;
use crate::image_export::ImageExportAdapter;
use crate::pdf_export::PdfExportAdapter;
use crate::signature::SignatureAsset;
use serde::Serialize;
use shared_types::{NaturalDocumentFrame, OverlayRect, Point, PointerTarget, ViewportBounds};

/// Current page of a multi-page document, always within `0..count`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    index: usize,
    count: usize,
}

impl PageCursor {
    pub fn new(count: usize) -> Self {
        Self {
            index: 0,
            count: count.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.count
    }

    /// Returns whether the page changed
    pub fn next(&mut self) -> bool {
        self.go_to(self.index.saturating_add(1))
    }

    pub fn previous(&mut self) -> bool {
        self.go_to(self.index.saturating_sub(1))
    }

    /// Jump to `index`, clamped to the last page
    pub fn go_to(&mut self, index: usize) -> bool {
        let target = index.min(self.count - 1);
        let changed = target != self.index;
        self.index = target;
        changed
    }
}

/// The signed copy, ready to hand to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedArtifact {
    pub file_name: String,
    pub mime_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

pub struct SigningSession {
    document: SourceDocument,
    engine: OverlayEngine,
    cursor: PageCursor,
    signature: Option<SignatureAsset>,
    pdf: PdfExportAdapter,
    image: ImageExportAdapter,
}

impl SigningSession {
    pub fn new(document: SourceDocument, config: PlacementConfig) -> Self {
        let cursor = PageCursor::new(document.page_count());
        Self {
            document,
            engine: OverlayEngine::new(config),
            cursor,
            signature: None,
            pdf: PdfExportAdapter,
            image: ImageExportAdapter::default(),
        }
    }

    pub fn document(&self) -> &SourceDocument {
        &self.document
    }

    pub fn engine(&self) -> &OverlayEngine {
        &self.engine
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn set_signature(&mut self, signature: SignatureAsset) {
        self.signature = Some(signature);
    }

    pub fn clear_signature(&mut self) {
        self.signature = None;
    }

    pub fn signature(&self) -> Option<&SignatureAsset> {
        self.signature.as_ref()
    }

    /// Natural size of the page currently in view
    pub fn natural_frame(&self) -> Option<NaturalDocumentFrame> {
        self.document.natural_frame(self.cursor.index())
    }

    pub fn current_rect(&self) -> OverlayRect {
        self.engine.current_rect()
    }

    pub fn gesture_state(&self) -> GestureState {
        self.engine.state()
    }

    pub fn report_viewport(&mut self, bounds: ViewportBounds) {
        self.engine.report_viewport(bounds);
    }

    pub fn pointer_down(&mut self, point: Point, target: PointerTarget) {
        self.engine.pointer_down(point, target);
    }

    pub fn pointer_down_at(&mut self, point: Point) -> Option<PointerTarget> {
        self.engine.pointer_down_at(point)
    }

    pub fn pointer_move(&mut self, point: Point) -> bool {
        self.engine.pointer_move(point)
    }

    pub fn pointer_up(&mut self) {
        self.engine.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.engine.pointer_leave();
    }

    /// Switch pages. Any gesture in progress ends. The overlay keeps its
    /// rect, but export fails with `UnmeasuredViewport` until the host
    /// reports the new page's viewport.
    pub fn next_page(&mut self) -> bool {
        self.engine.pointer_up();
        let changed = self.cursor.next();
        self.page_changed(changed)
    }

    pub fn previous_page(&mut self) -> bool {
        self.engine.pointer_up();
        let changed = self.cursor.previous();
        self.page_changed(changed)
    }

    pub fn go_to_page(&mut self, index: usize) -> bool {
        self.engine.pointer_up();
        let changed = self.cursor.go_to(index);
        self.page_changed(changed)
    }

    fn page_changed(&mut self, changed: bool) -> bool {
        if changed {
            self.engine.invalidate_viewport();
            tracing::debug!(page = self.cursor.index(), "switched page");
        }
        changed
    }

    /// Produce the signed copy with the signature where the overlay sits on
    /// the current page. The source document and overlay are unchanged
    /// whether or not this succeeds.
    pub fn export(&mut self) -> Result<SignedArtifact, ExportFailure> {
        let signature = self
            .signature
            .as_ref()
            .ok_or(ExportFailure::MissingSignature)?;
        let viewport = self
            .engine
            .viewport()
            .ok_or(ExportFailure::UnmeasuredViewport)?;
        let placement = Placement {
            rect: self.engine.current_rect(),
            viewport,
        };

        let bytes = match self.document.kind() {
            DocumentKind::Pdf => self.pdf.export(
                self.document.bytes(),
                signature,
                placement,
                self.cursor.index(),
            )?,
            DocumentKind::Image(format) => {
                self.image
                    .export(self.document.bytes(), format, signature, placement)?
            }
        };

        let artifact = SignedArtifact {
            file_name: self.document.signed_file_name(),
            mime_type: self.document.mime_type().to_string(),
            bytes,
        };
        tracing::info!(
            file_name = %artifact.file_name,
            size = artifact.bytes.len(),
            "export complete"
        );
        Ok(artifact)
    }
}
