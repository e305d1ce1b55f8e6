//! External capabilities the export adapters drive
//!
//! The adapters only decide *where* the signature goes. Writing it into a
//! PDF or compositing it onto pixels is delegated through these traits, so
//! either side can be swapped out (or recorded in tests).

use crate::error::RasterError;
use image::{DynamicImage, ImageFormat, RgbaImage};
use shared_pdf::{ImageHandle, MediaBox, PdfDocument, PdfError};
use shared_types::NativeRect;

/// An opened PDF that can take an image on one of its pages
pub trait PdfCapability {
    fn page_count(&self) -> usize;

    /// Declared size and origin of a page, in points
    fn page_media_box(&self, page_index: usize) -> Result<MediaBox, PdfError>;

    fn embed_image(&mut self, image: &RgbaImage) -> Result<ImageHandle, PdfError>;

    /// Draw a previously embedded image at `rect`, in PDF user space
    fn draw_image(
        &mut self,
        page_index: usize,
        handle: ImageHandle,
        rect: NativeRect,
    ) -> Result<(), PdfError>;

    fn serialize(&mut self) -> Result<Vec<u8>, PdfError>;
}

impl PdfCapability for PdfDocument {
    fn page_count(&self) -> usize {
        PdfDocument::page_count(self)
    }

    fn page_media_box(&self, page_index: usize) -> Result<MediaBox, PdfError> {
        self.media_box(page_index)
    }

    fn embed_image(&mut self, image: &RgbaImage) -> Result<ImageHandle, PdfError> {
        PdfDocument::embed_image(self, image)
    }

    fn draw_image(
        &mut self,
        page_index: usize,
        handle: ImageHandle,
        rect: NativeRect,
    ) -> Result<(), PdfError> {
        PdfDocument::draw_image(self, page_index, handle, rect)
    }

    fn serialize(&mut self) -> Result<Vec<u8>, PdfError> {
        self.save_to_bytes()
    }
}

/// 2D drawing: paint an overlay onto a base image and encode the result
pub trait RasterCapability {
    /// Draw `base` at its natural resolution, then `overlay` scaled into
    /// `rect` (pixels, top-left origin), and encode as `format`
    fn composite_and_encode(
        &self,
        base: &DynamicImage,
        overlay: &RgbaImage,
        rect: NativeRect,
        format: ImageFormat,
    ) -> Result<Vec<u8>, RasterError>;
}
