//! Composites the placed signature onto a raster image

use crate::capability::RasterCapability;
use crate::coords::{CoordinateMapper, Placement};
use crate::error::ExportFailure;
use crate::raster::{decode_upright, ImageCompositor};
use crate::signature::SignatureAsset;
use image::{DynamicImage, ImageFormat};
use shared_types::NaturalDocumentFrame;

#[derive(Debug, Clone)]
pub struct ImageExportAdapter<R = ImageCompositor> {
    raster: R,
}

impl Default for ImageExportAdapter {
    fn default() -> Self {
        Self::new(ImageCompositor::default())
    }
}

impl<R: RasterCapability> ImageExportAdapter<R> {
    pub fn new(raster: R) -> Self {
        Self { raster }
    }

    /// Decode `source` upright, draw the signature at the mapped rect and
    /// re-encode in `format`
    pub fn export(
        &self,
        source: &[u8],
        format: ImageFormat,
        signature: &SignatureAsset,
        placement: Placement,
    ) -> Result<Vec<u8>, ExportFailure> {
        let base = decode_upright(source, format)
            .map_err(|e| ExportFailure::SourceDecode(e.to_string()))?;
        self.export_decoded(&base, format, signature, placement)
    }

    /// Same as [`ImageExportAdapter::export`] for an image that is already
    /// decoded
    pub fn export_decoded(
        &self,
        base: &DynamicImage,
        format: ImageFormat,
        signature: &SignatureAsset,
        placement: Placement,
    ) -> Result<Vec<u8>, ExportFailure> {
        let frame = NaturalDocumentFrame::new(f64::from(base.width()), f64::from(base.height()));
        let native = CoordinateMapper::Raster
            .to_native(placement.rect, placement.viewport, frame)
            .ok_or(ExportFailure::UnmeasuredViewport)?;

        let overlay = signature.decode()?;
        let bytes = self
            .raster
            .composite_and_encode(base, &overlay, native, format)?;

        tracing::info!(
            ?format,
            x = native.x,
            y = native.y,
            width = native.width,
            height = native.height,
            size = bytes.len(),
            "signed image"
        );
        Ok(bytes)
    }
}
