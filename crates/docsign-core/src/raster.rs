//! Raster compositing with the `image` crate

use crate::capability::RasterCapability;
use crate::error::RasterError;
use image::imageops::{self, FilterType};
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader, ImageResult, RgbaImage};
use shared_types::NativeRect;
use std::io::Cursor;

/// Decode `bytes` and rotate or flip the pixels per the EXIF orientation, so
/// dimensions and coordinates match what a viewer displays
pub fn decode_upright(bytes: &[u8], format: ImageFormat) -> ImageResult<DynamicImage> {
    let mut decoder = ImageReader::with_format(Cursor::new(bytes), format).into_decoder()?;
    let orientation = decoder.orientation().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "unreadable orientation metadata, assuming upright");
        Orientation::NoTransforms
    });

    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    Ok(image)
}

/// Alpha-blends the signature onto the base image in memory
#[derive(Debug, Clone, Copy)]
pub struct ImageCompositor {
    filter: FilterType,
}

impl Default for ImageCompositor {
    fn default() -> Self {
        Self {
            filter: FilterType::Triangle,
        }
    }
}

impl ImageCompositor {
    pub fn with_filter(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl RasterCapability for ImageCompositor {
    fn composite_and_encode(
        &self,
        base: &DynamicImage,
        overlay: &RgbaImage,
        rect: NativeRect,
        format: ImageFormat,
    ) -> Result<Vec<u8>, RasterError> {
        let (base_w, base_h) = (f64::from(base.width()), f64::from(base.height()));
        let outside = rect.x >= base_w
            || rect.y >= base_h
            || rect.x + rect.width <= 0.0
            || rect.y + rect.height <= 0.0;
        if outside || !rect.width.is_finite() || !rect.height.is_finite() {
            return Err(RasterError::EmptyPlacement);
        }

        let width = rect.width.round().max(1.0) as u32;
        let height = rect.height.round().max(1.0) as u32;
        let scaled = imageops::resize(overlay, width, height, self.filter);

        let mut canvas = base.to_rgba8();
        imageops::overlay(
            &mut canvas,
            &scaled,
            rect.x.round() as i64,
            rect.y.round() as i64,
        );

        let composed = DynamicImage::ImageRgba8(canvas);
        let output = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(composed.to_rgb8()),
            _ => composed,
        };

        let mut out = Cursor::new(Vec::new());
        output
            .write_to(&mut out, format)
            .map_err(|e| RasterError::Encode(e.to_string()))?;

        tracing::debug!(?format, width, height, "composited signature onto image");
        Ok(out.into_inner())
    }
}
