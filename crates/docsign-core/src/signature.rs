//! Signature images handed over by the drawing pad

use crate::error::ExportFailure;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::RgbaImage;

/// PNG magic bytes: 89 50 4E 47 0D 0A 1A 0A
const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// An encoded signature image, treated as read-only by both exporters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureAsset {
    bytes: Vec<u8>,
}

impl SignatureAsset {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Parse a `data:<mime>;base64,<payload>` URL as produced by a canvas
    pub fn from_data_url(url: &str) -> Result<Self, ExportFailure> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| ExportFailure::SignatureDecode("not a data URL".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| ExportFailure::SignatureDecode("data URL has no payload".to_string()))?;
        if !header.ends_with(";base64") {
            return Err(ExportFailure::SignatureDecode(format!(
                "unsupported data URL encoding: {}",
                header
            )));
        }

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| ExportFailure::SignatureDecode(e.to_string()))?;
        Ok(Self { bytes })
    }

    /// Encode the asset back into a PNG data URL when it holds PNG data
    pub fn to_data_url(&self) -> Option<String> {
        self.is_png()
            .then(|| format!("data:image/png;base64,{}", STANDARD.encode(&self.bytes)))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_png(&self) -> bool {
        self.bytes.starts_with(&PNG_MAGIC)
    }

    /// Decode into an RGBA raster for compositing or embedding
    pub fn decode(&self) -> Result<RgbaImage, ExportFailure> {
        if self.bytes.is_empty() {
            return Err(ExportFailure::SignatureDecode(
                "signature image data is empty".to_string(),
            ));
        }
        let image = image::load_from_memory(&self.bytes)
            .map_err(|e| ExportFailure::SignatureDecode(e.to_string()))?;
        Ok(image.to_rgba8())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    /// A small PNG: opaque black on the left half, transparent on the right
    pub(crate) fn signature_png() -> Vec<u8> {
        let raster = RgbaImage::from_fn(20, 8, |x, _| {
            if x < 10 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        let mut out = Cursor::new(Vec::new());
        raster.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_data_url_round_trip() {
        let asset = SignatureAsset::from_bytes(signature_png());
        let url = asset.to_data_url().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let parsed = SignatureAsset::from_data_url(&url).unwrap();
        assert_eq!(parsed, asset);
    }

    #[test]
    fn test_decode_png() {
        let asset = SignatureAsset::from_bytes(signature_png());
        assert!(asset.is_png());
        let raster = asset.decode().unwrap();
        assert_eq!(raster.dimensions(), (20, 8));
        assert_eq!(raster.get_pixel(15, 4).0[3], 0);
    }

    #[test]
    fn test_rejects_non_data_url() {
        let result = SignatureAsset::from_data_url("https://example.com/sig.png");
        assert!(matches!(result, Err(ExportFailure::SignatureDecode(_))));
    }

    #[test]
    fn test_rejects_non_base64_data_url() {
        let result = SignatureAsset::from_data_url("data:image/svg+xml,<svg></svg>");
        assert!(matches!(result, Err(ExportFailure::SignatureDecode(_))));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let asset = SignatureAsset::from_bytes(b"definitely not an image".to_vec());
        assert!(!asset.is_png());
        assert!(asset.to_data_url().is_none());
        assert!(matches!(asset.decode(), Err(ExportFailure::SignatureDecode(_))));
    }

    #[test]
    fn test_decode_empty_fails() {
        let asset = SignatureAsset::from_bytes(Vec::new());
        assert!(matches!(asset.decode(), Err(ExportFailure::SignatureDecode(_))));
    }
}
