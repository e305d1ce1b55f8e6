//! Coordinate transformation between display space and native document space

use shared_pdf::MediaBox;
use shared_types::{NativeRect, NaturalDocumentFrame, OverlayRect, ViewportBounds};

/// Where the overlay sat on screen when an export was triggered
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rect: OverlayRect,
    pub viewport: ViewportBounds,
}

/// Native units per display pixel, per axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

impl ScaleFactors {
    /// Scale from a rendered viewport to its natural frame. A page need not
    /// be rendered at a uniform scale, so each axis gets its own factor.
    /// `None` when either size is empty or not finite.
    pub fn between(viewport: ViewportBounds, frame: NaturalDocumentFrame) -> Option<Self> {
        let frame_ok = frame.width.is_finite()
            && frame.height.is_finite()
            && frame.width > 0.0
            && frame.height > 0.0;
        if !viewport.is_measurable() || !frame_ok {
            return None;
        }
        Some(Self {
            x: frame.width / viewport.width,
            y: frame.height / viewport.height,
        })
    }
}

/// How display coordinates land in a particular kind of file
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateMapper {
    /// PDF user space: bottom-left origin in points, shifted by the page's
    /// MediaBox origin
    PdfPage { origin_x: f64, origin_y: f64 },
    /// Raster pixels: top-left origin, same orientation as the display
    Raster,
}

impl CoordinateMapper {
    pub fn pdf_page(media_box: &MediaBox) -> Self {
        CoordinateMapper::PdfPage {
            origin_x: media_box.x,
            origin_y: media_box.y,
        }
    }

    /// Project an overlay rect from display space into the file's native
    /// space
    pub fn to_native(
        &self,
        rect: OverlayRect,
        viewport: ViewportBounds,
        frame: NaturalDocumentFrame,
    ) -> Option<NativeRect> {
        let scale = ScaleFactors::between(viewport, frame)?;

        let width = rect.width * scale.x;
        let height = rect.height * scale.y;
        let x = rect.x * scale.x;
        let y = rect.y * scale.y;

        Some(match *self {
            CoordinateMapper::PdfPage { origin_x, origin_y } => NativeRect {
                x: origin_x + x,
                // Flip Y: the rect's bottom edge measured up from the page bottom
                y: origin_y + frame.height - y - height,
                width,
                height,
            },
            CoordinateMapper::Raster => NativeRect {
                x,
                y,
                width,
                height,
            },
        })
    }

    /// Inverse of [`CoordinateMapper::to_native`]
    pub fn to_display(
        &self,
        native: NativeRect,
        viewport: ViewportBounds,
        frame: NaturalDocumentFrame,
    ) -> Option<OverlayRect> {
        let scale = ScaleFactors::between(viewport, frame)?;

        let (x, y) = match *self {
            CoordinateMapper::PdfPage { origin_x, origin_y } => (
                native.x - origin_x,
                frame.height - (native.y - origin_y) - native.height,
            ),
            CoordinateMapper::Raster => (native.x, native.y),
        };

        Some(OverlayRect {
            x: x / scale.x,
            y: y / scale.y,
            width: native.width / scale.x,
            height: native.height / scale.y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VIEWPORT: ViewportBounds = ViewportBounds::new(800.0, 600.0);
    const FRAME: NaturalDocumentFrame = NaturalDocumentFrame::new(1600.0, 1200.0);
    const RECT: OverlayRect = OverlayRect::new(100.0, 100.0, 200.0, 80.0);

    #[test]
    fn test_raster_double_scale() {
        let native = CoordinateMapper::Raster.to_native(RECT, VIEWPORT, FRAME).unwrap();
        assert_eq!(native, NativeRect::new(200.0, 200.0, 400.0, 160.0));
    }

    #[test]
    fn test_pdf_double_scale_flips_y() {
        let mapper = CoordinateMapper::PdfPage {
            origin_x: 0.0,
            origin_y: 0.0,
        };
        let native = mapper.to_native(RECT, VIEWPORT, FRAME).unwrap();
        // 1200 - 200 - 160
        assert_eq!(native, NativeRect::new(200.0, 840.0, 400.0, 160.0));
    }

    #[test]
    fn test_pdf_media_box_origin_is_added() {
        let media_box = MediaBox {
            x: 50.0,
            y: 20.0,
            width: 1600.0,
            height: 1200.0,
        };
        let native = CoordinateMapper::pdf_page(&media_box)
            .to_native(RECT, VIEWPORT, media_box.frame())
            .unwrap();
        assert_eq!(native, NativeRect::new(250.0, 860.0, 400.0, 160.0));
    }

    #[test]
    fn test_non_uniform_scale() {
        let frame = NaturalDocumentFrame::new(800.0, 1200.0);
        let native = CoordinateMapper::Raster.to_native(RECT, VIEWPORT, frame).unwrap();
        assert_eq!(native, NativeRect::new(100.0, 200.0, 200.0, 160.0));
    }

    #[test]
    fn test_rect_at_top_of_page_touches_pdf_top() {
        let rect = OverlayRect::new(0.0, 0.0, 200.0, 80.0);
        let frame = NaturalDocumentFrame::letter();
        let viewport = ViewportBounds::new(612.0, 792.0);
        let native = CoordinateMapper::pdf_page(&MediaBox::letter())
            .to_native(rect, viewport, frame)
            .unwrap();
        assert_eq!(native.y + native.height, 792.0);
    }

    #[test]
    fn test_unmeasured_viewport_has_no_mapping() {
        let viewport = ViewportBounds::new(0.0, 600.0);
        assert!(CoordinateMapper::Raster.to_native(RECT, viewport, FRAME).is_none());
        assert!(ScaleFactors::between(VIEWPORT, NaturalDocumentFrame::new(0.0, 10.0)).is_none());
    }
}
