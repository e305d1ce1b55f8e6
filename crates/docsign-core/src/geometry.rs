//! Pure rectangle math behind overlay dragging and resizing
//!
//! Nothing here knows about gestures. The placement engine strings these
//! together; each function is usable on its own with literal inputs.

use shared_types::{Delta, OverlayRect, ResizeHandle, ViewportBounds};

/// Bound `value` to `[min, max]`. When the range is inverted the lower bound
/// wins, so a rect wider than its viewport ends up pinned at the origin.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Translate `rect` so it lies inside `viewport`, keeping its size.
/// A rect larger than the viewport must be shrunk first; see
/// [`fit_rect_to_viewport`].
pub fn clamp_rect_to_viewport(rect: OverlayRect, viewport: ViewportBounds) -> OverlayRect {
    OverlayRect {
        x: clamp(rect.x, 0.0, viewport.width - rect.width),
        y: clamp(rect.y, 0.0, viewport.height - rect.height),
        ..rect
    }
}

/// Move the edges the handle controls by `delta`. The opposite edges stay
/// put. The result may be inverted or off-canvas.
pub fn apply_resize(rect: OverlayRect, handle: ResizeHandle, delta: Delta) -> OverlayRect {
    let Delta { dx, dy } = delta;
    match handle {
        ResizeHandle::TopLeft => OverlayRect {
            x: rect.x + dx,
            y: rect.y + dy,
            width: rect.width - dx,
            height: rect.height - dy,
        },
        ResizeHandle::TopRight => OverlayRect {
            y: rect.y + dy,
            width: rect.width + dx,
            height: rect.height - dy,
            ..rect
        },
        ResizeHandle::BottomLeft => OverlayRect {
            x: rect.x + dx,
            width: rect.width - dx,
            height: rect.height + dy,
            ..rect
        },
        ResizeHandle::BottomRight => OverlayRect {
            width: rect.width + dx,
            height: rect.height + dy,
            ..rect
        },
    }
}

/// Raise width and height to their minimums, each axis on its own. The edge
/// opposite the dragged handle stays fixed: a left-edge handle grows the
/// rect back towards the left, a top-edge handle back towards the top.
pub fn enforce_min_size(
    rect: OverlayRect,
    handle: ResizeHandle,
    min_width: f64,
    min_height: f64,
) -> OverlayRect {
    let mut out = rect;

    if out.width < min_width {
        if handle.moves_left_edge() {
            out.x = rect.right() - min_width;
        }
        out.width = min_width;
    }

    if out.height < min_height {
        if handle.moves_top_edge() {
            out.y = rect.bottom() - min_height;
        }
        out.height = min_height;
    }

    out
}

/// Cut off whatever part of `rect` hangs outside `viewport`. Edges past the
/// origin are truncated, not translated: the overlay gets smaller instead of
/// sliding back in.
pub fn clip_to_viewport_bounds(rect: OverlayRect, viewport: ViewportBounds) -> OverlayRect {
    let mut out = rect;

    if out.x < 0.0 {
        out.width += out.x;
        out.x = 0.0;
    }
    if out.y < 0.0 {
        out.height += out.y;
        out.y = 0.0;
    }
    if out.right() > viewport.width {
        out.width = viewport.width - out.x;
    }
    if out.bottom() > viewport.height {
        out.height = viewport.height - out.y;
    }

    out
}

/// Bring any rect back into the overlay invariant for `viewport`: size is
/// pulled into `[min, viewport]` per axis (or to the viewport extent when
/// the viewport is smaller than the minimum), then the position is clamped.
pub fn fit_rect_to_viewport(
    rect: OverlayRect,
    viewport: ViewportBounds,
    min_width: f64,
    min_height: f64,
) -> OverlayRect {
    let sized = OverlayRect {
        width: fit_extent(rect.width, min_width, viewport.width),
        height: fit_extent(rect.height, min_height, viewport.height),
        ..rect
    };
    clamp_rect_to_viewport(sized, viewport)
}

fn fit_extent(extent: f64, min: f64, available: f64) -> f64 {
    extent.max(min.min(available)).min(available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::{MIN_OVERLAY_HEIGHT, MIN_OVERLAY_WIDTH};

    const VIEWPORT: ViewportBounds = ViewportBounds::new(800.0, 600.0);

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
        // Inverted range pins to the lower bound
        assert_eq!(clamp(15.0, 0.0, -10.0), 0.0);
    }

    #[test]
    fn test_clamp_rect_keeps_size() {
        let rect = OverlayRect::new(700.0, -30.0, 200.0, 80.0);
        let clamped = clamp_rect_to_viewport(rect, VIEWPORT);
        assert_eq!(clamped, OverlayRect::new(600.0, 0.0, 200.0, 80.0));
    }

    #[test]
    fn test_bottom_right_resize_keeps_origin() {
        let rect = OverlayRect::new(10.0, 10.0, 200.0, 80.0);
        let resized = apply_resize(rect, ResizeHandle::BottomRight, Delta::new(50.0, 20.0));
        assert_eq!(resized, OverlayRect::new(10.0, 10.0, 250.0, 100.0));
    }

    #[test]
    fn test_top_right_resize_moves_top_edge_only() {
        let rect = OverlayRect::new(10.0, 50.0, 200.0, 80.0);
        let resized = apply_resize(rect, ResizeHandle::TopRight, Delta::new(30.0, -20.0));
        assert_eq!(resized, OverlayRect::new(10.0, 30.0, 230.0, 100.0));
    }

    #[test]
    fn test_bottom_left_resize_moves_left_edge_only() {
        let rect = OverlayRect::new(50.0, 10.0, 200.0, 80.0);
        let resized = apply_resize(rect, ResizeHandle::BottomLeft, Delta::new(-20.0, 10.0));
        assert_eq!(resized, OverlayRect::new(30.0, 10.0, 220.0, 90.0));
    }

    #[test]
    fn test_top_left_min_width_floor() {
        let rect = OverlayRect::new(100.0, 100.0, 200.0, 80.0);
        let resized = apply_resize(rect, ResizeHandle::TopLeft, Delta::new(190.0, 0.0));
        let floored = enforce_min_size(
            resized,
            ResizeHandle::TopLeft,
            MIN_OVERLAY_WIDTH,
            MIN_OVERLAY_HEIGHT,
        );

        assert_eq!(floored.width, MIN_OVERLAY_WIDTH);
        // Only 200 - 50 = 150 of the 190 px drag is applied to x
        assert_eq!(floored.x, 250.0);
        assert_eq!(floored.right(), rect.right());
    }

    #[test]
    fn test_min_size_is_per_axis() {
        let rect = OverlayRect::new(100.0, 100.0, 80.0, 80.0);
        let resized = apply_resize(rect, ResizeHandle::BottomRight, Delta::new(-70.0, -75.0));
        let floored = enforce_min_size(
            resized,
            ResizeHandle::BottomRight,
            MIN_OVERLAY_WIDTH,
            MIN_OVERLAY_HEIGHT,
        );
        assert_eq!(floored, OverlayRect::new(100.0, 100.0, 50.0, 20.0));
    }

    #[test]
    fn test_bottom_right_truncates_at_viewport_edge() {
        let rect = OverlayRect::new(600.0, 100.0, 150.0, 80.0);
        let resized = apply_resize(rect, ResizeHandle::BottomRight, Delta::new(100.0, 0.0));
        let clipped = clip_to_viewport_bounds(resized, VIEWPORT);
        assert_eq!(clipped, OverlayRect::new(600.0, 100.0, 200.0, 80.0));
    }

    #[test]
    fn test_top_left_past_origin_truncates() {
        let rect = OverlayRect::new(20.0, 10.0, 200.0, 80.0);
        let resized = apply_resize(rect, ResizeHandle::TopLeft, Delta::new(-50.0, -30.0));
        let clipped = clip_to_viewport_bounds(resized, VIEWPORT);
        // Right and bottom edges stay where they were
        assert_eq!(clipped, OverlayRect::new(0.0, 0.0, 220.0, 90.0));
    }

    #[test]
    fn test_fit_shrinks_oversized_rect() {
        let rect = OverlayRect::new(350.0, 250.0, 500.0, 80.0);
        let fitted = fit_rect_to_viewport(
            rect,
            ViewportBounds::new(400.0, 300.0),
            MIN_OVERLAY_WIDTH,
            MIN_OVERLAY_HEIGHT,
        );
        assert_eq!(fitted, OverlayRect::new(0.0, 220.0, 400.0, 80.0));
    }

    #[test]
    fn test_fit_restores_minimum_by_translating() {
        let rect = OverlayRect::new(790.0, 100.0, 10.0, 80.0);
        let fitted = fit_rect_to_viewport(rect, VIEWPORT, MIN_OVERLAY_WIDTH, MIN_OVERLAY_HEIGHT);
        assert_eq!(fitted, OverlayRect::new(750.0, 100.0, 50.0, 80.0));
    }

    #[test]
    fn test_fit_into_viewport_smaller_than_minimum() {
        let rect = OverlayRect::new(5.0, 5.0, 200.0, 80.0);
        let tiny = ViewportBounds::new(30.0, 10.0);
        let fitted = fit_rect_to_viewport(rect, tiny, MIN_OVERLAY_WIDTH, MIN_OVERLAY_HEIGHT);
        assert_eq!(fitted, OverlayRect::new(0.0, 0.0, 30.0, 10.0));
    }
}
