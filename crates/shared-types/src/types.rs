use serde::{Deserialize, Serialize};

/// Smallest overlay width, in display pixels
pub const MIN_OVERLAY_WIDTH: f64 = 50.0;

/// Smallest overlay height, in display pixels
pub const MIN_OVERLAY_HEIGHT: f64 = 20.0;

/// Where a freshly placed signature lands
pub const DEFAULT_OVERLAY_RECT: OverlayRect = OverlayRect {
    x: 100.0,
    y: 100.0,
    width: 200.0,
    height: 80.0,
};

/// Tolerance used when checking containment after float arithmetic
const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Vector from `origin` to this point
    pub fn delta_from(self, origin: Point) -> Delta {
        Delta {
            dx: self.x - origin.x,
            dy: self.y - origin.y,
        }
    }

    pub fn offset_by(self, delta: Delta) -> Point {
        Point {
            x: self.x + delta.dx,
            y: self.y + delta.dy,
        }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        let d = self.delta_from(other);
        (d.dx * d.dx + d.dy * d.dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Delta {
    pub dx: f64,
    pub dy: f64,
}

impl Delta {
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn negate(self) -> Delta {
        Delta {
            dx: -self.dx,
            dy: -self.dy,
        }
    }
}

/// On-screen size of the rendered page or image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportBounds {
    pub width: f64,
    pub height: f64,
}

impl ViewportBounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A viewport the engine can bound against: finite and non-empty
    pub fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Size a surface of the given natural frame renders at when it may not
    /// exceed `max_width` on screen. Narrower surfaces render at natural size.
    pub fn fit_to_width(frame: NaturalDocumentFrame, max_width: f64) -> Self {
        if frame.width <= max_width || frame.width <= 0.0 {
            return Self::new(frame.width, frame.height);
        }
        let scale = max_width / frame.width;
        Self::new(max_width, frame.height * scale)
    }
}

/// Intrinsic size of the document surface: image pixels or PDF points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NaturalDocumentFrame {
    pub width: f64,
    pub height: f64,
}

impl NaturalDocumentFrame {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub const fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    pub const fn a4() -> Self {
        Self::new(595.0, 842.0)
    }
}

/// Overlay position and size in display pixels, relative to the viewport's
/// top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for OverlayRect {
    fn default() -> Self {
        DEFAULT_OVERLAY_RECT
    }
}

impl OverlayRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn with_origin(self, origin: Point) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            ..self
        }
    }

    /// Whether `point` lies inside the rect, edges included
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// The overlay invariant: inside the viewport and no smaller than the
    /// minimum size. Axes where the viewport itself is below the minimum only
    /// require the rect to span the viewport.
    pub fn satisfies_bounds(
        &self,
        viewport: ViewportBounds,
        min_width: f64,
        min_height: f64,
    ) -> bool {
        let min_width = min_width.min(viewport.width);
        let min_height = min_height.min(viewport.height);

        self.x >= -EPSILON
            && self.y >= -EPSILON
            && self.right() <= viewport.width + EPSILON
            && self.bottom() <= viewport.height + EPSILON
            && self.width >= min_width - EPSILON
            && self.height >= min_height - EPSILON
    }
}

/// Rect in the target file's own coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NativeRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NativeRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Corner grab point used to resize the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 4] = [
        ResizeHandle::TopLeft,
        ResizeHandle::TopRight,
        ResizeHandle::BottomLeft,
        ResizeHandle::BottomRight,
    ];

    /// Dragging this handle moves the rect's left edge
    pub fn moves_left_edge(self) -> bool {
        matches!(self, ResizeHandle::TopLeft | ResizeHandle::BottomLeft)
    }

    /// Dragging this handle moves the rect's top edge
    pub fn moves_top_edge(self) -> bool {
        matches!(self, ResizeHandle::TopLeft | ResizeHandle::TopRight)
    }

    /// Where the handle sits on `rect`
    pub fn position_on(self, rect: &OverlayRect) -> Point {
        let x = if self.moves_left_edge() {
            rect.x
        } else {
            rect.right()
        };
        let y = if self.moves_top_edge() {
            rect.y
        } else {
            rect.bottom()
        };
        Point::new(x, y)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResizeHandle::TopLeft => "top-left",
            ResizeHandle::TopRight => "top-right",
            ResizeHandle::BottomLeft => "bottom-left",
            ResizeHandle::BottomRight => "bottom-right",
        }
    }
}

/// What a pointer-down landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointerTarget {
    Body,
    Handle(ResizeHandle),
}
