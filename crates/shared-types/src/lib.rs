//! Geometry types shared by the signing crates
//!
//! Display-space types (`Point`, `ViewportBounds`, `OverlayRect`) use
//! top-left-origin screen pixels. `NaturalDocumentFrame` and `NativeRect`
//! describe the target file at its intrinsic resolution.

pub mod types;

pub use types::{
    Delta, NativeRect, NaturalDocumentFrame, OverlayRect, Point, PointerTarget, ResizeHandle,
    ViewportBounds, DEFAULT_OVERLAY_RECT, MIN_OVERLAY_HEIGHT, MIN_OVERLAY_WIDTH,
};
