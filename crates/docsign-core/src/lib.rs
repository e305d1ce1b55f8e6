//! Document signing core logic
//!
//! This crate places a signature overlay on a rendered PDF page or image and
//! writes it into the file at the matching native position:
//!
//! - [`geometry`]: clamp, resize, minimum-size and clipping math
//! - [`engine`]: the pointer-driven overlay placement state machine
//! - [`coords`]: display space to PDF user space or raster pixels
//! - [`pdf_export`] and [`image_export`]: stamp the signature into the file
//! - [`session`]: ties a loaded document, the engine and export together

pub mod capability;
pub mod coords;
pub mod document;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod image_export;
pub mod pdf_export;
pub mod raster;
pub mod session;
pub mod signature;

pub use capability::{PdfCapability, RasterCapability};
pub use coords::{CoordinateMapper, Placement, ScaleFactors};
pub use document::{DocumentKind, SourceDocument};
pub use engine::{DragSession, GestureState, OverlayEngine, PlacementConfig};
pub use error::{DocumentLoadError, ExportFailure, RasterError};
pub use image_export::ImageExportAdapter;
pub use pdf_export::PdfExportAdapter;
pub use raster::ImageCompositor;
pub use session::{PageCursor, SignedArtifact, SigningSession};
pub use signature::SignatureAsset;

// Re-export types from shared crates
pub use shared_pdf::{MediaBox, PdfDocument};
pub use shared_types::*;
