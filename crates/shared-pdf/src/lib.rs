//! Shared PDF handling utilities
//!
//! This crate wraps `lopdf` with the handful of operations the signing flow
//! needs: loading a document, reading page media boxes, embedding a raster
//! image as an XObject, drawing it onto a page, and saving.

pub mod error;
pub mod parser;
pub mod xobject;

pub use error::PdfError;
pub use parser::{MediaBox, PdfDocument};
pub use xobject::ImageHandle;
