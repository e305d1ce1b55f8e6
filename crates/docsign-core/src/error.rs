use thiserror::Error;

/// The uploaded file could not be opened as a signable document
#[derive(Error, Debug)]
pub enum DocumentLoadError {
    #[error("Document is empty")]
    Empty,

    #[error("Failed to parse PDF: {0}")]
    Pdf(String),

    #[error("Failed to decode image: {0}")]
    Image(String),

    #[error("Unsupported document type: {0}")]
    Unsupported(String),
}

/// A signed copy could not be produced. The source document and the overlay
/// state are left as they were, so the export can be retried.
#[derive(Error, Debug)]
pub enum ExportFailure {
    #[error("No signature has been provided")]
    MissingSignature,

    #[error("The document surface has not been measured yet")]
    UnmeasuredViewport,

    #[error("Page {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    #[error("Signature image could not be decoded: {0}")]
    SignatureDecode(String),

    #[error("Source document could not be decoded: {0}")]
    SourceDecode(String),

    #[error("Failed to embed signature: {0}")]
    Embed(String),

    #[error("Failed to save signed document: {0}")]
    Save(String),

    #[error("Failed to encode signed image: {0}")]
    Encode(String),
}

/// Failure inside the raster drawing capability
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Overlay rectangle lies outside the base image")]
    EmptyPlacement,

    #[error("Image encoding failed: {0}")]
    Encode(String),
}

impl From<RasterError> for ExportFailure {
    fn from(err: RasterError) -> Self {
        ExportFailure::Encode(err.to_string())
    }
}
