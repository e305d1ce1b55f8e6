use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("Page index {index} out of range (document has {count} pages)")]
    PageNotFound { index: usize, count: usize },

    #[error("Malformed page object: {0}")]
    MalformedPage(String),

    #[error("Failed to embed image: {0}")]
    EmbedError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),
}
