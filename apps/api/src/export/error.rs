use thiserror::Error;

/// Failure from the export pipeline. Callers treat it as opaque: there is no
/// retry and no partial result.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid export options: {0}")]
    InvalidOptions(String),

    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("PDF assembly failed: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("export task failed: {0}")]
    Task(String),
}

impl From<lopdf::Error> for ExportError {
    fn from(e: lopdf::Error) -> Self {
        ExportError::Pdf(e.to_string())
    }
}
