use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction backends.
///
/// Implementors provide the low-level text acquisition step: page texts in
/// document order, concatenated with a newline separator, with a page that
/// has no text layer contributing an empty string. The pattern matching and
/// record assembly live in `centris-parsing` and depend only on this trait,
/// so they are testable without any PDF library installed.
pub trait PdfBackend: Send + Sync {
    /// Extract the full text content of a PDF file.
    ///
    /// An unopenable or unparseable document is a hard failure for the
    /// whole file; per-page extraction problems are not.
    fn extract_text(&self, path: &Path) -> Result<String, BackendError>;
}
