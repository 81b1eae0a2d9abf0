use std::path::Path;

use thiserror::Error;

pub mod assembler;
pub mod config;
pub mod patterns;

pub use assembler::Assembler;
pub use config::AssemblerConfig;
// Re-export domain types from core (canonical definitions live there)
pub use centris_core::{BackendError, Extraction, ExtractionError, PdfBackend, RawRecord};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("no extractable text in document")]
    EmptyDocument,
}

/// Extract property listings from a PDF file using the given backend for
/// text acquisition.
///
/// Pipeline:
/// 1. Extract text from the PDF via `backend`
/// 2. Carve out per-property windows anchored on Centris numbers
/// 3. Fall back to index-paired address/price matching when no anchor exists
/// 4. Fall back to provenance-tagged placeholder records when even that
///    finds nothing, so the caller never receives a silent empty success
pub fn extract_listings(
    pdf_path: &Path,
    backend: &dyn PdfBackend,
) -> Result<Extraction, ExtractError> {
    let filename = pdf_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.pdf");
    let text = backend.extract_text(pdf_path)?;
    Assembler::new().assemble(filename, &text)
}
