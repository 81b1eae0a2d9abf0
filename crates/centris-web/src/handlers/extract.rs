use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;

use centris_core::CanonicalRecord;

use crate::models::{ApiError, ExtractResponse};
use crate::state::AppState;
use crate::upload;

/// `POST /extract-pdf` — multipart upload in, canonical records out.
pub async fn extract_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, ApiError> {
    let uploaded = upload::parse_multipart(multipart).await?;
    let filename = uploaded.filename.clone();
    let backend = Arc::clone(&state.backend);

    // PDF parsing is CPU-bound; keep it off the async workers.
    let extraction = tokio::task::spawn_blocking(move || {
        let dir = tempfile::tempdir()
            .map_err(|e| ApiError::Internal(format!("Failed to create temp directory: {}", e)))?;

        // Keep the client's basename so error entries carry the original
        // filename, not a generated one.
        let safe_name = Path::new(&uploaded.filename)
            .file_name()
            .unwrap_or_else(|| OsStr::new("upload.pdf"));
        let pdf_path = dir.path().join(safe_name);
        std::fs::write(&pdf_path, &uploaded.data)
            .map_err(|e| ApiError::Internal(format!("Failed to write upload: {}", e)))?;

        centris_parsing::extract_listings(&pdf_path, backend.as_ref())
            .map_err(|e| ApiError::Unprocessable(e.to_string()))
        // temp dir is removed on drop, on the error paths too
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Extraction task failed: {}", e)))??;

    let properties: Vec<CanonicalRecord> = extraction
        .records
        .iter()
        .map(CanonicalRecord::from_raw)
        .collect();

    tracing::info!(
        filename = %filename,
        records = properties.len(),
        errors = extraction.errors.len(),
        "extraction finished"
    );

    let message = if extraction.errors.is_empty() {
        format!("{} propriété(s) extraite(s)", properties.len())
    } else {
        format!(
            "{} propriété(s) extraite(s), {} erreur(s)",
            properties.len(),
            extraction.errors.len()
        )
    };

    Ok(Json(ExtractResponse {
        success: true,
        filename,
        total_properties: properties.len(),
        properties,
        message,
    }))
}
