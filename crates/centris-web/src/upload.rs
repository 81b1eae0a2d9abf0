use axum::extract::Multipart;

use crate::models::ApiError;

/// Uploads above this many bytes are rejected before extraction.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// An uploaded PDF with its original filename.
pub struct UploadedPdf {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Pull the `file` field out of a multipart form and validate it.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<UploadedPdf, ApiError> {
    let mut file: Option<UploadedPdf> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read form field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file data: {}", e)))?
                    .to_vec();
                file = Some(UploadedPdf { filename, data });
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    let file = file.ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;
    validate_upload(&file.filename, &file.data)?;
    Ok(file)
}

/// Extension, size, and magic-byte checks, in that order. Runs before any
/// bytes are written to disk.
fn validate_upload(filename: &str, data: &[u8]) -> Result<(), ApiError> {
    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(ApiError::BadRequest(
            "Only PDF files are accepted".to_string(),
        ));
    }
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::TooLarge(format!(
            "File exceeds the {} MB upload limit",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }
    if !data.starts_with(b"%PDF-") {
        return Err(ApiError::BadRequest(
            "File has a .pdf extension but doesn't appear to be a valid PDF".to_string(),
        ));
    }
    Ok(())
}
