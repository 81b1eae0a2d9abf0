use std::ffi::OsStr;
use std::path::Path;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::models::{ApiError, ExportRequest};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// `POST /export-excel` — canonical records in, workbook bytes out.
pub async fn export_excel(Json(request): Json<ExportRequest>) -> Result<Response, ApiError> {
    if request.properties.is_empty() {
        return Err(ApiError::BadRequest(
            "No properties to export".to_string(),
        ));
    }

    let bytes = centris_xlsx::workbook_bytes(&request.properties, &[])
        .map_err(|e| ApiError::Internal(format!("Failed to build workbook: {}", e)))?;

    let download_name = export_filename(&request.filename);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", download_name),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Download name for the workbook: the source PDF's basename with an .xlsx
/// extension. Quotes are stripped since the name is embedded in a quoted
/// header value.
fn export_filename(source: &str) -> String {
    let base = Path::new(source)
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or("")
        .replace('"', "");
    let stem = base
        .strip_suffix(".pdf")
        .or_else(|| base.strip_suffix(".PDF"))
        .unwrap_or(&base);
    if stem.is_empty() {
        "proprietes.xlsx".to_string()
    } else {
        format!("{}.xlsx", stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_filename_renames_pdf_to_xlsx() {
        assert_eq!(export_filename("rapport.pdf"), "rapport.xlsx");
        assert_eq!(export_filename("RAPPORT.PDF"), "RAPPORT.xlsx");
    }

    #[test]
    fn test_export_filename_falls_back_on_empty_name() {
        assert_eq!(export_filename(""), "proprietes.xlsx");
        assert_eq!(export_filename(".pdf"), "proprietes.xlsx");
    }

    #[test]
    fn test_export_filename_strips_directories_and_quotes() {
        assert_eq!(export_filename("/tmp/évaluation.pdf"), "évaluation.xlsx");
        assert_eq!(export_filename("a\"b.pdf"), "ab.xlsx");
    }
}
