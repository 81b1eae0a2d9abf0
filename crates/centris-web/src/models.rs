use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use centris_core::CanonicalRecord;

/// Response body for a successful extraction.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractResponse {
    pub success: bool,
    pub filename: String,
    pub total_properties: usize,
    pub properties: Vec<CanonicalRecord>,
    pub message: String,
}

/// Request body for the spreadsheet export endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub filename: String,
    pub properties: Vec<CanonicalRecord>,
}

/// API failure with a status code matching where in the pipeline it
/// happened: request validation (400/413), extraction (422), or our own
/// fault (500). Every failure response is structured JSON.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    TooLarge(String),
    Unprocessable(String),
    Internal(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &str) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::TooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(%status, message, "request failed");
        }
        let body = Json(json!({
            "success": false,
            "message": message,
        }));
        (status, body).into_response()
    }
}
