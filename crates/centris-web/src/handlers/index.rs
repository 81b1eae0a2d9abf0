use axum::Json;
use serde_json::{json, Value};

use crate::upload::MAX_UPLOAD_BYTES;

pub async fn index() -> Json<Value> {
    Json(json!({
        "service": "centris-extractor",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "supported_formats": ["pdf"],
        "max_upload_bytes": MAX_UPLOAD_BYTES,
    }))
}
