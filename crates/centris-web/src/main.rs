use std::net::SocketAddr;
use std::sync::Arc;

mod handlers;
mod models;
mod state;
mod upload;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use centris_pdf_mupdf::MupdfBackend;
use state::AppState;

const DEFAULT_PORT: u16 = 5001;

/// Frontend dev servers allowed when CENTRIS_CORS_ORIGINS is not set.
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let state = Arc::new(AppState {
        backend: Arc::new(MupdfBackend::new()),
    });

    // Headroom over the per-file limit for multipart framing
    let body_limit = DefaultBodyLimit::max(upload::MAX_UPLOAD_BYTES + 1024 * 1024);

    let app = axum::Router::new()
        .route("/", axum::routing::get(handlers::index::index))
        .route("/health", axum::routing::get(handlers::index::health))
        .route(
            "/extract-pdf",
            axum::routing::post(handlers::extract::extract_pdf),
        )
        .route(
            "/export-excel",
            axum::routing::post(handlers::export::export_excel),
        )
        .layer(cors_layer())
        .layer(body_limit)
        .with_state(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Explicit origin allow-list; any method and header within it.
fn cors_layer() -> CorsLayer {
    let configured: Vec<String> = match std::env::var("CENTRIS_CORS_ORIGINS") {
        Ok(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
    };
    let origins: Vec<HeaderValue> = configured
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
