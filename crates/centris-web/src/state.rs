use std::sync::Arc;

use centris_core::PdfBackend;

/// Shared application state. The text-acquisition backend is injected here
/// so handlers never name a concrete PDF library.
pub struct AppState {
    pub backend: Arc<dyn PdfBackend>,
}
