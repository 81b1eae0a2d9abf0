use serde::{Deserialize, Serialize};

pub mod backend;
pub mod price;
pub mod schema;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend};
pub use price::normalize_price;
pub use schema::{CanonicalRecord, COLUMNS};

/// How a record's field values were recovered from the document text.
///
/// `Structured` records were anchored on an explicit Centris number.
/// `Heuristic` records come from index-paired address/price matches when no
/// anchor was found. `Placeholder` records exist only so a caller never
/// receives a silent empty success; their fields are mostly empty and must
/// not be treated as real listing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    #[default]
    Structured,
    Heuristic,
    Placeholder,
}

/// A per-property record as produced by the assembler, before schema
/// adaptation. Fields are empty strings when the corresponding recognizer
/// found nothing in the record's window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub centris_no: String,
    pub address: String,
    pub neighborhood: String,
    pub property_type: String,
    pub current_price: String,
    pub original_price: String,
    pub owner: String,
    pub representative: String,
    pub broker_names: String,
    pub broker_phones: String,
    pub broker_emails: String,
    pub provenance: Provenance,
}

/// A record- or document-level extraction failure, collected alongside
/// (never inside) the successful record sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionError {
    #[serde(rename = "NomFichier")]
    pub filename: String,
    #[serde(rename = "Centris #", skip_serializing_if = "Option::is_none")]
    pub centris_no: Option<String>,
    #[serde(rename = "MessageErreur")]
    pub message: String,
}

impl ExtractionError {
    pub fn document(filename: &str, message: impl Into<String>) -> Self {
        Self {
            filename: filename.to_string(),
            centris_no: None,
            message: message.into(),
        }
    }

    pub fn record(filename: &str, centris_no: &str, message: impl Into<String>) -> Self {
        Self {
            filename: filename.to_string(),
            centris_no: if centris_no.is_empty() {
                None
            } else {
                Some(centris_no.to_string())
            },
            message: message.into(),
        }
    }
}

/// Result of one extraction run: records and errors are parallel,
/// independently sized collections.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<RawRecord>,
    pub errors: Vec<ExtractionError>,
}
