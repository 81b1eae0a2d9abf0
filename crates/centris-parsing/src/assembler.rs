//! Record assembly: carving per-property windows out of document text and
//! correlating recognizer matches into [`RawRecord`]s.
//!
//! Three strategies, tried in order:
//! 1. structured — one record per listing-number boundary
//! 2. heuristic — index-paired address/price matches, capped
//! 3. placeholder — provenance-tagged records so the caller never gets a
//!    silent empty success

use centris_core::{Extraction, ExtractionError, Provenance, RawRecord};
use tracing::debug;

use crate::config::AssemblerConfig;
use crate::patterns;
use crate::ExtractError;

pub struct Assembler {
    config: AssemblerConfig,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    pub fn new() -> Self {
        Self {
            config: AssemblerConfig::default(),
        }
    }

    pub fn with_config(config: AssemblerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Assemble records from one document's concatenated page text.
    ///
    /// A whitespace-only document is a document-level failure; everything
    /// past that point produces records and a parallel error list, never
    /// an error for the whole file.
    pub fn assemble(&self, filename: &str, text: &str) -> Result<Extraction, ExtractError> {
        if text.trim().is_empty() {
            return Err(ExtractError::EmptyDocument);
        }

        let mut errors = Vec::new();
        let mut records = self.structured(filename, text, &mut errors);

        if records.is_empty() {
            records = self.heuristic(text);
            if !records.is_empty() {
                debug!(count = records.len(), "assembled records heuristically");
            }
        }

        if records.is_empty() {
            records = self.placeholders(text);
            debug!(count = records.len(), "emitted placeholder records");
        }

        Ok(Extraction { records, errors })
    }

    /// Structured strategy: listing-number matches delimit record windows;
    /// every other recognizer runs inside the window only.
    fn structured(
        &self,
        filename: &str,
        text: &str,
        errors: &mut Vec<ExtractionError>,
    ) -> Vec<RawRecord> {
        let boundaries = patterns::identifier_matches(text);
        let mut records = Vec::with_capacity(boundaries.len());

        for (i, boundary) in boundaries.iter().enumerate() {
            let window_end = boundaries
                .get(i + 1)
                .map(|next| next.start)
                .unwrap_or(text.len())
                .min(boundary.start + self.config.window_cap);
            let window = slice_at_char_boundaries(text, boundary.start, window_end);

            match assemble_window(&boundary.value, window) {
                Ok(record) => records.push(record),
                Err(message) => {
                    errors.push(ExtractionError::record(filename, &boundary.value, message));
                }
            }
        }

        records
    }

    /// Heuristic strategy: pair the k-th address with the k-th price by
    /// match-list index. Not content-aware; capped to bound false positives.
    fn heuristic(&self, text: &str) -> Vec<RawRecord> {
        let addresses = patterns::address_matches(text);
        let prices = patterns::price_matches(text);
        let types = patterns::property_type_matches(text);

        addresses
            .iter()
            .take(self.config.heuristic_cap)
            .enumerate()
            .map(|(k, addr)| RawRecord {
                address: addr.full(),
                current_price: prices
                    .get(k)
                    .map(|p| format!("{}$", p.amount))
                    .unwrap_or_default(),
                property_type: types.get(k).map(|t| t.value.clone()).unwrap_or_default(),
                provenance: Provenance::Heuristic,
                ..Default::default()
            })
            .collect()
    }

    /// Last resort: records whose only purpose is to tell the caller that
    /// nothing could be confidently located. Any plausible amounts found in
    /// the text ride along as prices; all other fields stay empty.
    fn placeholders(&self, text: &str) -> Vec<RawRecord> {
        let amounts: Vec<String> = patterns::price_matches(text)
            .into_iter()
            .filter(|p| p.amount.chars().filter(|c| c.is_ascii_digit()).count() >= 4)
            .map(|p| p.amount)
            .collect();

        let count = if amounts.is_empty() {
            self.config.placeholder_cap
        } else {
            amounts.len().min(self.config.placeholder_cap)
        };

        (0..count)
            .map(|k| RawRecord {
                current_price: amounts.get(k).cloned().unwrap_or_default(),
                provenance: Provenance::Placeholder,
                ..Default::default()
            })
            .collect()
    }
}

/// Assemble one raw record from its boundary window.
///
/// A window containing nothing but the listing number is treated as a
/// false boundary: a record-level error, not an empty record.
fn assemble_window(centris_no: &str, window: &str) -> Result<RawRecord, String> {
    let address = patterns::address_matches(window)
        .first()
        .map(patterns::AddressMatch::full)
        .unwrap_or_default();
    let neighborhood = patterns::neighborhood(window).unwrap_or_default();
    let property_type = patterns::property_type_matches(window)
        .first()
        .map(|t| t.value.clone())
        .unwrap_or_default();

    // Centris detail reports list the asking price before the original
    // listing price. Prefer symbol-adjacent amounts when any exist so
    // phone fragments and years don't shift the pairing.
    let prices = preferred_prices(window);
    let current_price = prices.first().cloned().unwrap_or_default();
    let original_price = prices.get(1).cloned().unwrap_or_default();

    let owner = patterns::owner(window).unwrap_or_default();
    let representative = patterns::representative(window).unwrap_or_default();
    let broker_names = patterns::broker_names(window).unwrap_or_default();
    let broker_phones = patterns::phones(window).unwrap_or_default();
    let broker_emails = patterns::emails(window).unwrap_or_default();

    let record = RawRecord {
        centris_no: centris_no.to_string(),
        address,
        neighborhood,
        property_type,
        current_price,
        original_price,
        owner,
        representative,
        broker_names,
        broker_phones,
        broker_emails,
        provenance: Provenance::Structured,
    };

    let empty = record.address.is_empty()
        && record.current_price.is_empty()
        && record.property_type.is_empty()
        && record.owner.is_empty()
        && record.broker_names.is_empty()
        && record.broker_phones.is_empty()
        && record.broker_emails.is_empty();
    if empty {
        return Err(format!(
            "aucune donnée de fiche reconnue autour du numéro Centris {centris_no}"
        ));
    }

    Ok(record)
}

/// Window amounts in order, restricted to symbol-adjacent matches when any
/// amount carries a `$`.
fn preferred_prices(window: &str) -> Vec<String> {
    let all = patterns::price_matches(window);
    let with_symbol: Vec<String> = all
        .iter()
        .filter(|p| p.has_symbol)
        .map(|p| p.amount.clone())
        .collect();
    if with_symbol.is_empty() {
        all.into_iter().map(|p| p.amount).collect()
    } else {
        with_symbol
    }
}

/// Byte-range slice clamped inward to valid UTF-8 boundaries.
fn slice_at_char_boundaries(text: &str, start: usize, mut end: usize) -> &str {
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    &text[start..end]
}
