use serde::{Deserialize, Serialize};

use crate::price::normalize_price;
use crate::{Provenance, RawRecord};

/// The fixed export column headers, in declared order. Every exported sheet
/// and every canonical record follows exactly this order.
pub const COLUMNS: [&str; 11] = [
    "Centris #",
    "Adresse complète",
    "Quartier",
    "Type de propriété",
    "Prix actuel",
    "Prix original",
    "Propriétaire(s): nom(s) et adresse(s)",
    "Représentant(s): nom(s) et adresse(s)",
    "Courtier(s): nom(s)",
    "Courtier(s): téléphone(s)",
    "Courtier(s): courriel(s)",
];

/// A property record in the canonical 11-column shape.
///
/// Field declaration order matches [`COLUMNS`], and serde field names are
/// the exact column headers, so JSON serialization and spreadsheet rows
/// agree on ordering. Every field is always present, possibly empty.
///
/// The extra `provenance` marker is not one of the 11 columns; it lets
/// JSON consumers distinguish genuinely extracted values from heuristic or
/// placeholder fallbacks and is ignored by the spreadsheet sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    #[serde(rename = "Centris #", default)]
    pub centris_no: String,
    #[serde(rename = "Adresse complète", default)]
    pub address: String,
    #[serde(rename = "Quartier", default)]
    pub neighborhood: String,
    #[serde(rename = "Type de propriété", default)]
    pub property_type: String,
    #[serde(rename = "Prix actuel", default)]
    pub current_price: String,
    #[serde(rename = "Prix original", default)]
    pub original_price: String,
    #[serde(rename = "Propriétaire(s): nom(s) et adresse(s)", default)]
    pub owner: String,
    #[serde(rename = "Représentant(s): nom(s) et adresse(s)", default)]
    pub representative: String,
    #[serde(rename = "Courtier(s): nom(s)", default)]
    pub broker_names: String,
    #[serde(rename = "Courtier(s): téléphone(s)", default)]
    pub broker_phones: String,
    #[serde(rename = "Courtier(s): courriel(s)", default)]
    pub broker_emails: String,
    #[serde(rename = "provenance", default)]
    pub provenance: Provenance,
}

impl CanonicalRecord {
    /// Map a raw record into the canonical shape. Total: absent fields
    /// default to empty strings, price fields go through the normalizer.
    pub fn from_raw(raw: &RawRecord) -> Self {
        Self {
            centris_no: raw.centris_no.clone(),
            address: raw.address.clone(),
            neighborhood: raw.neighborhood.clone(),
            property_type: raw.property_type.clone(),
            current_price: normalize_price(&raw.current_price),
            original_price: normalize_price(&raw.original_price),
            owner: raw.owner.clone(),
            representative: raw.representative.clone(),
            broker_names: raw.broker_names.clone(),
            broker_phones: raw.broker_phones.clone(),
            broker_emails: raw.broker_emails.clone(),
            provenance: raw.provenance,
        }
    }

    /// The record's cell values in [`COLUMNS`] order.
    pub fn to_row(&self) -> [&str; 11] {
        [
            &self.centris_no,
            &self.address,
            &self.neighborhood,
            &self.property_type,
            &self.current_price,
            &self.original_price,
            &self.owner,
            &self.representative,
            &self.broker_names,
            &self.broker_phones,
            &self.broker_emails,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_defaults_missing_fields_to_empty() {
        let raw = RawRecord {
            address: "123 rue Principale, Montréal".to_string(),
            current_price: "450 000$".to_string(),
            provenance: Provenance::Heuristic,
            ..Default::default()
        };
        let rec = CanonicalRecord::from_raw(&raw);

        assert_eq!(rec.address, "123 rue Principale, Montréal");
        // Already contains '$': passed through unchanged by the normalizer
        assert_eq!(rec.current_price, "450 000$");
        assert_eq!(rec.provenance, Provenance::Heuristic);

        let row = rec.to_row();
        assert_eq!(row.len(), COLUMNS.len());
        // The remaining 9 cells are empty, never absent
        let non_empty: Vec<&&str> = row.iter().filter(|c| !c.is_empty()).collect();
        assert_eq!(non_empty.len(), 2);
    }

    #[test]
    fn test_from_raw_normalizes_prices() {
        let raw = RawRecord {
            current_price: "450000".to_string(),
            original_price: "475,000".to_string(),
            ..Default::default()
        };
        let rec = CanonicalRecord::from_raw(&raw);
        assert_eq!(rec.current_price, "450 000 $");
        assert_eq!(rec.original_price, "475 000 $");
    }

    #[test]
    fn test_json_keys_match_declared_columns_in_order() {
        let rec = CanonicalRecord::from_raw(&RawRecord::default());
        let json = serde_json::to_value(&rec).unwrap();
        let obj = json.as_object().unwrap();

        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        // serde_json object iteration order is insertion order only with the
        // preserve_order feature; compare as sets plus the struct row order.
        for col in COLUMNS {
            assert!(keys.contains(&col), "missing column {col:?}");
        }
        assert!(keys.contains(&"provenance"));
        assert_eq!(obj.len(), COLUMNS.len() + 1);
    }

    #[test]
    fn test_deserialize_with_missing_fields() {
        let rec: CanonicalRecord =
            serde_json::from_str(r#"{"Adresse complète": "1 rue A, Laval"}"#).unwrap();
        assert_eq!(rec.address, "1 rue A, Laval");
        assert_eq!(rec.centris_no, "");
        assert_eq!(rec.provenance, Provenance::Structured);
    }
}
