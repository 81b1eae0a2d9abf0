//! Field recognizers for Centris report text.
//!
//! Each recognizer is an independent regex over whatever slice of document
//! text it is handed (whole document or one record window) and returns its
//! matches with byte positions. Correlating positionally adjacent matches
//! into records is the assembler's job, not the recognizers'.

use once_cell::sync::Lazy;
use regex::Regex;

/// A recognized field value and the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    pub start: usize,
    pub value: String,
}

/// A recognized street address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressMatch {
    pub start: usize,
    pub street: String,
    pub locality: Option<String>,
}

impl AddressMatch {
    /// The display form: `street` or `street, locality`.
    pub fn full(&self) -> String {
        match &self.locality {
            Some(locality) => format!("{}, {}", self.street, locality),
            None => self.street.clone(),
        }
    }
}

/// A recognized currency amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceMatch {
    pub start: usize,
    /// The digit groups as written, e.g. `450 000` or `450,000`.
    pub amount: String,
    /// Whether a `$` was adjacent to the amount.
    pub has_symbol: bool,
}

// ── Identifier ──────────────────────────────────────────────────────────

/// Labelled listing number: `Centris #12345678`, `No Centris : 12345678`,
/// `MLS 12345678`.
static LABELLED_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:centris|mls)[^0-9\n]{0,10}(\d{7,8})\b").unwrap());

/// Bare 8-digit token, only trusted when no labelled number exists anywhere.
static BARE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{8}\b").unwrap());

/// Find listing-number record boundaries.
///
/// Labelled matches win; the bare-token fallback only applies when the text
/// contains no labelled number at all, to limit false boundaries from
/// phone-number fragments and postal data.
pub fn identifier_matches(text: &str) -> Vec<FieldMatch> {
    let labelled: Vec<FieldMatch> = LABELLED_ID_RE
        .captures_iter(text)
        .map(|caps| FieldMatch {
            start: caps.get(0).unwrap().start(),
            value: caps.get(1).unwrap().as_str().to_string(),
        })
        .collect();
    if !labelled.is_empty() {
        return labelled;
    }

    BARE_ID_RE
        .find_iter(text)
        .map(|m| FieldMatch {
            start: m.start(),
            value: m.as_str().to_string(),
        })
        .collect()
}

// ── Address ─────────────────────────────────────────────────────────────

/// Civic number, street-type word, proper-noun street name, optional
/// `, locality` suffix. Street names keep accented letters.
static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d+[a-z]?[ \t]+(?:rue|avenue|boulevard|chemin|place|street|road)[ \t]+\p{L}[\p{L}'’. -]*)(?:,[ \t]*(\p{L}[\p{L}'’. -]*))?",
    )
    .unwrap()
});

pub fn address_matches(text: &str) -> Vec<AddressMatch> {
    ADDRESS_RE
        .captures_iter(text)
        .map(|caps| AddressMatch {
            start: caps.get(0).unwrap().start(),
            street: caps.get(1).unwrap().as_str().trim().to_string(),
            locality: caps
                .get(2)
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty()),
        })
        .collect()
}

// ── Neighborhood ────────────────────────────────────────────────────────

static NEIGHBORHOOD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:quartier|secteur)\s*:?\s*(\p{L}[\p{L}'’. -]*)").unwrap());

pub fn neighborhood(text: &str) -> Option<String> {
    NEIGHBORHOOD_RE
        .captures(text)
        .map(|caps| caps.get(1).unwrap().as_str().trim().to_string())
}

// ── Property type ───────────────────────────────────────────────────────

static PROPERTY_TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(condo|maison|duplex|triplex|cottage|bungalow|appartement|apartment|house)\b")
        .unwrap()
});

/// Title-case a matched vocabulary word for display (`condo` → `Condo`).
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

pub fn property_type_matches(text: &str) -> Vec<FieldMatch> {
    PROPERTY_TYPE_RE
        .find_iter(text)
        .map(|m| FieldMatch {
            start: m.start(),
            value: title_case(m.as_str()),
        })
        .collect()
}

// ── Price ───────────────────────────────────────────────────────────────

/// Digit groups separated by spaces or commas, or a plain run of 4+ digits,
/// with an optional `$` on either side.
static PRICE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\$[ \t]*)?\b(\d{1,3}(?:[ ,\u{00A0}]\d{3})+|\d{4,})\b([ \t]*\$)?").unwrap()
});

pub fn price_matches(text: &str) -> Vec<PriceMatch> {
    PRICE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let amount = caps.get(2).unwrap().as_str();
            let has_symbol = caps.get(1).is_some() || caps.get(3).is_some();
            // An ungrouped run of 7+ digits with no currency symbol is a
            // listing number or phone fragment, not a price.
            let digit_count = amount.chars().filter(|c| c.is_ascii_digit()).count();
            let grouped = amount.contains(' ') || amount.contains(',') || amount.contains('\u{A0}');
            if !has_symbol && !grouped && digit_count >= 7 {
                return None;
            }
            Some(PriceMatch {
                start: caps.get(0).unwrap().start(),
                amount: amount.to_string(),
                has_symbol,
            })
        })
        .collect()
}

// ── Contact blocks ──────────────────────────────────────────────────────

// Contact labels start their line in the reports; anchoring with (?m)^
// keeps e.g. the "courtier" inside `paul@courtier.ca` from matching.
static OWNER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*propri[ée]taires?(?:\(s\))?[ \t]*:?[ \t]*([^\n]+)").unwrap()
});

static REPRESENTATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*repr[ée]sentants?(?:\(s\))?[ \t]*:?[ \t]*([^\n]+)").unwrap()
});

static BROKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*courtiers?(?:\(s\))?(?:[ \t]+immobiliers?)?[ \t]*:?[ \t]*([^\n]+)")
        .unwrap()
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(?\d{3}\)?[ .-]?\d{3}[.-]\d{4}\b").unwrap());

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

fn labelled_value(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .map(|caps| caps.get(1).unwrap().as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn owner(text: &str) -> Option<String> {
    labelled_value(&OWNER_RE, text)
}

pub fn representative(text: &str) -> Option<String> {
    labelled_value(&REPRESENTATIVE_RE, text)
}

/// All broker name lines in the window, joined. The result is an opaque
/// string downstream, never parsed back into a list.
pub fn broker_names(text: &str) -> Option<String> {
    let names: Vec<String> = BROKER_RE
        .captures_iter(text)
        .map(|caps| caps.get(1).unwrap().as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    join_distinct(names)
}

pub fn phones(text: &str) -> Option<String> {
    let found: Vec<String> = PHONE_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    join_distinct(found)
}

pub fn emails(text: &str) -> Option<String> {
    let found: Vec<String> = EMAIL_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    join_distinct(found)
}

fn join_distinct(values: Vec<String>) -> Option<String> {
    let mut distinct: Vec<String> = Vec::new();
    for v in values {
        if !distinct.contains(&v) {
            distinct.push(v);
        }
    }
    if distinct.is_empty() {
        None
    } else {
        Some(distinct.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_labelled() {
        let ids = identifier_matches("No Centris : 12345678 (En vigueur)");
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].value, "12345678");
    }

    #[test]
    fn test_identifier_labelled_hash() {
        let ids = identifier_matches("Centris #9876543");
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].value, "9876543");
    }

    #[test]
    fn test_identifier_bare_fallback() {
        let ids = identifier_matches("fiche 24681357 sans étiquette");
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].value, "24681357");
    }

    #[test]
    fn test_identifier_labelled_suppresses_bare() {
        // One labelled number and one unrelated bare token: only the
        // labelled one is a boundary.
        let ids = identifier_matches("Centris #12345678 ... lot 87654321");
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].value, "12345678");
    }

    #[test]
    fn test_identifier_none() {
        assert!(identifier_matches("aucun numéro ici 123").is_empty());
    }

    #[test]
    fn test_address_with_locality() {
        let addrs = address_matches("123 rue Principale, Montréal\n");
        assert_eq!(addrs.len(), 1);
        assert_eq!(addrs[0].street, "123 rue Principale");
        assert_eq!(addrs[0].locality.as_deref(), Some("Montréal"));
        assert_eq!(addrs[0].full(), "123 rue Principale, Montréal");
    }

    #[test]
    fn test_address_without_locality() {
        let addrs = address_matches("4560 boulevard Saint-Laurent\n");
        assert_eq!(addrs.len(), 1);
        assert_eq!(addrs[0].full(), "4560 boulevard Saint-Laurent");
    }

    #[test]
    fn test_address_english_street_type() {
        let addrs = address_matches("77 avenue Greene, Westmount\n");
        assert_eq!(addrs.len(), 1);
        assert_eq!(addrs[0].locality.as_deref(), Some("Westmount"));
    }

    #[test]
    fn test_address_followed_by_parenthetical() {
        let addrs = address_matches("123 rue Principale, Montréal (vendu)\n");
        assert_eq!(addrs.len(), 1);
        assert_eq!(addrs[0].full(), "123 rue Principale, Montréal");
    }

    #[test]
    fn test_address_civic_suffix_letter() {
        let addrs = address_matches("123A avenue des Pins, Québec\n");
        assert_eq!(addrs.len(), 1);
        assert_eq!(addrs[0].street, "123A avenue des Pins");
    }

    #[test]
    fn test_neighborhood_labelled() {
        assert_eq!(
            neighborhood("Quartier : Rosemont-La Petite-Patrie\n").as_deref(),
            Some("Rosemont-La Petite-Patrie")
        );
        assert_eq!(neighborhood("Secteur Ahuntsic\n").as_deref(), Some("Ahuntsic"));
    }

    #[test]
    fn test_property_type_title_cased() {
        let types = property_type_matches("belle MAISON et un condo");
        assert_eq!(types.len(), 2);
        assert_eq!(types[0].value, "Maison");
        assert_eq!(types[1].value, "Condo");
    }

    #[test]
    fn test_price_grouped_with_trailing_symbol() {
        let prices = price_matches("Prix demandé : 450 000$");
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].amount, "450 000");
        assert!(prices[0].has_symbol);
    }

    #[test]
    fn test_price_comma_grouped_leading_symbol() {
        let prices = price_matches("listed at $450,000 today");
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].amount, "450,000");
        assert!(prices[0].has_symbol);
    }

    #[test]
    fn test_price_plain_digits_no_symbol() {
        let prices = price_matches("évaluation municipale 325000");
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].amount, "325000");
        assert!(!prices[0].has_symbol);
    }

    #[test]
    fn test_price_skips_listing_number_lookalikes() {
        // 8 ungrouped digits without a symbol: listing number, not a price
        assert!(price_matches("dossier 12345678 ouvert").is_empty());
    }

    #[test]
    fn test_phone_shapes() {
        assert_eq!(
            phones("Bureau (514) 555-1234, cell 438.555.9876").as_deref(),
            Some("(514) 555-1234, 438.555.9876")
        );
    }

    #[test]
    fn test_emails_joined_distinct() {
        let text = "jean@remax.ca et marie@sutton.com et jean@remax.ca";
        assert_eq!(
            emails(text).as_deref(),
            Some("jean@remax.ca, marie@sutton.com")
        );
    }

    #[test]
    fn test_contact_labels() {
        let text = "Propriétaire(s) : Jean Untel, 12 rue A\nReprésentant : Marie Untel\nCourtier : Paul Vendeur\nCourtier immobilier : Anne Achat\n";
        assert_eq!(owner(text).as_deref(), Some("Jean Untel, 12 rue A"));
        assert_eq!(representative(text).as_deref(), Some("Marie Untel"));
        assert_eq!(
            broker_names(text).as_deref(),
            Some("Paul Vendeur, Anne Achat")
        );
    }
}
