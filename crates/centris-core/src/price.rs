/// Normalize a raw price substring into the canonical display format:
/// digit groups of three separated by single spaces, trailing ` $`.
///
/// Total and idempotent:
/// - empty input stays empty
/// - input already containing `$` is returned unchanged
/// - input with no digits is returned unchanged (never fabricate a price)
/// - amounts too large for `u64` are returned unchanged
pub fn normalize_price(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    if raw.contains('$') {
        return raw.to_string();
    }

    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return raw.to_string();
    }

    match digits.parse::<u64>() {
        Ok(amount) => format!("{} $", group_thousands(amount)),
        Err(_) => raw.to_string(),
    }
}

/// Format a non-negative amount with a space every three digits from the right.
fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}
