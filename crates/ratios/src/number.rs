use std::str::FromStr;

use bilan_core::Amount;
use rust_decimal::Decimal;

/// Parses a balance-sheet cell into an amount.
///
/// Accepts accounting negatives "(1 234,56)", decimal commas and stray
/// symbols; returns `None` when nothing numeric is left or what is left is
/// not a single well-formed number.
pub fn clean_number(value: &str) -> Option<Amount> {
    let value = value.trim();
    let signed = match value.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => format!("-{}", inner.trim()),
        None => value.to_string(),
    };

    let cleaned: String = signed
        .chars()
        .map(|c| if c == ',' { '.' } else { c })
        .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
        .collect();

    if !cleaned.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    Decimal::from_str(&cleaned).ok().map(Amount::new)
}
