//! Numeric normalization for OCR'd amounts and quantities.
//!
//! OCR text mixes "1,234.56" and "1.234,56" conventions; [`normalize`] picks
//! the decimal separator by position and returns a canonical decimal string.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Normalize an ambiguous numeric string into canonical decimal form.
///
/// Returns an empty string when nothing numeric survives; callers default
/// that to `"0"`.
pub fn normalize(raw: &str) -> String {
    parse_amount(raw).map(|d| d.to_string()).unwrap_or_default()
}

/// Parse an ambiguous numeric string into a [`Decimal`].
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    // "25.00." and "1,234," are OCR artifacts of trailing punctuation
    let cleaned = cleaned.trim_end_matches([',', '.']);
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(comma), None) => {
            if cleaned.len() - comma <= 3 {
                // Decimal comma; any earlier commas group thousands
                let (int_part, frac_part) = cleaned.split_at(comma);
                format!("{}.{}", int_part.replace(',', ""), &frac_part[1..])
            } else {
                cleaned.replace(',', "")
            }
        }
        (None, _) => cleaned.to_string(),
    };

    let normalized = if normalized.starts_with('.') {
        format!("0{normalized}")
    } else {
        normalized
    };

    Decimal::from_str(&normalized).ok()
}

/// Parse a canonical field value, treating anything unparseable as zero.
pub fn decimal_or_zero(value: &str) -> Decimal {
    parse_amount(value).unwrap_or(Decimal::ZERO)
}

/// Whether a canonical field value is absent or zero.
pub fn is_zero_or_absent(value: &str) -> bool {
    parse_amount(value).is_none_or(|d| d.is_zero())
}
