//! Currency detection.

use regex::Regex;

use super::patterns::{
    CURRENCY_CNY, CURRENCY_EUR, CURRENCY_GBP, CURRENCY_JPY, CURRENCY_LABEL, CURRENCY_USD,
};

/// Detect the order currency as an ISO code.
///
/// An explicit `Currency:` label wins; otherwise codes and symbols are
/// checked in a fixed order, dollars first.
pub fn detect_currency(text: &str) -> Option<String> {
    if let Some(caps) = CURRENCY_LABEL.captures(text) {
        return Some(canonical_code(&caps[1]));
    }

    let markers: [(&Regex, &str); 5] = [
        (&CURRENCY_USD, "USD"),
        (&CURRENCY_EUR, "EUR"),
        (&CURRENCY_JPY, "JPY"),
        (&CURRENCY_GBP, "GBP"),
        (&CURRENCY_CNY, "CNY"),
    ];

    markers
        .iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, code)| code.to_string())
}

fn canonical_code(raw: &str) -> String {
    match raw.to_uppercase().as_str() {
        "RMB" => "CNY".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_wins() {
        assert_eq!(
            detect_currency("Price $10\nCurrency: EUR"),
            Some("EUR".to_string())
        );
        assert_eq!(detect_currency("Currency: rmb"), Some("CNY".to_string()));
    }

    #[test]
    fn test_symbols() {
        assert_eq!(detect_currency("Total $25.00"), Some("USD".to_string()));
        assert_eq!(detect_currency("Total 25,00 €"), Some("EUR".to_string()));
        assert_eq!(detect_currency("合計 ¥2500"), Some("JPY".to_string()));
        assert_eq!(detect_currency("Total 25.00"), None);
    }

    #[test]
    fn test_codes_need_word_boundary() {
        assert_eq!(detect_currency("CAUSED BY"), None);
    }
}
