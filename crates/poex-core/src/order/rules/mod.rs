//! Rule-based field extractors for purchase-order text.

pub mod amounts;
pub mod currency;
pub mod patterns;
pub mod products;

pub use amounts::{decimal_or_zero, is_zero_or_absent, normalize, parse_amount};
pub use currency::detect_currency;
pub use products::{recover_products, LabeledProduct, ProductStrategy, RowPattern, TableSection};

use regex::Regex;

/// A field value matched by one pattern of an ordered candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Cleaned value.
    pub value: T,
    /// Index of the candidate pattern that produced the value.
    pub pattern_index: usize,
    /// Byte span of the captured group in the source text.
    pub position: (usize, usize),
}

/// Try each candidate pattern in order; the first non-empty capture wins.
pub fn first_match(text: &str, patterns: &[Regex]) -> Option<ExtractionMatch<String>> {
    for (pattern_index, re) in patterns.iter().enumerate() {
        for caps in re.captures_iter(text) {
            let Some(group) = caps.get(1) else {
                continue;
            };
            let value = clean_value(group.as_str());
            if !value.is_empty() {
                return Some(ExtractionMatch {
                    value,
                    pattern_index,
                    position: (group.start(), group.end()),
                });
            }
        }
    }
    None
}

/// Like [`first_match`], returning only the value.
pub fn first_capture(text: &str, patterns: &[Regex]) -> Option<String> {
    first_match(text, patterns).map(|m| m.value)
}

/// Strip surrounding punctuation and collapse inner whitespace.
pub fn clean_value(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ':' | ';' | ',' | '.' | '|' | '#' | '*' | '_' | '=' | '~' | '-' | '"'))
        .to_string()
}
