//! Product-line recovery.
//!
//! Each layout lists strategies in order of trust; the first one that yields
//! any line wins. Recovered cells are raw strings; the validator normalizes
//! and derives missing amounts.

use regex::Regex;
use tracing::debug;

use crate::models::order::DraftProduct;

use super::patterns::{KV_PRODUCT_NAME, KV_QUANTITY, KV_UNIT_PRICE, NUMERIC_TOKEN, SUMMARY_LINE};
use super::{clean_value, first_capture};

/// A single-line row pattern with the capture groups of each column.
#[derive(Debug, Clone)]
pub struct RowPattern {
    pub regex: Regex,
    pub name: usize,
    pub quantity: usize,
    pub unit_price: usize,
    pub subtotal: Option<usize>,
}

impl RowPattern {
    /// Parse one table row.
    pub fn parse_line(&self, line: &str) -> Option<DraftProduct> {
        let caps = self.regex.captures(line)?;
        let group = |index: usize| {
            caps.get(index)
                .map(|m| clean_value(m.as_str()))
                .unwrap_or_default()
        };

        let name = group(self.name);
        if !name.chars().any(char::is_alphabetic) {
            return None;
        }

        Some(DraftProduct::new(
            name,
            group(self.quantity),
            group(self.unit_price),
            self.subtotal.map(group).unwrap_or_default(),
        ))
    }
}

/// An "Item ... Qty ... Price ... Amount" table delimited by a header line
/// and a totals line.
#[derive(Debug, Clone)]
pub struct TableSection {
    pub header: Regex,
    pub end: Regex,
    pub rows: Vec<RowPattern>,
}

impl TableSection {
    /// Scan the rows between the header and the first totals line.
    pub fn scan(&self, text: &str) -> Vec<DraftProduct> {
        let mut products = Vec::new();
        let mut in_table = false;

        for line in text.lines() {
            let line = line.trim();

            if !in_table {
                in_table = self.header.is_match(line);
                continue;
            }

            if self.end.is_match(line) {
                break;
            }

            if line.is_empty() {
                continue;
            }

            if let Some(product) = self.rows.iter().find_map(|row| row.parse_line(line)) {
                products.push(product);
            }
        }

        products
    }
}

/// A single product described by labels, e.g. "GRADE X / QUANTITY 20 MT".
#[derive(Debug, Clone)]
pub struct LabeledProduct {
    pub name: Regex,
    pub name_prefix: &'static str,
    pub quantity: Regex,
    pub unit_price: Regex,
}

impl LabeledProduct {
    /// Requires both the name label and the quantity label.
    pub fn extract(&self, text: &str) -> Option<DraftProduct> {
        let capture = |re: &Regex| {
            re.captures(text)
                .and_then(|c| c.get(1))
                .map(|m| clean_value(m.as_str()))
                .filter(|v| !v.is_empty())
        };

        let name = capture(&self.name)?;
        let quantity = capture(&self.quantity)?;
        let unit_price = capture(&self.unit_price).unwrap_or_default();

        Some(DraftProduct::new(
            format!("{}{}", self.name_prefix, name),
            quantity,
            unit_price,
            "",
        ))
    }
}

/// One way of recovering product lines.
#[derive(Debug, Clone, Copy)]
pub enum ProductStrategy {
    /// Rows inside a delimited table section.
    Section(&'static TableSection),
    /// Row patterns applied to every line of the text.
    Rows(&'static [RowPattern]),
    /// Consecutive lines ending in two or more numeric columns.
    NumericColumns,
    /// A single labeled product.
    Labeled(&'static LabeledProduct),
    /// Isolated "Item:", "Quantity:", "Unit Price:" labels.
    KeyValue,
}

impl ProductStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            ProductStrategy::Section(_) => "table section",
            ProductStrategy::Rows(_) => "row patterns",
            ProductStrategy::NumericColumns => "numeric columns",
            ProductStrategy::Labeled(_) => "labeled product",
            ProductStrategy::KeyValue => "key/value labels",
        }
    }

    pub fn apply(&self, text: &str) -> Vec<DraftProduct> {
        match self {
            ProductStrategy::Section(section) => section.scan(text),
            ProductStrategy::Rows(rows) => scan_rows(text, rows),
            ProductStrategy::NumericColumns => scan_numeric_columns(text),
            ProductStrategy::Labeled(labeled) => labeled.extract(text).into_iter().collect(),
            ProductStrategy::KeyValue => key_value_product(text).into_iter().collect(),
        }
    }
}

/// Apply strategies in order; the first non-empty result wins.
pub fn recover_products(text: &str, strategies: &[ProductStrategy]) -> Vec<DraftProduct> {
    for strategy in strategies {
        let products = strategy.apply(text);
        if !products.is_empty() {
            debug!("Recovered {} product lines via {}", products.len(), strategy.name());
            return products;
        }
    }

    debug!("No product lines recovered");
    Vec::new()
}

/// Match every line against each row pattern; the first pattern that
/// matches anything wins.
pub fn scan_rows(text: &str, rows: &[RowPattern]) -> Vec<DraftProduct> {
    for row in rows {
        let products: Vec<DraftProduct> = text
            .lines()
            .filter(|line| !SUMMARY_LINE.is_match(line))
            .filter_map(|line| row.parse_line(line))
            .collect();

        if !products.is_empty() {
            return products;
        }
    }

    Vec::new()
}

/// Find runs of consecutive lines that end in numeric columns and return the
/// longest run (the first one on ties).
pub fn scan_numeric_columns(text: &str) -> Vec<DraftProduct> {
    let mut runs: Vec<Vec<DraftProduct>> = Vec::new();
    let mut current = Vec::new();

    for line in text.lines() {
        match parse_numeric_row(line) {
            Some(product) => current.push(product),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    runs.into_iter()
        .rev()
        .max_by_key(|run| run.len())
        .unwrap_or_default()
}

fn parse_numeric_row(line: &str) -> Option<DraftProduct> {
    let line = line.trim();
    if line.is_empty() || line.contains(':') || SUMMARY_LINE.is_match(line) {
        return None;
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let numeric_tail = tokens
        .iter()
        .rev()
        .take_while(|t| NUMERIC_TOKEN.is_match(t))
        .count();
    if numeric_tail < 2 || numeric_tail == tokens.len() {
        return None;
    }

    let (head, tail) = tokens.split_at(tokens.len() - numeric_tail);
    let mut name_tokens: Vec<&str> = head.to_vec();

    // Leading row index ("1", "2.", "3)")
    if name_tokens.len() > 1
        && name_tokens[0]
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == ')')
    {
        name_tokens.remove(0);
    }

    let numbers: Vec<&str> = tail.iter().map(|t| t.trim_start_matches('$')).collect();
    let (extra, columns) = numbers.split_at(numbers.len().saturating_sub(3));
    name_tokens.extend_from_slice(extra);

    let name = clean_value(&name_tokens.join(" "));
    if !name.chars().any(char::is_alphabetic) {
        return None;
    }

    let product = match columns {
        [quantity, unit_price] => DraftProduct::new(name, *quantity, *unit_price, ""),
        [quantity, unit_price, subtotal] => {
            DraftProduct::new(name, *quantity, *unit_price, *subtotal)
        }
        _ => return None,
    };

    Some(product)
}

/// Pull isolated key/value labels into a single product line.
pub fn key_value_product(text: &str) -> Option<DraftProduct> {
    let name = first_capture(text, &KV_PRODUCT_NAME).unwrap_or_default();
    let quantity = first_capture(text, &KV_QUANTITY).unwrap_or_default();
    let unit_price = first_capture(text, &KV_UNIT_PRICE).unwrap_or_default();

    if name.is_empty() && quantity.is_empty() && unit_price.is_empty() {
        return None;
    }

    Some(DraftProduct::new(name, quantity, unit_price, ""))
}
