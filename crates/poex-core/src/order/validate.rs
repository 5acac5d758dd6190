//! Draft record validation and repair.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::config::ValidationConfig;
use crate::models::order::{DraftProduct, DraftRecord, ExtractionResult, ProductLine, RecordStatus};

use super::rules::{normalize, parse_amount};

/// Turn a draft into a fully populated record.
///
/// Numeric fields are normalized, required fields get sentinels, product
/// lines get their missing amount derived, and an empty product list gets a
/// placeholder line. Running it on its own output changes nothing.
pub fn validate(draft: &DraftRecord, config: &ValidationConfig) -> ExtractionResult {
    let mut products: Vec<ProductLine> = draft
        .products
        .iter()
        .filter(|p| p.has_signal())
        .enumerate()
        .map(|(index, product)| clean_product(index, product, config))
        .collect();

    if products.is_empty() {
        debug!("No product lines; adding placeholder");
        products.push(placeholder_product(config));
    }

    let total_amount = match parse_amount(&draft.total_amount) {
        Some(total) if !total.is_zero() => total.to_string(),
        _ => sum_subtotals(&products).to_string(),
    };

    ExtractionResult {
        customer_name: or_default(&draft.customer_name, &config.unknown_customer),
        po_number: or_default(&draft.po_number, &config.missing_po_number),
        currency: or_default(&draft.currency, &config.default_currency),
        payment_terms: draft.payment_terms.trim().to_string(),
        shipping_terms: draft.shipping_terms.trim().to_string(),
        destination: draft.destination.trim().to_string(),
        total_amount,
        products,
        format_type: draft.format_type,
        extraction_confidence: 0.0,
        status: RecordStatus::Pending,
    }
}

fn or_default(value: &str, default: &str) -> String {
    match value.trim() {
        "" => default.to_string(),
        v => v.to_string(),
    }
}

fn first_non_empty<'a>(a: &'a str, b: &'a str) -> &'a str {
    if a.trim().is_empty() { b.trim() } else { a.trim() }
}

fn normalize_or_zero(raw: &str) -> String {
    match normalize(raw) {
        n if n.is_empty() => "0".to_string(),
        n => n,
    }
}

fn clean_product(index: usize, product: &DraftProduct, config: &ValidationConfig) -> ProductLine {
    let name = match first_non_empty(&product.name, &product.product_name) {
        "" => format!("Product {}", index + 1),
        n => n.to_string(),
    };

    let mut quantity = normalize_or_zero(&product.quantity);
    let mut unit_price = normalize_or_zero(&product.unit_price);
    let mut subtotal = normalize_or_zero(first_non_empty(&product.subtotal, &product.amount));

    derive_missing(&mut quantity, &mut unit_price, &mut subtotal, config.derivation_scale);

    ProductLine {
        product_name: name.clone(),
        name,
        quantity,
        unit_price,
        amount: subtotal.clone(),
        subtotal,
    }
}

/// Fill the one missing value of quantity, unit price and subtotal.
///
/// Applies only when exactly one of the three is zero; a product is kept
/// with its full scale, quotients are rounded to `scale` places.
fn derive_missing(quantity: &mut String, unit_price: &mut String, subtotal: &mut String, scale: u32) {
    let q = parse_amount(quantity).unwrap_or_default();
    let p = parse_amount(unit_price).unwrap_or_default();
    let s = parse_amount(subtotal).unwrap_or_default();

    let derived = match (q.is_zero(), p.is_zero(), s.is_zero()) {
        (false, false, true) => q.checked_mul(p).map(|v| (subtotal, v)),
        (false, true, false) => s.checked_div(q).map(|v| (unit_price, quotient(v, scale))),
        (true, false, false) => s.checked_div(p).map(|v| (quantity, quotient(v, scale))),
        _ => None,
    };

    if let Some((target, value)) = derived {
        *target = value.to_string();
    }
}

fn quotient(value: Decimal, scale: u32) -> Decimal {
    value.round_dp(scale).normalize()
}

fn sum_subtotals(products: &[ProductLine]) -> Decimal {
    products
        .iter()
        .map(|p| parse_amount(&p.subtotal).unwrap_or_default())
        .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s))
        .unwrap_or_default()
}

fn placeholder_product(config: &ValidationConfig) -> ProductLine {
    ProductLine {
        name: config.unknown_product.clone(),
        product_name: config.unknown_product.clone(),
        quantity: "0".to_string(),
        unit_price: "0".to_string(),
        subtotal: "0".to_string(),
        amount: "0".to_string(),
    }
}
