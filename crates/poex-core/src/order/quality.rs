//! Completeness and confidence scoring of validated records.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::config::ExtractionConfig;
use crate::models::order::{ExtractionResult, FormatType, ProductLine};

use super::rules::parse_amount;

const REQUIRED_WEIGHT: f32 = 0.4;
const RECOMMENDED_WEIGHT: f32 = 0.3;
const PRODUCT_WEIGHT: f32 = 0.3;

/// Largest accepted gap between the total and the sum of subtotals.
const TOTAL_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// How trustworthy a validated record is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    /// Weighted fraction of expected content that is present (0.0 - 1.0).
    pub completeness: f32,
    /// `completeness` capped by the configured ceiling.
    pub confidence: f32,
    pub required_score: f32,
    pub recommended_score: f32,
    /// Fraction of structurally complete product lines.
    pub product_score: f32,
    pub per_field_confidence: BTreeMap<String, f32>,
    pub suggestions: Vec<String>,
    pub needs_review: bool,
}

/// Summary of the input text and what was recovered from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionStats {
    pub text_length: usize,
    pub line_count: usize,
    /// Longer texts carry more signal; clamped to 0.1 - 1.0.
    pub text_quality: f32,
    /// Proxy for layout structure based on line count.
    pub structure_quality: f32,
    pub format_type: FormatType,
    pub format_label: String,
    pub fields_detected: usize,
    pub fields_total: usize,
    pub product_count: usize,
}

/// Score a validated record.
pub fn score(result: &ExtractionResult, config: &ExtractionConfig) -> QualityReport {
    let sentinels = &config.validation;
    let mut suggestions = Vec::new();
    let mut per_field_confidence = BTreeMap::new();

    let required = [
        ("customer_name", result.customer_name.as_str(), Some(sentinels.unknown_customer.as_str())),
        ("po_number", result.po_number.as_str(), Some(sentinels.missing_po_number.as_str())),
    ];
    let mut required_present = 0;
    for (field, value, sentinel) in required {
        let confidence = field_confidence(value, sentinel);
        per_field_confidence.insert(field.to_string(), confidence);
        if confidence > 0.0 {
            required_present += 1;
        } else {
            suggestions.push(format!("required field {field} missing"));
        }
    }

    let total = parse_amount(&result.total_amount).unwrap_or_default();
    if total.is_zero() {
        per_field_confidence.insert("total_amount".to_string(), 0.0);
        suggestions.push("required field total_amount missing".to_string());
    } else {
        per_field_confidence.insert("total_amount".to_string(), 0.9);
        required_present += 1;
    }
    let required_score = required_present as f32 / 3.0;

    let recommended = [
        ("currency", result.currency.as_str()),
        ("destination", result.destination.as_str()),
        ("payment_terms", result.payment_terms.as_str()),
        ("shipping_terms", result.shipping_terms.as_str()),
    ];
    let mut recommended_present = 0;
    for (field, value) in recommended {
        let confidence = field_confidence(value, None);
        per_field_confidence.insert(field.to_string(), confidence);
        if confidence > 0.0 {
            recommended_present += 1;
        } else {
            suggestions.push(format!("recommended field {field} missing"));
        }
    }
    let recommended_score = recommended_present as f32 / recommended.len() as f32;

    let placeholder_only = result.products.len() == 1
        && result.products[0].name == sentinels.unknown_product;
    let mut complete_lines = 0;
    if placeholder_only {
        suggestions.push("no product lines recovered".to_string());
    } else {
        for (index, product) in result.products.iter().enumerate() {
            if is_complete_line(product, &sentinels.unknown_product) {
                complete_lines += 1;
            } else {
                suggestions.push(format!("product line {} incomplete", index + 1));
            }
        }
    }
    let product_score = if result.products.is_empty() {
        0.0
    } else {
        complete_lines as f32 / result.products.len() as f32
    };
    per_field_confidence.insert("products".to_string(), product_score);

    if let Some(sum) = subtotal_sum(&result.products) {
        if !total.is_zero() && !sum.is_zero() && (total - sum).abs() > TOTAL_TOLERANCE {
            suggestions.push(format!(
                "total_amount {} does not match sum of line subtotals {}",
                result.total_amount, sum
            ));
        }
    }

    let completeness = (REQUIRED_WEIGHT * required_score
        + RECOMMENDED_WEIGHT * recommended_score
        + PRODUCT_WEIGHT * product_score)
        .clamp(0.0, 1.0);

    let needs_review = completeness < config.quality.review_threshold;
    if needs_review {
        suggestions.push("low overall completeness; manual review recommended".to_string());
    }

    QualityReport {
        completeness,
        confidence: completeness * config.quality.confidence_ceiling,
        required_score,
        recommended_score,
        product_score,
        per_field_confidence,
        suggestions,
        needs_review,
    }
}

/// Length heuristic: mid-length values are the most plausible captures.
pub fn field_confidence(value: &str, sentinel: Option<&str>) -> f32 {
    let value = value.trim();
    if value.is_empty() || sentinel == Some(value) {
        return 0.0;
    }

    match value.chars().count() {
        0..=2 => 0.4,
        3..=60 => 0.9,
        61..=120 => 0.6,
        _ => 0.3,
    }
}

/// Describe the input text and the recovered record.
pub fn extraction_stats(text: &str, result: &ExtractionResult, report: &QualityReport) -> ExtractionStats {
    let line_count = text.lines().count();
    let newlines = text.matches('\n').count();

    let fields_detected = ["customer_name", "po_number", "total_amount"]
        .iter()
        .filter(|f| report.per_field_confidence.get(**f).is_some_and(|c| *c > 0.0))
        .count();

    ExtractionStats {
        text_length: text.len(),
        line_count,
        text_quality: (text.len() as f32 / 5000.0).clamp(0.1, 1.0),
        structure_quality: (newlines as f32 / 50.0).min(1.0),
        format_type: result.format_type,
        format_label: result.format_type.label().to_string(),
        fields_detected,
        fields_total: 3,
        product_count: result.products.len(),
    }
}

fn is_complete_line(product: &ProductLine, unknown_product: &str) -> bool {
    let named = !product.name.trim().is_empty()
        && product.name != unknown_product
        && !is_numbered_placeholder(&product.name);
    let positive = |v: &str| parse_amount(v).is_some_and(|d| !d.is_zero());

    named && positive(&product.quantity) && positive(&product.unit_price)
}

/// "Product 3" style names assigned to unnamed lines.
fn is_numbered_placeholder(name: &str) -> bool {
    name.strip_prefix("Product ")
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

fn subtotal_sum(products: &[ProductLine]) -> Option<Decimal> {
    products
        .iter()
        .map(|p| parse_amount(&p.subtotal).unwrap_or_default())
        .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::{DraftProduct, DraftRecord};
    use crate::order::validate::validate;
    use pretty_assertions::assert_eq;

    fn validated(draft: DraftRecord) -> ExtractionResult {
        validate(&draft, &ExtractionConfig::default().validation)
    }

    fn full_draft() -> DraftRecord {
        DraftRecord {
            customer_name: "Acme Corp".to_string(),
            po_number: "PO-2024-001".to_string(),
            currency: "USD".to_string(),
            payment_terms: "Net 30".to_string(),
            shipping_terms: "FOB Shanghai".to_string(),
            destination: "Los Angeles".to_string(),
            total_amount: "25.00".to_string(),
            products: vec![DraftProduct::new("Widget A", "10", "2.50", "25.00")],
            format_type: FormatType::Format2,
        }
    }

    #[test]
    fn test_complete_record() {
        let report = score(&validated(full_draft()), &ExtractionConfig::default());
        assert!((report.completeness - 1.0).abs() < 1e-6);
        assert!((report.confidence - 0.8).abs() < 1e-6);
        assert!(report.suggestions.is_empty());
        assert!(!report.needs_review);
        assert_eq!(report.per_field_confidence["customer_name"], 0.9);
        assert_eq!(report.per_field_confidence["products"], 1.0);
    }

    #[test]
    fn test_empty_record() {
        let report = score(&validated(DraftRecord::default()), &ExtractionConfig::default());
        // Only the default currency counts.
        assert!((report.completeness - 0.075).abs() < 1e-6);
        assert!(report.needs_review);
        assert_eq!(
            report.suggestions,
            vec![
                "required field customer_name missing",
                "required field po_number missing",
                "required field total_amount missing",
                "recommended field destination missing",
                "recommended field payment_terms missing",
                "recommended field shipping_terms missing",
                "no product lines recovered",
                "low overall completeness; manual review recommended",
            ]
        );
    }

    #[test]
    fn test_incomplete_lines_and_total_mismatch() {
        let mut draft = full_draft();
        draft.total_amount = "100.00".to_string();
        draft.products.push(DraftProduct::new("", "2", "", ""));

        let report = score(&validated(draft), &ExtractionConfig::default());
        assert_eq!(report.product_score, 0.5);
        assert!(report.suggestions.contains(&"product line 2 incomplete".to_string()));
        assert!(report.suggestions.contains(
            &"total_amount 100.00 does not match sum of line subtotals 25.00".to_string()
        ));
    }

    #[test]
    fn test_field_confidence_lengths() {
        assert_eq!(field_confidence("", None), 0.0);
        assert_eq!(field_confidence("N/A", Some("N/A")), 0.0);
        assert_eq!(field_confidence("AB", None), 0.4);
        assert_eq!(field_confidence("Acme Corp", None), 0.9);
        assert_eq!(field_confidence(&"x".repeat(100), None), 0.6);
        assert_eq!(field_confidence(&"x".repeat(200), None), 0.3);
    }

    #[test]
    fn test_stats() {
        let result = validated(full_draft());
        let report = score(&result, &ExtractionConfig::default());
        let stats = extraction_stats("a\nb\n", &result, &report);
        assert_eq!(stats.line_count, 2);
        assert_eq!(stats.text_quality, 0.1);
        assert_eq!(stats.structure_quality, 0.04);
        assert_eq!(stats.fields_detected, 3);
        assert_eq!(stats.format_label, "Purchase Order Header Style");
    }
}
