//! Purchase-order data models.
//!
//! A format recipe produces a [`DraftRecord`] with whatever it could find;
//! the validator turns it into an [`ExtractionResult`] where every field is
//! populated. Numeric fields are kept as canonical decimal strings so that
//! serialized output never goes through floating point.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Known purchase-order layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatType {
    /// "Buyer's Info" block in the top-left corner.
    Format1,
    /// "Purchase Order" title with Bill To / Ship To blocks.
    Format2,
    /// "/// ORDER CONFIRMATION ///" banner.
    Format3,
    /// No known layout; label-based extraction.
    #[default]
    Generic,
}

impl FormatType {
    /// Specific layouts in tie-break priority order.
    pub const SPECIFIC: [FormatType; 3] = [FormatType::Format1, FormatType::Format2, FormatType::Format3];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatType::Format1 => "format1",
            FormatType::Format2 => "format2",
            FormatType::Format3 => "format3",
            FormatType::Generic => "generic",
        }
    }

    /// Human-readable layout name for reports.
    pub fn label(&self) -> &'static str {
        match self {
            FormatType::Format1 => "Buyer's Info Style",
            FormatType::Format2 => "Purchase Order Header Style",
            FormatType::Format3 => "Order Confirmation Style",
            FormatType::Generic => "Generic PO Format",
        }
    }
}

impl fmt::Display for FormatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "format1" => Ok(FormatType::Format1),
            "format2" => Ok(FormatType::Format2),
            "format3" => Ok(FormatType::Format3),
            "generic" => Ok(FormatType::Generic),
            other => Err(format!("Unknown format type: '{other}'")),
        }
    }
}

/// A product line as recovered by a recipe, before validation.
///
/// Both spellings of the name and amount columns are accepted; the validator
/// unifies them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftProduct {
    pub name: String,
    pub product_name: String,
    pub quantity: String,
    #[serde(alias = "unitPrice")]
    pub unit_price: String,
    pub subtotal: String,
    pub amount: String,
}

impl DraftProduct {
    /// Create a draft line from the four canonical columns.
    pub fn new(
        name: impl Into<String>,
        quantity: impl Into<String>,
        unit_price: impl Into<String>,
        subtotal: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            unit_price: unit_price.into(),
            subtotal: subtotal.into(),
            ..Default::default()
        }
    }

    /// Whether any column carries a value.
    pub fn has_signal(&self) -> bool {
        [
            &self.name,
            &self.product_name,
            &self.quantity,
            &self.unit_price,
            &self.subtotal,
            &self.amount,
        ]
        .iter()
        .any(|v| !v.trim().is_empty())
    }
}

/// Partially filled output of a format recipe.
///
/// Deserializes from canonical snake_case keys as well as the legacy
/// camelCase keys (`customer`, `poNumber`, `totalAmount`, `paymentTerms`,
/// `terms`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftRecord {
    #[serde(alias = "customer")]
    pub customer_name: String,

    #[serde(alias = "poNumber")]
    pub po_number: String,

    pub currency: String,

    #[serde(alias = "paymentTerms")]
    pub payment_terms: String,

    #[serde(alias = "terms")]
    pub shipping_terms: String,

    pub destination: String,

    #[serde(alias = "totalAmount")]
    pub total_amount: String,

    pub products: Vec<DraftProduct>,

    /// Layout the recipe was written for.
    pub format_type: FormatType,
}

impl DraftRecord {
    /// Create an empty draft tagged with a layout.
    pub fn for_format(format_type: FormatType) -> Self {
        Self {
            format_type,
            ..Default::default()
        }
    }

    /// Neither a customer nor a PO number was recovered.
    pub fn lacks_identity(&self) -> bool {
        self.customer_name.trim().is_empty() && self.po_number.trim().is_empty()
    }

    /// Fill every empty field of `self` from `other`.
    pub fn fill_missing_from(&mut self, other: &DraftRecord) {
        fn fill(target: &mut String, source: &str) {
            if target.trim().is_empty() && !source.trim().is_empty() {
                *target = source.to_string();
            }
        }

        fill(&mut self.customer_name, &other.customer_name);
        fill(&mut self.po_number, &other.po_number);
        fill(&mut self.currency, &other.currency);
        fill(&mut self.payment_terms, &other.payment_terms);
        fill(&mut self.shipping_terms, &other.shipping_terms);
        fill(&mut self.destination, &other.destination);
        fill(&mut self.total_amount, &other.total_amount);
        if self.products.is_empty() {
            self.products = other.products.clone();
        }
    }
}

/// One validated line item.
///
/// `product_name` mirrors `name` and `amount` mirrors `subtotal` so that
/// consumers using either spelling see the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLine {
    pub name: String,
    pub product_name: String,
    pub quantity: String,
    pub unit_price: String,
    pub subtotal: String,
    pub amount: String,
}

/// Lifecycle status of an extracted record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Extracted normally; awaiting downstream handling.
    #[default]
    Pending,
    /// Produced by the error boundary; every field is a default.
    Error,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordStatus::Pending => write!(f, "pending"),
            RecordStatus::Error => write!(f, "error"),
        }
    }
}

/// Final, fully populated purchase-order record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub customer_name: String,
    pub po_number: String,
    pub currency: String,
    pub payment_terms: String,
    pub shipping_terms: String,
    pub destination: String,
    pub total_amount: String,

    /// Never empty after validation.
    pub products: Vec<ProductLine>,

    /// Layout the record was extracted with.
    pub format_type: FormatType,

    /// Overall trust in the record (0.0 - 1.0).
    pub extraction_confidence: f32,

    pub status: RecordStatus,
}

impl From<&ExtractionResult> for DraftRecord {
    fn from(result: &ExtractionResult) -> Self {
        Self {
            customer_name: result.customer_name.clone(),
            po_number: result.po_number.clone(),
            currency: result.currency.clone(),
            payment_terms: result.payment_terms.clone(),
            shipping_terms: result.shipping_terms.clone(),
            destination: result.destination.clone(),
            total_amount: result.total_amount.clone(),
            products: result
                .products
                .iter()
                .map(|p| DraftProduct {
                    name: p.name.clone(),
                    product_name: p.product_name.clone(),
                    quantity: p.quantity.clone(),
                    unit_price: p.unit_price.clone(),
                    subtotal: p.subtotal.clone(),
                    amount: p.amount.clone(),
                })
                .collect(),
            format_type: result.format_type,
        }
    }
}

impl From<ExtractionResult> for DraftRecord {
    fn from(result: ExtractionResult) -> Self {
        DraftRecord::from(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_type_roundtrip() {
        for format in [
            FormatType::Format1,
            FormatType::Format2,
            FormatType::Format3,
            FormatType::Generic,
        ] {
            assert_eq!(format.to_string().parse::<FormatType>(), Ok(format));
        }
        assert!("format9".parse::<FormatType>().is_err());
    }

    #[test]
    fn test_format_type_serializes_lowercase() {
        let json = serde_json::to_string(&FormatType::Format3).unwrap();
        assert_eq!(json, "\"format3\"");
    }

    #[test]
    fn test_draft_accepts_legacy_keys() {
        let json = r#"{
            "customer": "Acme Corp",
            "poNumber": "PO-1",
            "totalAmount": "1,234.56",
            "paymentTerms": "Net 30",
            "terms": "FOB",
            "products": [{"product_name": "Widget", "unitPrice": "2.5", "amount": "25"}]
        }"#;

        let draft: DraftRecord = serde_json::from_str(json).unwrap();
        assert_eq!(draft.customer_name, "Acme Corp");
        assert_eq!(draft.po_number, "PO-1");
        assert_eq!(draft.total_amount, "1,234.56");
        assert_eq!(draft.payment_terms, "Net 30");
        assert_eq!(draft.shipping_terms, "FOB");
        assert_eq!(draft.products[0].product_name, "Widget");
        assert_eq!(draft.products[0].unit_price, "2.5");
        assert_eq!(draft.products[0].amount, "25");
        assert_eq!(draft.format_type, FormatType::Generic);
    }

    #[test]
    fn test_fill_missing_from() {
        let mut draft = DraftRecord::for_format(FormatType::Generic);
        draft.po_number = "A-1".to_string();

        let mut other = DraftRecord::for_format(FormatType::Format2);
        other.po_number = "B-2".to_string();
        other.destination = "Osaka".to_string();
        other.products.push(DraftProduct::new("Bolt", "1", "2", "2"));

        draft.fill_missing_from(&other);
        assert_eq!(draft.po_number, "A-1");
        assert_eq!(draft.destination, "Osaka");
        assert_eq!(draft.products.len(), 1);
        assert_eq!(draft.format_type, FormatType::Generic);
    }

    #[test]
    fn test_draft_product_signal() {
        assert!(!DraftProduct::default().has_signal());
        assert!(DraftProduct::new("", "3", "", "").has_signal());
    }
}
