//! Purchase-order layout profiles.
//!
//! A profile owns the classification features and the field recipes of one
//! layout. Profiles are stateless and never call into each other; the
//! standard set is built once and shared by every extraction.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::models::order::{DraftRecord, FormatType};

use super::rules::patterns::*;
use super::rules::{detect_currency, first_capture, recover_products, ProductStrategy};

/// Where a classification feature is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureScope {
    /// Anywhere in the text.
    Anywhere,
    /// Only within the first `head_lines` lines.
    Head,
}

/// A weighted diagnostic pattern used by the classifier.
#[derive(Debug, Clone, Copy)]
pub struct Feature {
    pub name: &'static str,
    pub pattern: &'static Regex,
    pub weight: u32,
    pub scope: FeatureScope,
}

impl Feature {
    pub fn anywhere(name: &'static str, pattern: &'static Regex, weight: u32) -> Self {
        Self {
            name,
            pattern,
            weight,
            scope: FeatureScope::Anywhere,
        }
    }

    pub fn in_head(name: &'static str, pattern: &'static Regex, weight: u32) -> Self {
        Self {
            name,
            pattern,
            weight,
            scope: FeatureScope::Head,
        }
    }

    /// Test the feature against the full text or its head, per scope.
    pub fn matches(&self, text: &str, head: &str) -> bool {
        match self.scope {
            FeatureScope::Anywhere => self.pattern.is_match(text),
            FeatureScope::Head => self.pattern.is_match(head),
        }
    }
}

/// Ordered candidate patterns for each header field.
#[derive(Debug, Clone, Copy)]
pub struct FieldPatterns {
    pub customer: &'static [Regex],
    pub po_number: &'static [Regex],
    pub destination: &'static [Regex],
    pub payment_terms: &'static [Regex],
    pub shipping_terms: &'static [Regex],
    pub total_amount: &'static [Regex],
}

/// A document layout: how to recognize it and how to read it.
pub trait TemplateProfile: Send + Sync {
    /// Tag returned by the classifier for this layout.
    fn format_type(&self) -> FormatType;

    /// Weighted diagnostic features, in declaration order.
    fn classify_features(&self) -> Vec<Feature>;

    /// Header field recipes.
    fn field_patterns(&self) -> FieldPatterns;

    /// Product recovery strategies, most trusted first.
    fn product_strategies(&self) -> Vec<ProductStrategy>;

    /// Currency assumed when the text names none.
    fn default_currency(&self) -> Option<&'static str> {
        None
    }

    /// Highest score the classifier can award this profile.
    fn max_score(&self) -> u32 {
        self.classify_features().iter().map(|f| f.weight).sum()
    }

    /// Run the recipe. Fields that no pattern matches stay empty.
    fn extract(&self, text: &str) -> DraftRecord {
        let fields = self.field_patterns();
        let capture = |patterns: &[Regex]| first_capture(text, patterns).unwrap_or_default();

        let draft = DraftRecord {
            customer_name: capture(fields.customer),
            po_number: capture(fields.po_number),
            currency: detect_currency(text)
                .or_else(|| self.default_currency().map(String::from))
                .unwrap_or_default(),
            payment_terms: capture(fields.payment_terms),
            shipping_terms: capture(fields.shipping_terms),
            destination: capture(fields.destination),
            total_amount: capture(fields.total_amount),
            products: recover_products(text, &self.product_strategies()),
            format_type: self.format_type(),
        };

        debug!(
            "{} recipe: customer={:?} po={:?} products={}",
            self.format_type(),
            draft.customer_name,
            draft.po_number,
            draft.products.len()
        );

        draft
    }
}

/// "Buyer's Info" block with consignee and port details.
#[derive(Debug, Clone, Copy, Default)]
pub struct Format1Profile;

impl TemplateProfile for Format1Profile {
    fn format_type(&self) -> FormatType {
        FormatType::Format1
    }

    fn classify_features(&self) -> Vec<Feature> {
        vec![
            Feature::anywhere("buyer's info", &FEATURE_BUYERS_INFO, 3),
            Feature::anywhere("consignee / port of loading", &FEATURE_CONSIGNEE, 1),
        ]
    }

    fn field_patterns(&self) -> FieldPatterns {
        FieldPatterns {
            customer: &F1_CUSTOMER,
            po_number: &F1_PO_NUMBER,
            destination: &F1_DESTINATION,
            payment_terms: &F1_PAYMENT_TERMS,
            shipping_terms: &F1_SHIPPING_TERMS,
            total_amount: &TOTAL_AMOUNT,
        }
    }

    fn product_strategies(&self) -> Vec<ProductStrategy> {
        vec![
            ProductStrategy::Section(&F1_TABLE),
            ProductStrategy::NumericColumns,
            ProductStrategy::KeyValue,
        ]
    }
}

/// "Purchase Order" title with Bill To / Ship To blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Format2Profile;

impl TemplateProfile for Format2Profile {
    fn format_type(&self) -> FormatType {
        FormatType::Format2
    }

    fn classify_features(&self) -> Vec<Feature> {
        vec![
            Feature::in_head("purchase order title", &FEATURE_PURCHASE_ORDER, 3),
            Feature::anywhere("bill to / ship to", &FEATURE_BILL_SHIP_TO, 1),
        ]
    }

    fn field_patterns(&self) -> FieldPatterns {
        FieldPatterns {
            customer: &F2_CUSTOMER,
            po_number: &F2_PO_NUMBER,
            destination: &F2_DESTINATION,
            payment_terms: &F2_PAYMENT_TERMS,
            shipping_terms: &F2_SHIPPING_TERMS,
            total_amount: &TOTAL_AMOUNT,
        }
    }

    fn product_strategies(&self) -> Vec<ProductStrategy> {
        vec![
            ProductStrategy::Section(&F2_TABLE),
            ProductStrategy::NumericColumns,
            ProductStrategy::KeyValue,
        ]
    }
}

/// "/// ORDER CONFIRMATION ///" banner with graded commodity specs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Format3Profile;

impl TemplateProfile for Format3Profile {
    fn format_type(&self) -> FormatType {
        FormatType::Format3
    }

    fn classify_features(&self) -> Vec<Feature> {
        vec![
            Feature::anywhere("order confirmation banner", &FEATURE_CONFIRMATION_BANNER, 5),
            Feature::anywhere("confirmation", &FEATURE_CONFIRMATION, 1),
        ]
    }

    fn field_patterns(&self) -> FieldPatterns {
        FieldPatterns {
            customer: &F3_CUSTOMER,
            po_number: &F3_PO_NUMBER,
            destination: &F3_DESTINATION,
            payment_terms: &F3_PAYMENT_TERMS,
            shipping_terms: &F3_SHIPPING_TERMS,
            total_amount: &F3_TOTAL_AMOUNT,
        }
    }

    fn product_strategies(&self) -> Vec<ProductStrategy> {
        vec![
            ProductStrategy::Labeled(&F3_GRADE_SPEC),
            ProductStrategy::KeyValue,
        ]
    }

    fn default_currency(&self) -> Option<&'static str> {
        Some("USD")
    }
}

/// Loose label-based recipe for unrecognized layouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericProfile;

impl TemplateProfile for GenericProfile {
    fn format_type(&self) -> FormatType {
        FormatType::Generic
    }

    fn classify_features(&self) -> Vec<Feature> {
        Vec::new()
    }

    fn field_patterns(&self) -> FieldPatterns {
        FieldPatterns {
            customer: &GENERIC_CUSTOMER,
            po_number: &GENERIC_PO_NUMBER,
            destination: &GENERIC_DESTINATION,
            payment_terms: &GENERIC_PAYMENT_TERMS,
            shipping_terms: &GENERIC_SHIPPING_TERMS,
            total_amount: &GENERIC_TOTAL_AMOUNT,
        }
    }

    fn product_strategies(&self) -> Vec<ProductStrategy> {
        vec![
            ProductStrategy::Rows(&GENERIC_ROWS),
            ProductStrategy::NumericColumns,
            ProductStrategy::KeyValue,
        ]
    }
}

/// The profiles known to a parser, in classifier priority order, plus the
/// generic fallback.
pub struct TemplateSet {
    profiles: Vec<Box<dyn TemplateProfile>>,
    generic: Box<dyn TemplateProfile>,
}

impl TemplateSet {
    /// An empty set that only knows the given fallback.
    pub fn new(generic: Box<dyn TemplateProfile>) -> Self {
        Self {
            profiles: Vec::new(),
            generic,
        }
    }

    /// format1, format2, format3 and the generic fallback.
    pub fn standard() -> Self {
        Self::new(Box::new(GenericProfile))
            .with_profile(Box::new(Format1Profile))
            .with_profile(Box::new(Format2Profile))
            .with_profile(Box::new(Format3Profile))
    }

    /// Append a profile. Earlier profiles win classifier ties.
    pub fn with_profile(mut self, profile: Box<dyn TemplateProfile>) -> Self {
        self.profiles.push(profile);
        self
    }

    /// Specific profiles in priority order.
    pub fn profiles(&self) -> &[Box<dyn TemplateProfile>] {
        &self.profiles
    }

    pub fn generic(&self) -> &dyn TemplateProfile {
        self.generic.as_ref()
    }

    /// Profile for a classifier tag; unknown tags resolve to the fallback.
    pub fn get(&self, format_type: FormatType) -> &dyn TemplateProfile {
        match self.profiles.iter().find(|p| p.format_type() == format_type) {
            Some(profile) => profile.as_ref(),
            None => self.generic.as_ref(),
        }
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for TemplateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateSet")
            .field(
                "profiles",
                &self.profiles.iter().map(|p| p.format_type()).collect::<Vec<_>>(),
            )
            .field("generic", &self.generic.format_type())
            .finish()
    }
}

lazy_static! {
    /// Built on first use and shared by every parser that does not inject
    /// its own set.
    pub static ref STANDARD_TEMPLATES: Arc<TemplateSet> = Arc::new(TemplateSet::standard());
}
