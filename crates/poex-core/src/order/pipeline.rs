//! Extraction orchestrator: classify, extract, validate, score.

use std::any::Any;
use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::order::{DraftRecord, ExtractionResult, FormatType, RecordStatus};

use super::classifier::{Classification, FormatClassifier};
use super::quality::{extraction_stats, score, ExtractionStats, QualityReport};
use super::templates::{TemplateSet, STANDARD_TEMPLATES};
use super::validate::validate;

/// Non-fatal findings and recovered failures of one extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub warnings: Vec<String>,
    /// Set when the record was produced by the error boundary.
    pub errors: Vec<String>,
    /// The generic recipe replaced the classified one.
    pub fallback_used: bool,
}

/// Everything one extraction produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionOutcome {
    pub result: ExtractionResult,
    pub classification: Classification,
    pub quality: QualityReport,
    pub stats: ExtractionStats,
    pub diagnostics: Diagnostics,
}

impl ExtractionOutcome {
    pub fn is_error(&self) -> bool {
        self.result.status == RecordStatus::Error
    }
}

/// Purchase-order parser.
///
/// Holds only immutable configuration, so one instance can serve any number
/// of threads.
#[derive(Debug, Clone)]
pub struct PoParser {
    config: ExtractionConfig,
    templates: Arc<TemplateSet>,
}

impl PoParser {
    /// Create a parser with default settings and the standard layouts.
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
            templates: Arc::clone(&STANDARD_TEMPLATES),
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the layout profiles.
    pub fn with_templates(mut self, templates: Arc<TemplateSet>) -> Self {
        self.templates = templates;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Classify a text without extracting it.
    pub fn classify(&self, text: &str) -> Classification {
        FormatClassifier::new(&self.templates, &self.config.classifier).classify(text)
    }

    /// Extract a record, reporting pipeline failures as errors.
    pub fn try_parse(&self, text: &str) -> Result<ExtractionOutcome, ExtractionError> {
        if text.len() > self.config.max_input_bytes {
            return Err(ExtractionError::InputTooLarge {
                len: text.len(),
                max: self.config.max_input_bytes,
            });
        }

        info!("Extracting purchase order from {} bytes of text", text.len());

        let text = normalize_line_endings(text);
        let classification = self.classify(&text);
        let mut diagnostics = Diagnostics::default();

        let mut draft = self.templates.get(classification.format_type).extract(&text);

        if classification.format_type != FormatType::Generic && draft.lacks_identity() {
            warn!(
                "{} recipe found neither customer nor PO number; retrying with generic patterns",
                classification.format_type
            );
            draft = self.generic_fallback(&text, &draft);
            diagnostics.fallback_used = true;
            diagnostics.warnings.push(format!(
                "{} recipe recovered no customer or PO number; generic patterns used",
                classification.format_type
            ));
        }

        let mut result = validate(&draft, &self.config.validation);
        let quality = score(&result, &self.config);
        result.extraction_confidence = quality.confidence;
        let stats = extraction_stats(&text, &result, &quality);

        info!(
            "Extracted PO {:?} as {} with {} products (confidence {:.2})",
            result.po_number,
            result.format_type,
            result.products.len(),
            result.extraction_confidence
        );

        Ok(ExtractionOutcome {
            result,
            classification,
            quality,
            stats,
            diagnostics,
        })
    }

    /// Extract a record. Never fails: errors and panics inside the pipeline
    /// yield a defaulted record with status `error` and zero confidence.
    pub fn parse(&self, text: &str) -> ExtractionOutcome {
        match panic::catch_unwind(AssertUnwindSafe(|| self.try_parse(text))) {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                warn!("Extraction failed: {}", e);
                self.failed_outcome(text, e.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("Extraction panicked: {}", message);
                self.failed_outcome(text, ExtractionError::Internal(message).to_string())
            }
        }
    }

    fn generic_fallback(&self, text: &str, specific: &DraftRecord) -> DraftRecord {
        let mut draft = self.templates.generic().extract(text);
        draft.fill_missing_from(specific);
        draft.format_type = FormatType::Generic;
        debug!(
            "Generic fallback: customer={:?} po={:?}",
            draft.customer_name, draft.po_number
        );
        draft
    }

    fn failed_outcome(&self, text: &str, message: String) -> ExtractionOutcome {
        let mut result = validate(&DraftRecord::default(), &self.config.validation);
        result.status = RecordStatus::Error;
        result.extraction_confidence = 0.0;

        let mut quality = score(&result, &self.config);
        quality.confidence = 0.0;
        let stats = extraction_stats(text, &result, &quality);

        ExtractionOutcome {
            result,
            classification: Classification::unclassified(),
            quality,
            stats,
            diagnostics: Diagnostics {
                errors: vec![message],
                ..Default::default()
            },
        }
    }
}

impl Default for PoParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract a purchase order from OCR text with default settings.
pub fn extract_po_data(text: &str) -> ExtractionOutcome {
    PoParser::new().parse(text)
}

fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::ProductLine;
    use crate::order::rules::ProductStrategy;
    use crate::order::templates::{Feature, FieldPatterns, GenericProfile, TemplateProfile};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generic_fallback_on_missing_identity() {
        let text = "Consignee: Harbor Depot\nClient: Zeta Holdings\nOrder #: 5521\n";
        let outcome = PoParser::new().parse(text);

        assert_eq!(outcome.classification.format_type, FormatType::Format1);
        assert_eq!(outcome.result.format_type, FormatType::Generic);
        assert_eq!(outcome.result.customer_name, "Zeta Holdings");
        assert_eq!(outcome.result.po_number, "5521");
        assert!(outcome.diagnostics.fallback_used);
        assert_eq!(outcome.diagnostics.warnings.len(), 1);
    }

    #[test]
    fn test_input_too_large() {
        let config = ExtractionConfig {
            max_input_bytes: 10,
            ..Default::default()
        };
        let parser = PoParser::new().with_config(config);

        assert_eq!(
            parser.try_parse("Purchase Order 1234"),
            Err(ExtractionError::InputTooLarge { len: 19, max: 10 })
        );

        let outcome = parser.parse("Purchase Order 1234");
        assert!(outcome.is_error());
        assert_eq!(outcome.result.extraction_confidence, 0.0);
        assert_eq!(outcome.quality.confidence, 0.0);
        assert_eq!(outcome.result.products.len(), 1);
        assert_eq!(outcome.diagnostics.errors.len(), 1);
    }

    #[test]
    fn test_crlf_input() {
        let text = "Purchase Order No: PO-7\r\nBill To: Acme Corp\r\n";
        let outcome = PoParser::new().parse(text);
        assert_eq!(outcome.result.customer_name, "Acme Corp");
        assert_eq!(outcome.result.po_number, "PO-7");
    }

    struct PanickingProfile;

    impl TemplateProfile for PanickingProfile {
        fn format_type(&self) -> FormatType {
            FormatType::Generic
        }

        fn classify_features(&self) -> Vec<Feature> {
            Vec::new()
        }

        fn field_patterns(&self) -> FieldPatterns {
            GenericProfile.field_patterns()
        }

        fn product_strategies(&self) -> Vec<ProductStrategy> {
            Vec::new()
        }

        fn extract(&self, _text: &str) -> DraftRecord {
            panic!("recipe bug")
        }
    }

    #[test]
    fn test_panic_is_contained() {
        let templates = Arc::new(TemplateSet::new(Box::new(PanickingProfile)));
        let outcome = PoParser::new().with_templates(templates).parse("anything");

        assert!(outcome.is_error());
        assert_eq!(outcome.result.customer_name, "Unknown Customer");
        assert_eq!(
            outcome.diagnostics.errors,
            vec!["internal extraction failure: recipe bug".to_string()]
        );
    }

    #[test]
    fn test_confidence_comes_from_quality() {
        let text = "\
Purchase Order No: PO-2024-001
Bill To: Acme Corp
Item  Qty  Price  Amount
Widget A  10  2.50  25.00
Total: 25.00
";
        let outcome = extract_po_data(text);
        assert_eq!(outcome.result.extraction_confidence, outcome.quality.confidence);
        assert_eq!(outcome.result.status, RecordStatus::Pending);
        assert_eq!(
            outcome.result.products[0],
            ProductLine {
                name: "Widget A".to_string(),
                product_name: "Widget A".to_string(),
                quantity: "10".to_string(),
                unit_price: "2.50".to_string(),
                subtotal: "25.00".to_string(),
                amount: "25.00".to_string(),
            }
        );
    }
}
