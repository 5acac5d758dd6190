//! Purchase-order classification and field extraction.

pub mod classifier;
pub mod pipeline;
pub mod quality;
pub mod rules;
pub mod templates;
pub mod validate;

pub use classifier::{classify_format, Classification, FormatClassifier, FormatScore};
pub use pipeline::{extract_po_data, Diagnostics, ExtractionOutcome, PoParser};
pub use quality::{extraction_stats, score, ExtractionStats, QualityReport};
pub use templates::{
    Feature, FeatureScope, FieldPatterns, Format1Profile, Format2Profile, Format3Profile,
    GenericProfile, TemplateProfile, TemplateSet, STANDARD_TEMPLATES,
};
pub use validate::validate;
