//! Core library for purchase-order OCR text extraction.
//!
//! This crate provides:
//! - Layout classification of raw OCR text (three known layouts plus generic)
//! - Per-layout field and product-line recipes
//! - Locale-aware amount normalization
//! - Validation with sentinel defaults and amount derivation
//! - Completeness and confidence scoring

pub mod error;
pub mod models;
pub mod order;

pub use error::{ExtractionError, PoexError, Result};
pub use models::config::{ClassifierConfig, ExtractionConfig, QualityConfig, ValidationConfig};
pub use models::order::{
    DraftProduct, DraftRecord, ExtractionResult, FormatType, ProductLine, RecordStatus,
};
pub use order::rules::normalize;
pub use order::{
    classify_format, extract_po_data, validate, Classification, Diagnostics, ExtractionOutcome,
    ExtractionStats, PoParser, QualityReport, TemplateSet,
};
