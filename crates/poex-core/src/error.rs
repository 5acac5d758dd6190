//! Error types for the poex-core library.

use thiserror::Error;

/// Main error type for the poex library.
#[derive(Error, Debug)]
pub enum PoexError {
    /// Purchase-order extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised inside the extraction pipeline.
///
/// None of these ever reach callers of [`crate::extract_po_data`]; the
/// orchestrator turns them into a defaulted record with zero confidence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The input text exceeds the configured size limit.
    #[error("input of {len} bytes exceeds limit of {max} bytes")]
    InputTooLarge { len: usize, max: usize },

    /// An unexpected failure inside a pipeline stage.
    #[error("internal extraction failure: {0}")]
    Internal(String),
}

/// Result type for the poex library.
pub type Result<T> = std::result::Result<T, PoexError>;
