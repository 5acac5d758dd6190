//! Configuration structures for the extraction pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PoexError, Result};

/// Main configuration for the poex pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Format classifier configuration.
    pub classifier: ClassifierConfig,

    /// Validator/cleaner configuration.
    pub validation: ValidationConfig,

    /// Quality scorer configuration.
    pub quality: QualityConfig,

    /// Inputs larger than this are rejected with a defaulted record.
    pub max_input_bytes: usize,
}

/// Format classifier configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Minimum ratio of the winning score to that profile's maximum
    /// attainable score (0.0 - 1.0). Below it the text is `generic`.
    pub min_score_ratio: f32,

    /// Number of leading lines searched by positional features.
    pub head_lines: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_score_ratio: 0.25,
            head_lines: 10,
        }
    }
}

/// Validator/cleaner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Sentinel for a missing customer name.
    pub unknown_customer: String,

    /// Sentinel for a missing PO number.
    pub missing_po_number: String,

    /// Sentinel name for the placeholder product line.
    pub unknown_product: String,

    /// Currency used when none was detected.
    pub default_currency: String,

    /// Decimal places kept when a division derives a price or quantity.
    pub derivation_scale: u32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            unknown_customer: "Unknown Customer".to_string(),
            missing_po_number: "N/A".to_string(),
            unknown_product: "Unknown Product".to_string(),
            default_currency: "USD".to_string(),
            derivation_scale: 6,
        }
    }
}

/// Quality scorer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Completeness below this adds a manual-review suggestion.
    pub review_threshold: f32,

    /// Upper bound of `extraction_confidence`; the remainder is left to
    /// human review.
    pub confidence_ceiling: f32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            review_threshold: 0.5,
            confidence_ceiling: 0.8,
        }
    }
}

impl ExtractionConfig {
    /// Default size limit for input text (1 MiB).
    pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;

    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values outside their meaningful range.
    pub fn check(&self) -> Result<()> {
        let ratios = [
            ("classifier.min_score_ratio", self.classifier.min_score_ratio),
            ("quality.review_threshold", self.quality.review_threshold),
            ("quality.confidence_ceiling", self.quality.confidence_ceiling),
        ];
        for (key, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(PoexError::Config(format!(
                    "{key} must be between 0 and 1, got {value}"
                )));
            }
        }

        if self.max_input_bytes == 0 {
            return Err(PoexError::Config(
                "max_input_bytes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Look up a value by dotted key, e.g. `classifier.head_lines`.
    pub fn get_value(&self, key: &str) -> Result<serde_json::Value> {
        let json = serde_json::to_value(self)?;
        key.split('.')
            .try_fold(&json, |current, part| current.get(part))
            .cloned()
            .ok_or_else(|| PoexError::Config(format!("configuration key not found: {key}")))
    }

    /// Set a value by dotted key. `raw` is parsed as JSON, falling back to a
    /// plain string.
    pub fn set_value(&mut self, key: &str, raw: &str) -> Result<()> {
        let parsed: serde_json::Value = serde_json::from_str(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));

        let mut json = serde_json::to_value(&*self)?;
        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };

        let mut current = &mut json;
        for part in parent_path.into_iter().flat_map(|p| p.split('.')) {
            current = current
                .get_mut(part)
                .ok_or_else(|| PoexError::Config(format!("configuration key not found: {key}")))?;
        }

        let object = current
            .as_object_mut()
            .filter(|obj| obj.contains_key(leaf))
            .ok_or_else(|| PoexError::Config(format!("configuration key not found: {key}")))?;
        object.insert(leaf.to_string(), parsed);

        let updated: Self = serde_json::from_value(json)
            .map_err(|e| PoexError::Config(format!("invalid value for {key}: {e}")))?;
        updated.check()?;
        *self = updated;
        Ok(())
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            validation: ValidationConfig::default(),
            quality: QualityConfig::default(),
            max_input_bytes: Self::DEFAULT_MAX_INPUT_BYTES,
        }
    }
}
