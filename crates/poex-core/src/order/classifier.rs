//! Weighted-feature layout classifier.

use serde::Serialize;
use tracing::debug;

use crate::models::config::ClassifierConfig;
use crate::models::order::FormatType;

use super::templates::{TemplateProfile, TemplateSet, STANDARD_TEMPLATES};

/// Score of one profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatScore {
    pub format_type: FormatType,
    pub score: u32,
    pub max_score: u32,
    /// Names of the features that matched.
    pub matched: Vec<String>,
}

/// Classifier verdict with the per-profile breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub format_type: FormatType,
    /// Score of the chosen profile; zero for `generic`.
    pub score: u32,
    pub max_score: u32,
    /// `score / max_score`; zero for `generic`.
    pub confidence: f32,
    pub breakdown: Vec<FormatScore>,
}

impl Classification {
    /// Verdict for text that was never scored.
    pub fn unclassified() -> Self {
        Self::generic(Vec::new())
    }

    fn generic(breakdown: Vec<FormatScore>) -> Self {
        Self {
            format_type: FormatType::Generic,
            score: 0,
            max_score: 0,
            confidence: 0.0,
            breakdown,
        }
    }
}

/// Picks the layout whose features score highest.
pub struct FormatClassifier<'a> {
    templates: &'a TemplateSet,
    config: &'a ClassifierConfig,
}

impl<'a> FormatClassifier<'a> {
    pub fn new(templates: &'a TemplateSet, config: &'a ClassifierConfig) -> Self {
        Self { templates, config }
    }

    /// Classify a text. Never fails; anything unrecognized is `generic`.
    pub fn classify(&self, text: &str) -> Classification {
        let head = head_lines(text, self.config.head_lines);

        let breakdown: Vec<FormatScore> = self
            .templates
            .profiles()
            .iter()
            .map(|profile| score_profile(profile.as_ref(), text, head))
            .collect();

        // Strictly highest wins; on ties the earlier profile is kept.
        let best = breakdown.iter().fold(None, |best: Option<&FormatScore>, candidate| {
            match best {
                Some(current) if current.score >= candidate.score => Some(current),
                _ => Some(candidate),
            }
        });

        let Some(best) = best.filter(|b| b.score > 0 && b.max_score > 0) else {
            debug!("No layout features matched; using generic");
            return Classification::generic(breakdown);
        };

        let ratio = best.score as f32 / best.max_score as f32;
        if ratio < self.config.min_score_ratio {
            debug!(
                "Best layout {} scored {}/{} (below {:.2}); using generic",
                best.format_type, best.score, best.max_score, self.config.min_score_ratio
            );
            return Classification::generic(breakdown);
        }

        debug!("Classified as {} ({}/{})", best.format_type, best.score, best.max_score);

        Classification {
            format_type: best.format_type,
            score: best.score,
            max_score: best.max_score,
            confidence: ratio,
            breakdown,
        }
    }
}

/// Classify with the standard profiles and default thresholds.
pub fn classify_format(text: &str) -> Classification {
    let config = ClassifierConfig::default();
    FormatClassifier::new(&STANDARD_TEMPLATES, &config).classify(text)
}

fn score_profile(profile: &dyn TemplateProfile, text: &str, head: &str) -> FormatScore {
    let features = profile.classify_features();
    let mut score = 0;
    let mut matched = Vec::new();

    for feature in &features {
        if feature.matches(text, head) {
            score += feature.weight;
            matched.push(feature.name.to_string());
        }
    }

    FormatScore {
        format_type: profile.format_type(),
        score,
        max_score: features.iter().map(|f| f.weight).sum(),
        matched,
    }
}

/// The prefix of `text` covering its first `n` lines.
fn head_lines(text: &str, n: usize) -> &str {
    match text.match_indices('\n').nth(n.saturating_sub(1)) {
        Some((end, _)) if n > 0 => &text[..end],
        _ if n == 0 => "",
        _ => text,
    }
}
