//! Scoring constants.
//!
//! These values are empirically tuned, not derived. Changing any of them
//! changes verdicts and must ship as a behaviour-changing release.

use serde::{Deserialize, Serialize};

/// Tunable thresholds used by the checks and the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum confidence (0-100) for a valid answer
    pub validity_threshold: f64,

    /// Response characters per expected citation
    pub chars_per_expected_citation: usize,

    /// Weight of each off-domain keyword against on-domain ones
    pub negative_keyword_weight: f64,

    /// Relevance score below which the query is off-domain
    pub min_relevance: f64,

    /// Similarity to canonical text below which a cited provision is suspect
    pub kb_similarity_floor: f64,

    /// Adjacent-sentence similarity that counts as connected flow
    pub flow_similarity_floor: f64,

    /// Fraction of connected adjacent pairs required
    pub flow_min_ratio: f64,

    /// Sentence similarity above which two sentences repeat each other
    pub repetition_similarity: f64,

    /// Minimum formality score (0-10)
    pub min_formality: f64,

    /// Responses shorter than this many characters are low quality
    pub min_response_chars: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            validity_threshold: 70.0,
            chars_per_expected_citation: 200,
            negative_keyword_weight: 2.0,
            min_relevance: 3.0,
            kb_similarity_floor: 0.3,
            flow_similarity_floor: 0.2,
            flow_min_ratio: 0.3,
            repetition_similarity: 0.8,
            min_formality: 5.0,
            min_response_chars: 50,
        }
    }
}

impl Thresholds {
    /// Reject values that would make scoring meaningless.
    pub(crate) fn check(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.validity_threshold) {
            return Err(format!(
                "validity_threshold must be within 0..=100, got {}",
                self.validity_threshold
            ));
        }
        if self.chars_per_expected_citation == 0 {
            return Err("chars_per_expected_citation must be positive".to_string());
        }
        for (name, value) in [
            ("kb_similarity_floor", self.kb_similarity_floor),
            ("flow_similarity_floor", self.flow_similarity_floor),
            ("flow_min_ratio", self.flow_min_ratio),
            ("repetition_similarity", self.repetition_similarity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be within 0..=1, got {}", name, value));
            }
        }
        Ok(())
    }
}
