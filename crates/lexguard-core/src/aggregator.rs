//! Aggregator: folds check outcomes into one verdict.
//!
//! The rules are fixed:
//! 1. `confidence = clamp(100 * sum(score) / sum(max_score), 0, 100)`
//! 2. Any CRITICAL issue makes the result invalid
//! 3. Otherwise the result is valid iff `confidence >= validity_threshold`
//!
//! Outcomes are folded in check-definition order, never completion order,
//! so sequential and concurrent runs produce identical results.

use chrono::Utc;

use crate::knowledge::Thresholds;
use crate::messages::build_suggestions;
use crate::types::{
    CheckOutcome, CheckScore, IssueType, Severity, ValidationIssue, ValidationResult,
};
use crate::ValidationError;

/// The Aggregator turns per-check outcomes into a [`ValidationResult`].
pub struct Aggregator {
    validity_threshold: f64,
}

impl Aggregator {
    pub fn new(thresholds: &Thresholds) -> Self {
        Self {
            validity_threshold: thresholds.validity_threshold,
        }
    }

    /// Aggregate outcomes for `response`.
    ///
    /// Fails only when an outcome is corrupt: a non-finite score, or a
    /// maximum that is not strictly positive.
    pub fn aggregate(
        &self,
        response: &str,
        mut outcomes: Vec<CheckOutcome>,
    ) -> Result<ValidationResult, ValidationError> {
        if outcomes.is_empty() {
            return Err(ValidationError::NoChecks);
        }

        for outcome in &outcomes {
            if !outcome.score.is_finite() || !outcome.max_score.is_finite() {
                return Err(ValidationError::CorruptScore {
                    check: outcome.kind,
                    reason: format!("non-finite score {}/{}", outcome.score, outcome.max_score),
                });
            }
            if outcome.max_score <= 0.0 {
                return Err(ValidationError::CorruptScore {
                    check: outcome.kind,
                    reason: format!("max score {} is not positive", outcome.max_score),
                });
            }
        }

        // Stable: outcomes of the same kind keep their relative order.
        outcomes.sort_by_key(|o| o.kind);

        let total: f64 = outcomes.iter().map(|o| o.score).sum();
        let max_total: f64 = outcomes.iter().map(|o| o.max_score).sum();
        let confidence = (100.0 * total / max_total).clamp(0.0, 100.0);

        let mut issues = Vec::new();
        let mut sources: Vec<String> = Vec::new();
        let mut checks = Vec::with_capacity(outcomes.len());

        for outcome in outcomes {
            checks.push(CheckScore {
                check: outcome.kind,
                score: outcome.score,
                max_score: outcome.max_score,
            });
            issues.extend(outcome.issues);
            for source in outcome.sources {
                if !sources.contains(&source) {
                    sources.push(source);
                }
            }
        }

        let has_critical = issues.iter().any(|i| i.severity.is_critical());
        let is_valid = !has_critical && confidence >= self.validity_threshold;
        let suggestions = (!is_valid).then(|| build_suggestions(&issues));

        Ok(ValidationResult {
            is_valid,
            validated_text: response.to_string(),
            confidence,
            issues,
            sources,
            suggestions,
            checks,
            validated_at: Utc::now(),
        })
    }

    /// Verdict for an empty or whitespace-only response; no check runs.
    pub fn empty_response(&self, response: &str) -> ValidationResult {
        let issues = vec![ValidationIssue::new(
            IssueType::Incomplete,
            Severity::Critical,
            "Jawaban kosong",
        )
        .with_suggestion("Berikan jawaban yang menjawab pertanyaan beserta dasar hukumnya.")];

        ValidationResult {
            is_valid: false,
            validated_text: response.to_string(),
            confidence: 0.0,
            suggestions: Some(build_suggestions(&issues)),
            issues,
            sources: Vec::new(),
            checks: Vec::new(),
            validated_at: Utc::now(),
        }
    }

    /// Fail-closed result used when validation itself broke.
    pub fn fallback(&self, response: &str, reason: &str) -> ValidationResult {
        let issues = vec![ValidationIssue::new(
            IssueType::LowQuality,
            Severity::Critical,
            format!("Validasi gagal karena kesalahan sistem: {}", reason),
        )];

        ValidationResult {
            is_valid: false,
            validated_text: response.to_string(),
            confidence: 0.0,
            suggestions: Some(build_suggestions(&issues)),
            issues,
            sources: Vec::new(),
            checks: Vec::new(),
            validated_at: Utc::now(),
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(&Thresholds::default())
    }
}
