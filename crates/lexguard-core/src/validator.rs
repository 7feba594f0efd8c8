//! Validation orchestrator.
//!
//! Runs every check against one `(query, response)` pair and hands the
//! outcomes to the [`Aggregator`]. Checks run sequentially here; the
//! runtime crate runs the same checks concurrently and reuses the same
//! aggregation, so both paths agree.

use std::sync::Arc;

use crate::aggregator::Aggregator;
use crate::checks::{default_checks, run_isolated, Check};
use crate::knowledge::KnowledgeBase;
use crate::types::ValidationResult;
use crate::ValidationError;

/// Validates responses against a borrowed knowledge base.
pub struct Validator<'kb> {
    knowledge: &'kb KnowledgeBase,
    checks: Vec<Arc<dyn Check>>,
    aggregator: Aggregator,
}

impl<'kb> Validator<'kb> {
    /// A validator running the seven standard checks.
    pub fn new(knowledge: &'kb KnowledgeBase) -> Self {
        Self::with_checks(knowledge, default_checks())
    }

    /// A validator running a custom set of checks.
    pub fn with_checks(knowledge: &'kb KnowledgeBase, checks: Vec<Arc<dyn Check>>) -> Self {
        Self {
            knowledge,
            checks,
            aggregator: Aggregator::new(&knowledge.thresholds),
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        self.knowledge
    }

    /// Validate, reporting internal failures as errors.
    pub fn try_validate(&self, query: &str, response: &str) -> Result<ValidationResult, ValidationError> {
        if response.trim().is_empty() {
            tracing::info!("Empty response, skipping checks");
            return Ok(self.aggregator.empty_response(response));
        }

        let outcomes = self
            .checks
            .iter()
            .map(|check| run_isolated(check.as_ref(), query, response, self.knowledge))
            .collect();

        let result = self.aggregator.aggregate(response, outcomes)?;
        tracing::info!(
            valid = result.is_valid,
            confidence = result.confidence,
            issues = result.issues.len(),
            sources = result.sources.len(),
            "Validation complete"
        );
        Ok(result)
    }

    /// Validate. Never fails: internal errors yield the fail-closed result.
    pub fn validate(&self, query: &str, response: &str) -> ValidationResult {
        match self.try_validate(query, response) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, "Validation failed, returning fallback result");
                self.aggregator.fallback(response, &err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CheckKind, CheckOutcome, IssueType};

    struct BrokenScoreCheck;

    impl Check for BrokenScoreCheck {
        fn kind(&self) -> CheckKind {
            CheckKind::Quality
        }

        fn run(&self, _: &str, _: &str, _: &KnowledgeBase) -> CheckOutcome {
            let mut outcome = CheckOutcome::full(CheckKind::Quality);
            outcome.score = f64::INFINITY;
            outcome
        }
    }

    struct PanickingCheck;

    impl Check for PanickingCheck {
        fn kind(&self) -> CheckKind {
            CheckKind::FactConsistency
        }

        fn run(&self, _: &str, _: &str, _: &KnowledgeBase) -> CheckOutcome {
            panic!("index out of range")
        }
    }

    #[test]
    fn test_valid_answer() {
        let kb = KnowledgeBase::builtin().unwrap();
        let result = Validator::new(&kb).validate(
            "Apa sanksi pidana untuk pencurian?",
            "Berdasarkan KUHP Pasal 362, pencurian diancam dengan pidana penjara paling lama lima tahun...",
        );
        assert!(result.is_valid);
        assert!(result.confidence > 70.0);
        assert_eq!(result.checks.len(), 7);
    }

    #[test]
    fn test_whitespace_response_short_circuits() {
        let kb = KnowledgeBase::builtin().unwrap();
        let result = Validator::new(&kb).validate("Apa itu KUHP?", "   \n ");
        assert!(!result.is_valid);
        assert_eq!(result.confidence, 0.0);
        assert!(result.checks.is_empty());
        assert!(result.suggestions.is_some());
    }

    #[test]
    fn test_corrupt_outcome_falls_back() {
        let kb = KnowledgeBase::builtin().unwrap();
        let validator = Validator::with_checks(&kb, vec![Arc::new(BrokenScoreCheck)]);
        assert!(validator.try_validate("q", "jawaban").is_err());

        let result = validator.validate("q", "jawaban");
        assert!(!result.is_valid);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.issues.len(), 1);
        assert!(result.issues[0].severity.is_critical());
    }

    #[test]
    fn test_panicking_check_is_isolated() {
        let kb = KnowledgeBase::builtin().unwrap();
        let mut checks = default_checks();
        checks[2] = Arc::new(PanickingCheck);
        let result = Validator::with_checks(&kb, checks).validate(
            "Apa sanksi pidana untuk pencurian?",
            "Berdasarkan KUHP Pasal 362, pencurian diancam dengan pidana penjara paling lama lima tahun...",
        );
        assert!(!result.is_valid);
        assert_eq!(result.check_score(CheckKind::FactConsistency), Some(0.0));
        assert_eq!(result.check_score(CheckKind::SourceCitation), Some(10.0));
        assert!(result
            .issues
            .iter()
            .any(|i| i.issue_type == IssueType::Hallucination && i.severity.is_critical()));
        assert_eq!(result.sources, vec!["KUHP Pasal 362"]);
    }
}
