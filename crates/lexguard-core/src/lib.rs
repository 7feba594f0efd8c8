//! # lexguard-core
//!
//! Deterministic validation of generated answers about Indonesian law.
//!
//! Given a user query and a candidate answer, lexguard decides whether the
//! answer is safe and trustworthy enough to return, and explains why:
//! - Is it about Indonesian law at all?
//! - Does it cite its legal sources?
//! - Does it contradict known legal text, or itself?
//! - Does it coach anyone to break the law?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same input, same result (apart from `validated_at`)
//! 2. **Rule-based**: no model calls, no I/O during validation
//! 3. **Fail-closed**: a broken check or aggregation never yields a valid result
//! 4. **Order-stable**: issues follow check-definition order, not completion order
//!
//! ## Example
//!
//! ```rust,ignore
//! use lexguard_core::{generate_error_message, validate_response, KnowledgeBase};
//!
//! let knowledge = KnowledgeBase::builtin()?;
//! let result = validate_response(&knowledge, query, answer);
//!
//! if result.is_valid {
//!     println!("{} (confidence {:.0})", result.validated_text, result.confidence);
//! } else {
//!     println!("{}", generate_error_message(&result));
//! }
//! ```

pub mod aggregator;
pub mod checks;
pub mod citation;
pub mod knowledge;
pub mod messages;
pub mod text;
pub mod types;
pub mod validator;

// Re-export main types at crate root
pub use aggregator::Aggregator;
pub use checks::{
    default_checks, run_isolated, Check, CompletenessCheck, FactConsistencyCheck,
    LogicalConsistencyCheck, QualityCheck, SafetyCheck, SourceCitationCheck, TopicRelevanceCheck,
};
pub use citation::{classify, extract_citations, is_valid_citation, CitationFamily, LegalSource};
pub use knowledge::{KnowledgeBase, KnowledgeError, Thresholds};
pub use messages::{
    build_suggestions, generate_error_message, generate_error_message_in, primary_suggestion,
    Locale,
};
pub use types::{
    CheckKind, CheckOutcome, CheckScore, IssueType, Severity, ValidationIssue, ValidationResult,
    CHECK_MAX_SCORE,
};
pub use validator::Validator;

use thiserror::Error;

/// Errors that can occur while aggregating check outcomes.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("No checks were run")]
    NoChecks,

    #[error("Check {check} reported a corrupt score: {reason}")]
    CorruptScore { check: CheckKind, reason: String },
}

/// Validate a response with the seven standard checks.
///
/// This is the main entry point. It never fails: any internal error is
/// reported as an invalid result with zero confidence.
///
/// # Arguments
///
/// * `knowledge` - The knowledge base to check against
/// * `query` - What the user asked
/// * `response` - The candidate answer
pub fn validate_response(knowledge: &KnowledgeBase, query: &str, response: &str) -> ValidationResult {
    Validator::new(knowledge).validate(query, response)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOM_KB: &str = r#"
version: "test"
domains:
  - name: pidana
    citations:
      "KUHP Pasal 362": "Barang siapa mengambil barang sesuatu, yang seluruhnya atau sebagian kepunyaan orang lain, dengan maksud untuk dimiliki secara melawan hukum, diancam karena pencurian."
keywords:
  positive: [pidana, pencurian, hukum, pasal, kuhp, penjara]
  negative: [resep]
"#;

    #[test]
    fn test_basic_validation() {
        let knowledge = KnowledgeBase::from_yaml(CUSTOM_KB).unwrap();
        let result = validate_response(
            &knowledge,
            "Apa sanksi pidana untuk pencurian?",
            "Berdasarkan KUHP Pasal 362, pencurian diancam dengan pidana penjara paling lama lima tahun.",
        );
        assert!(result.sources.contains(&"KUHP Pasal 362".to_string()));
        assert!(result.confidence >= 0.0 && result.confidence <= 100.0);
    }

    #[test]
    fn test_off_topic_rejected() {
        let knowledge = KnowledgeBase::builtin().unwrap();
        let result = validate_response(
            &knowledge,
            "Resep nasi goreng?",
            "Tumis bumbu, masukkan nasi, aduk rata.",
        );
        assert!(!result.is_valid);
        assert!(result.has_issue(IssueType::TopicIrrelevant, Severity::Critical));
        assert!(!generate_error_message(&result).is_empty());
    }
}
