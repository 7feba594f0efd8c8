//! The seven validation checks.
//!
//! Each check is a pure function of `(query, response, knowledge)` that
//! returns a [`CheckOutcome`]. Checks share no state, perform no I/O, and
//! may run in any order or concurrently; the aggregator restores
//! definition order.
//!
//! | Check | Issue type | Starts at |
//! |-------|------------|-----------|
//! | [`TopicRelevanceCheck`] | `TOPIC_IRRELEVANT` | computed |
//! | [`SourceCitationCheck`] | `MISSING_SOURCE` | computed |
//! | [`FactConsistencyCheck`] | `HALLUCINATION` | 10, deducts |
//! | [`LogicalConsistencyCheck`] | `INCONSISTENCY` | 10, deducts |
//! | [`CompletenessCheck`] | `INCOMPLETE` | 10, deducts |
//! | [`SafetyCheck`] | `UNSAFE_CONTENT` | 10, deducts |
//! | [`QualityCheck`] | `LOW_QUALITY` | 10, deducts |

mod completeness;
mod fact;
mod logic;
mod quality;
mod safety;
mod source;
mod topic;

pub use completeness::CompletenessCheck;
pub use fact::FactConsistencyCheck;
pub use logic::LogicalConsistencyCheck;
pub use quality::QualityCheck;
pub use safety::SafetyCheck;
pub use source::SourceCitationCheck;
pub use topic::TopicRelevanceCheck;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::knowledge::KnowledgeBase;
use crate::types::{CheckKind, CheckOutcome};

/// Uniform capability implemented by every check.
pub trait Check: Send + Sync {
    /// Which check this is.
    fn kind(&self) -> CheckKind;

    /// Evaluate one `(query, response)` pair.
    fn run(&self, query: &str, response: &str, knowledge: &KnowledgeBase) -> CheckOutcome;

    /// The question this check answers.
    fn question(&self) -> &'static str {
        self.kind().question()
    }
}

/// The seven standard checks in definition order.
pub fn default_checks() -> Vec<Arc<dyn Check>> {
    vec![
        Arc::new(TopicRelevanceCheck::new()),
        Arc::new(SourceCitationCheck::new()),
        Arc::new(FactConsistencyCheck::new()),
        Arc::new(LogicalConsistencyCheck::new()),
        Arc::new(CompletenessCheck::new()),
        Arc::new(SafetyCheck::new()),
        Arc::new(QualityCheck::new()),
    ]
}

/// Run a check, turning a panic into a failed outcome for that check only.
pub fn run_isolated(
    check: &dyn Check,
    query: &str,
    response: &str,
    knowledge: &KnowledgeBase,
) -> CheckOutcome {
    let kind = check.kind();
    match panic::catch_unwind(AssertUnwindSafe(|| check.run(query, response, knowledge))) {
        Ok(mut outcome) => {
            // A check may only report under its own name.
            outcome.kind = kind;
            tracing::debug!(
                check = %kind,
                score = outcome.score,
                issues = outcome.issues.len(),
                "Check completed"
            );
            outcome
        }
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            tracing::warn!(check = %kind, reason = %reason, "Check panicked, isolating failure");
            CheckOutcome::failed(kind, reason)
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    struct PanickingCheck;

    impl Check for PanickingCheck {
        fn kind(&self) -> CheckKind {
            CheckKind::Completeness
        }

        fn run(&self, _: &str, _: &str, _: &KnowledgeBase) -> CheckOutcome {
            panic!("table corrupted")
        }
    }

    #[test]
    fn test_default_checks_in_definition_order() {
        let kinds: Vec<CheckKind> = default_checks().iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, CheckKind::all().to_vec());
    }

    #[test]
    fn test_panic_is_isolated() {
        let kb = KnowledgeBase::builtin().unwrap();
        let outcome = run_isolated(&PanickingCheck, "q", "r", &kb);
        assert_eq!(outcome.kind, CheckKind::Completeness);
        assert_eq!(outcome.score, 0.0);
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.issues[0].severity, Severity::Critical);
        assert!(outcome.issues[0].message.contains("table corrupted"));
    }
}
