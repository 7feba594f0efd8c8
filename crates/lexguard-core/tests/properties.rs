//! Invariants that must hold for any `(query, response)` pair.

use std::collections::HashSet;
use std::sync::OnceLock;

use lexguard_core::{validate_response, KnowledgeBase, Severity};
use proptest::prelude::*;

fn knowledge() -> &'static KnowledgeBase {
    static KNOWLEDGE: OnceLock<KnowledgeBase> = OnceLock::new();
    KNOWLEDGE.get_or_init(|| KnowledgeBase::builtin().expect("built-in knowledge base loads"))
}

/// Words drawn from legal, off-topic, contradiction, and guarantee vocabulary
/// so generated text actually exercises the checks.
fn word() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("pidana".to_string()),
        Just("pencurian".to_string()),
        Just("dilarang".to_string()),
        Just("diperbolehkan".to_string()),
        Just("wajib".to_string()),
        Just("tidak".to_string()),
        Just("selalu".to_string()),
        Just("dijamin".to_string()),
        Just("menang".to_string()),
        Just("nasi goreng".to_string()),
        Just("cara".to_string()),
        Just("adalah".to_string()),
        Just("KUHP Pasal 362".to_string()),
        Just("UU No. 13 Tahun 2003".to_string()),
        Just("1.".to_string()),
        Just(".".to_string()),
        "[a-z]{1,10}",
    ]
}

fn sentence_text() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 0..40).prop_map(|words| words.join(" "))
}

fn citation() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u32..600).prop_map(|n| format!("KUHP Pasal {}", n)),
        (1u32..2000).prop_map(|n| format!("KUHPerdata Pasal {}", n)),
        (1u32..60, 1945u32..2030).prop_map(|(n, y)| format!("UU No. {} Tahun {}", n, y)),
        (1u32..40).prop_map(|n| format!("UUD 1945 Pasal {}", n)),
    ]
}

proptest! {
    #[test]
    fn confidence_stays_in_range(query in sentence_text(), response in sentence_text()) {
        let result = validate_response(knowledge(), &query, &response);
        prop_assert!(result.confidence >= 0.0 && result.confidence <= 100.0);
    }

    #[test]
    fn validity_implies_threshold_and_no_critical(query in sentence_text(), response in sentence_text()) {
        let result = validate_response(knowledge(), &query, &response);
        if result.is_valid {
            prop_assert!(result.confidence >= 70.0);
            prop_assert!(result.issues.iter().all(|i| i.severity != Severity::Critical));
            prop_assert!(result.suggestions.is_none());
        } else {
            prop_assert!(result.suggestions.is_some());
        }
    }

    #[test]
    fn critical_issue_vetoes_validity(query in sentence_text(), response in sentence_text()) {
        let result = validate_response(knowledge(), &query, &response);
        if result.issues.iter().any(|i| i.severity == Severity::Critical) {
            prop_assert!(!result.is_valid);
        }
    }

    #[test]
    fn sources_have_no_duplicates(query in sentence_text(), response in sentence_text()) {
        let result = validate_response(knowledge(), &query, &response);
        let unique: HashSet<&String> = result.sources.iter().collect();
        prop_assert_eq!(unique.len(), result.sources.len());
    }

    #[test]
    fn verbatim_citation_surfaces_in_sources(
        before in "[a-z ]{0,80}",
        cited in citation(),
        after in "[a-z ]{0,80}",
    ) {
        let response = format!("{} {} {}", before, cited, after);
        let result = validate_response(knowledge(), "Apa dasar hukumnya?", &response);
        prop_assert!(result.sources.contains(&cited), "{:?} not in {:?}", cited, result.sources);
    }

    #[test]
    fn validation_is_deterministic(query in sentence_text(), response in sentence_text()) {
        let first = validate_response(knowledge(), &query, &response);
        let second = validate_response(knowledge(), &query, &response);
        prop_assert!(first.is_equivalent(&second));
    }
}
