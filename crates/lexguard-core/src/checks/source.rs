//! Source Citation Check
//!
//! **Question**: Does the answer cite its legal sources?
//!
//! Scans the response only. One citation is expected per
//! `chars_per_expected_citation` characters (at least one), and the score is
//! the fraction of that expectation met, capped at 10.

use crate::citation::{extract_citations, is_valid_citation};
use crate::knowledge::KnowledgeBase;
use crate::text::char_len;
use crate::types::{CheckKind, CheckOutcome, IssueType, Severity, ValidationIssue, CHECK_MAX_SCORE};

use super::Check;

const CITE_STATUTES: &str =
    "Sertakan rujukan peraturan yang spesifik, misalnya KUHP Pasal 362 atau UU No. 13 Tahun 2003.";

/// The Source Citation check.
pub struct SourceCitationCheck;

impl SourceCitationCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SourceCitationCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for SourceCitationCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::SourceCitation
    }

    fn run(&self, _query: &str, response: &str, knowledge: &KnowledgeBase) -> CheckOutcome {
        let per_citation = knowledge.thresholds.chars_per_expected_citation.max(1);
        let citations = extract_citations(response);
        let expected = (char_len(response) / per_citation).max(1);

        let mut outcome = CheckOutcome::full(self.kind());
        outcome.sources = citations.iter().map(|c| c.full_citation.clone()).collect();

        if citations.is_empty() {
            outcome.score = 0.0;
            outcome.push(
                ValidationIssue::new(
                    IssueType::MissingSource,
                    Severity::Critical,
                    "Jawaban tidak menyertakan rujukan hukum apa pun",
                )
                .with_suggestion(CITE_STATUTES),
            );
            return outcome;
        }

        outcome.score = (CHECK_MAX_SCORE * citations.len() as f64 / expected as f64).min(CHECK_MAX_SCORE);

        if citations.len() < expected {
            outcome.push(
                ValidationIssue::new(
                    IssueType::MissingSource,
                    Severity::Medium,
                    format!(
                        "Rujukan hukum kurang memadai ({} dari {} yang diharapkan)",
                        citations.len(),
                        expected
                    ),
                )
                .with_suggestion("Tambahkan rujukan pasal untuk setiap klaim hukum utama."),
            );
        }

        for citation in citations.iter().filter(|c| !is_valid_citation(&c.full_citation)) {
            outcome.push(ValidationIssue::new(
                IssueType::MissingSource,
                Severity::Low,
                format!("Format rujukan tidak dikenali: {}", citation.full_citation),
            ));
        }

        outcome
    }
}
