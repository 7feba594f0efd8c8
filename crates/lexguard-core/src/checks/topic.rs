//! Topic Relevance Check
//!
//! **Question**: Is this about Indonesian law?
//!
//! Counts on-domain and off-domain keyword occurrences in the lower-cased
//! query and response. `relevance = positive - weight * negative`, clamped
//! to `[0, 10]`. Below the minimum relevance the pair is off-domain
//! (CRITICAL); otherwise any off-domain keyword is topic drift (MEDIUM).

use crate::knowledge::KnowledgeBase;
use crate::text::count_occurrences;
use crate::types::{CheckKind, CheckOutcome, IssueType, Severity, ValidationIssue, CHECK_MAX_SCORE};

use super::Check;

/// The Topic Relevance check.
pub struct TopicRelevanceCheck;

impl TopicRelevanceCheck {
    pub fn new() -> Self {
        Self
    }

    fn count(text: &str, keywords: &[String]) -> usize {
        keywords.iter().map(|kw| count_occurrences(text, kw)).sum()
    }
}

impl Default for TopicRelevanceCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for TopicRelevanceCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::TopicRelevance
    }

    fn run(&self, query: &str, response: &str, knowledge: &KnowledgeBase) -> CheckOutcome {
        let thresholds = &knowledge.thresholds;
        let combined = format!("{} {}", query, response).to_lowercase();

        let positive = Self::count(&combined, &knowledge.keywords.positive);
        let negative = Self::count(&combined, &knowledge.keywords.negative);

        let relevance = (positive as f64 - thresholds.negative_keyword_weight * negative as f64)
            .clamp(0.0, CHECK_MAX_SCORE);

        let mut outcome = CheckOutcome::full(self.kind());
        outcome.score = relevance;

        if relevance < thresholds.min_relevance {
            outcome.push(
                ValidationIssue::new(
                    IssueType::TopicIrrelevant,
                    Severity::Critical,
                    format!(
                        "Pertanyaan berada di luar topik hukum Indonesia (relevansi {:.0}/10)",
                        relevance
                    ),
                )
                .with_suggestion("Ajukan pertanyaan yang berkaitan dengan hukum atau peraturan di Indonesia."),
            );
        } else if negative > 0 {
            outcome.push(
                ValidationIssue::new(
                    IssueType::TopicIrrelevant,
                    Severity::Medium,
                    format!("Jawaban menyimpang ke topik di luar hukum ({} kata kunci)", negative),
                )
                .with_suggestion("Fokuskan jawaban pada aspek hukum dari pertanyaan."),
            );
        }

        outcome
    }
}
