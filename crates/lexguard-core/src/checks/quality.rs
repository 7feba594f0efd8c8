//! Quality Check
//!
//! **Question**: Is the answer well-formed and formal?

use crate::knowledge::KnowledgeBase;
use crate::text::{char_len, sentences, similarity, words};
use crate::types::{CheckKind, CheckOutcome, IssueType, Severity, ValidationIssue, CHECK_MAX_SCORE};

use super::Check;

const SHORT_PENALTY: f64 = 3.0;
const REPETITION_PENALTY: f64 = 2.0;
const INFORMAL_PENALTY: f64 = 1.0;

/// Scale from formal-word ratio to a 0-10 score: 10% formal words scores 5.
const FORMALITY_SCALE: f64 = 50.0;

/// The Quality check.
pub struct QualityCheck;

impl QualityCheck {
    pub fn new() -> Self {
        Self
    }

    /// Pairs of distinct sentences that repeat each other.
    fn repeated_pairs(&self, response: &str, threshold: f64) -> usize {
        let parts = sentences(response);
        let mut pairs = 0;
        for i in 0..parts.len() {
            for j in (i + 1)..parts.len() {
                if similarity(parts[i], parts[j]) > threshold {
                    pairs += 1;
                }
            }
        }
        pairs
    }

    /// Formal-register score in [0, 10].
    fn formality(&self, response: &str, knowledge: &KnowledgeBase) -> f64 {
        let tokens = words(response);
        if tokens.is_empty() {
            return 0.0;
        }
        let formal = tokens.iter().filter(|w| knowledge.is_formal_word(w)).count();
        (FORMALITY_SCALE * formal as f64 / tokens.len() as f64).min(CHECK_MAX_SCORE)
    }
}

impl Default for QualityCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for QualityCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Quality
    }

    fn run(&self, _query: &str, response: &str, knowledge: &KnowledgeBase) -> CheckOutcome {
        let thresholds = &knowledge.thresholds;
        let mut outcome = CheckOutcome::full(self.kind());

        if char_len(response) < thresholds.min_response_chars {
            outcome.push(
                ValidationIssue::new(
                    IssueType::LowQuality,
                    Severity::Medium,
                    format!("Jawaban terlalu pendek ({} karakter)", char_len(response)),
                )
                .with_suggestion("Berikan penjelasan yang lebih lengkap."),
            );
            outcome.deduct(SHORT_PENALTY);
        }

        let repeated = self.repeated_pairs(response, thresholds.repetition_similarity);
        if repeated > 1 {
            outcome.push(
                ValidationIssue::new(
                    IssueType::LowQuality,
                    Severity::Low,
                    format!("Jawaban mengandung pengulangan ({} pasang kalimat serupa)", repeated),
                )
                .with_suggestion("Hapus kalimat yang berulang."),
            );
            outcome.deduct(REPETITION_PENALTY);
        }

        let formality = self.formality(response, knowledge);
        if formality < thresholds.min_formality {
            outcome.push(
                ValidationIssue::new(
                    IssueType::LowQuality,
                    Severity::Low,
                    format!("Bahasa kurang formal (skor formalitas {:.1}/10)", formality),
                )
                .with_suggestion("Gunakan bahasa hukum yang baku dan formal."),
            );
            outcome.deduct(INFORMAL_PENALTY);
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(response: &str) -> CheckOutcome {
        let kb = KnowledgeBase::builtin().unwrap();
        QualityCheck::new().run("", response, &kb)
    }

    #[test]
    fn test_formal_answer_passes() {
        let outcome = run(
            "Berdasarkan KUHP Pasal 362, pencurian diancam dengan pidana penjara paling lama lima tahun...",
        );
        assert_eq!(outcome.score, 10.0);
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_short_answer() {
        let outcome = run("Berdasarkan hukum, dilarang.");
        assert!(outcome
            .issues
            .iter()
            .any(|i| i.severity == Severity::Medium && i.issue_type == IssueType::LowQuality));
    }

    #[test]
    fn test_sentence_repeated_three_times() {
        let sentence = "Pencurian diancam pidana penjara berdasarkan KUHP Pasal 362.";
        let outcome = run(&format!("{} {} {}", sentence, sentence, sentence));
        assert!(outcome
            .issues
            .iter()
            .any(|i| i.severity == Severity::Low && i.message.contains("pengulangan")));
        assert_eq!(outcome.score, 8.0);
    }

    #[test]
    fn test_single_repetition_is_tolerated() {
        let sentence = "Pencurian diancam pidana penjara berdasarkan KUHP Pasal 362.";
        let outcome = run(&format!("{} {}", sentence, sentence));
        assert!(outcome.issues.iter().all(|i| !i.message.contains("pengulangan")));
    }

    #[test]
    fn test_informal_answer() {
        let outcome = run("Wah gampang banget kok, santai aja bro, nggak usah dipikirin terus ya.");
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.score, 9.0);
    }

    #[test]
    fn test_empty_response() {
        let outcome = run("");
        assert_eq!(outcome.score, 6.0);
    }
}
