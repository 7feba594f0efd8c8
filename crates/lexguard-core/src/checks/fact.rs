//! Hallucination / Fact-Consistency Check
//!
//! **Question**: Does the answer agree with known legal text?
//!
//! Starts at 10 and only deducts:
//! - known misconception stated: HIGH, -3 each
//! - known provision cited but the answer diverges from its canonical text: MEDIUM, -2 each
//! - absolute statement ("selalu", "tidak pernah", ...): LOW, -1 per family

use lazy_static::lazy_static;
use regex::Regex;

use crate::knowledge::KnowledgeBase;
use crate::text::{contains_bounded, normalize_whitespace, similarity};
use crate::types::{CheckKind, CheckOutcome, IssueType, Severity, ValidationIssue};

use super::Check;

lazy_static! {
    /// Absolute-statement families. Each family deducts once however often it occurs.
    static ref ABSOLUTE_PATTERNS: Vec<(&'static str, Regex)> = vec![
        ("selalu", Regex::new(r"(?i)\b(selalu|senantiasa)\b").unwrap()),
        ("tidak pernah", Regex::new(r"(?i)\b(tidak|tak)\s+pernah\b").unwrap()),
        ("semua", Regex::new(r"(?i)\b(semua(nya)?|setiap\s+kasus)\b").unwrap()),
        ("tidak ada", Regex::new(r"(?i)\b(tidak\s+ada\s+(satu|satupun|seorang)|tak\s+satu\s+pun)\b").unwrap()),
    ];
}

const MISCONCEPTION_PENALTY: f64 = 3.0;
const DIVERGENCE_PENALTY: f64 = 2.0;
const ABSOLUTE_PENALTY: f64 = 1.0;

/// The Fact-Consistency check.
pub struct FactConsistencyCheck;

impl FactConsistencyCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FactConsistencyCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for FactConsistencyCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::FactConsistency
    }

    fn run(&self, _query: &str, response: &str, knowledge: &KnowledgeBase) -> CheckOutcome {
        let mut outcome = CheckOutcome::full(self.kind());
        let normalized = normalize_whitespace(response);

        for (phrase, misconception) in knowledge.misconceptions() {
            if normalized.contains(phrase) {
                outcome.push(
                    ValidationIssue::new(
                        IssueType::Hallucination,
                        Severity::High,
                        format!("Jawaban memuat miskonsepsi hukum: \"{}\"", misconception.phrase),
                    )
                    .with_suggestion(misconception.truth.trim()),
                );
                outcome.deduct(MISCONCEPTION_PENALTY);
            }
        }

        let floor = knowledge.thresholds.kb_similarity_floor;
        for entry in knowledge.citations() {
            if !contains_bounded(&normalized, entry.citation_lower) {
                continue;
            }
            let score = similarity(response, entry.text);
            if score < floor {
                outcome.push(
                    ValidationIssue::new(
                        IssueType::Hallucination,
                        Severity::Medium,
                        format!(
                            "Uraian tentang {} tidak sesuai dengan teks ketentuannya (kemiripan {:.2})",
                            entry.citation, score
                        ),
                    )
                    .with_suggestion(format!("Periksa kembali isi {} sebelum mengutipnya.", entry.citation)),
                );
                outcome.deduct(DIVERGENCE_PENALTY);
            }
        }

        for (family, regex) in ABSOLUTE_PATTERNS.iter() {
            if regex.is_match(response) {
                outcome.push(
                    ValidationIssue::new(
                        IssueType::Hallucination,
                        Severity::Low,
                        format!("Pernyataan absolut tanpa dasar: \"{}\"", family),
                    )
                    .with_suggestion("Hindari generalisasi mutlak; sebutkan pengecualian yang diatur undang-undang."),
                );
                outcome.deduct(ABSOLUTE_PENALTY);
            }
        }

        outcome
    }
}
