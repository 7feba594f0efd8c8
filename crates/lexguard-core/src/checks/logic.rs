//! Logical Consistency Check
//!
//! **Question**: Does the answer contradict itself?
//!
//! Two signals:
//! - contradiction pairs whose first occurrences sit within 50 characters: HIGH, -3 each
//! - weak narrative flow across three or more sentences: LOW, -1

use lazy_static::lazy_static;
use regex::Regex;

use crate::knowledge::KnowledgeBase;
use crate::text::{char_offset, sentences, similarity};
use crate::types::{CheckKind, CheckOutcome, IssueType, Severity, ValidationIssue};

use super::Check;

/// Maximum character distance between contradicting terms.
const CONTRADICTION_WINDOW: usize = 50;

const CONTRADICTION_PENALTY: f64 = 3.0;
const FLOW_PENALTY: f64 = 1.0;

const CONTRADICTION_PAIRS: [(&str, &str); 10] = [
    ("dilarang", "diperbolehkan"),
    ("dilarang", "memperbolehkan"),
    ("dilarang", "diizinkan"),
    ("wajib", "tidak wajib"),
    ("sah", "tidak sah"),
    ("boleh", "tidak boleh"),
    ("dapat dipidana", "tidak dapat dipidana"),
    ("berlaku", "tidak berlaku"),
    ("legal", "ilegal"),
    ("bersalah", "tidak bersalah"),
];

struct ContradictionPair {
    left: &'static str,
    right: &'static str,
    left_re: Regex,
    right_re: Regex,
}

lazy_static! {
    static ref CONTRADICTIONS: Vec<ContradictionPair> = CONTRADICTION_PAIRS
        .iter()
        .map(|&(left, right)| ContradictionPair {
            left,
            right,
            left_re: Regex::new(&format!(r"(?i)\b{}\b", regex::escape(left))).unwrap(),
            right_re: Regex::new(&format!(r"(?i)\b{}\b", regex::escape(right))).unwrap(),
        })
        .collect();
}

/// Byte offset of the first match of `re` that is not inside a match of `shadow`.
///
/// Keeps "wajib" inside "tidak wajib" from counting as its own occurrence.
fn first_standalone(text: &str, re: &Regex, shadow: &Regex) -> Option<usize> {
    let shadows: Vec<(usize, usize)> = shadow.find_iter(text).map(|m| (m.start(), m.end())).collect();
    re.find_iter(text)
        .find(|m| {
            !shadows
                .iter()
                .any(|(start, end)| m.start() >= *start && m.end() <= *end)
        })
        .map(|m| m.start())
}

/// The Logical Consistency check.
pub struct LogicalConsistencyCheck;

impl LogicalConsistencyCheck {
    pub fn new() -> Self {
        Self
    }

    /// Pairs whose first standalone occurrences are within the window.
    fn contradictions(&self, response: &str) -> Vec<(&'static str, &'static str, usize)> {
        let mut found = Vec::new();

        for pair in CONTRADICTIONS.iter() {
            let left = first_standalone(response, &pair.left_re, &pair.right_re);
            let right = first_standalone(response, &pair.right_re, &pair.left_re);

            if let (Some(l), Some(r)) = (left, right) {
                let distance = char_offset(response, l).abs_diff(char_offset(response, r));
                if distance < CONTRADICTION_WINDOW {
                    found.push((pair.left, pair.right, distance));
                }
            }
        }

        found
    }

    /// Whether too few adjacent sentences relate to each other.
    fn weak_flow(&self, response: &str, knowledge: &KnowledgeBase) -> Option<(usize, usize)> {
        let parts = sentences(response);
        if parts.len() < 3 {
            return None;
        }

        let pairs = parts.len() - 1;
        let connected = parts
            .windows(2)
            .filter(|w| similarity(w[0], w[1]) > knowledge.thresholds.flow_similarity_floor)
            .count();

        if (connected as f64 / pairs as f64) < knowledge.thresholds.flow_min_ratio {
            Some((connected, pairs))
        } else {
            None
        }
    }
}

impl Default for LogicalConsistencyCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for LogicalConsistencyCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::LogicalConsistency
    }

    fn run(&self, _query: &str, response: &str, knowledge: &KnowledgeBase) -> CheckOutcome {
        let mut outcome = CheckOutcome::full(self.kind());

        for (left, right, distance) in self.contradictions(response) {
            outcome.push(
                ValidationIssue::new(
                    IssueType::Inconsistency,
                    Severity::High,
                    format!(
                        "Pernyataan saling bertentangan: \"{}\" dan \"{}\" berjarak {} karakter",
                        left, right, distance
                    ),
                )
                .with_suggestion("Jelaskan kapan suatu perbuatan dilarang dan kapan diperbolehkan beserta dasar hukumnya."),
            );
            outcome.deduct(CONTRADICTION_PENALTY);
        }

        if let Some((connected, pairs)) = self.weak_flow(response, knowledge) {
            outcome.push(
                ValidationIssue::new(
                    IssueType::Inconsistency,
                    Severity::Low,
                    format!(
                        "Alur penjelasan lemah: hanya {} dari {} pasangan kalimat berkaitan",
                        connected, pairs
                    ),
                )
                .with_suggestion("Hubungkan setiap kalimat dengan penjelasan sebelumnya."),
            );
            outcome.deduct(FLOW_PENALTY);
        }

        outcome
    }
}
