//! Completeness Check
//!
//! **Question**: Does the answer address what was asked?
//!
//! | Query signal | Required in response | Otherwise |
//! |--------------|----------------------|-----------|
//! | procedural ("bagaimana cara", "prosedur") | enumerated or ordinal steps | MEDIUM, -3 |
//! | long query (> 50 chars) | response of at least 100 chars | MEDIUM, -2 |
//! | definitional ("apa itu", "pengertian") | copula ("adalah", "yaitu") | LOW, -1 |

use lazy_static::lazy_static;
use regex::Regex;

use crate::knowledge::KnowledgeBase;
use crate::text::char_len;
use crate::types::{CheckKind, CheckOutcome, IssueType, Severity, ValidationIssue};

use super::Check;

const PROCEDURAL_MARKERS: [&str; 7] = [
    "bagaimana cara",
    "tata cara",
    "prosedur",
    "langkah",
    "cara mengurus",
    "cara mengajukan",
    "how to",
];

const DEFINITION_MARKERS: [&str; 6] = [
    "apa itu",
    "apa yang dimaksud",
    "pengertian",
    "definisi",
    "arti dari",
    "what is",
];

const LONG_QUERY_CHARS: usize = 50;
const SHORT_RESPONSE_CHARS: usize = 100;

const MISSING_STEPS_PENALTY: f64 = 3.0;
const BREVITY_PENALTY: f64 = 2.0;
const MISSING_DEFINITION_PENALTY: f64 = 1.0;

lazy_static! {
    /// "1." / "2)" list items (also "1.Datangi"), ordinal words, or the word "langkah".
    static ref STEP_PATTERN: Regex = Regex::new(
        r"(?i)(^|\s)\d{1,2}[.)](\s|\p{L}|$)|\b(pertama|kedua|ketiga|langkah|tahap|tahapan|step)\b"
    ).unwrap();

    static ref COPULA_PATTERN: Regex = Regex::new(
        r"(?i)\b(adalah|yaitu|yakni|merupakan|ialah|diartikan|didefinisikan)\b"
    ).unwrap();
}

/// The Completeness check.
pub struct CompletenessCheck;

impl CompletenessCheck {
    pub fn new() -> Self {
        Self
    }

    fn has_marker(query_lower: &str, markers: &[&str]) -> bool {
        markers.iter().any(|m| query_lower.contains(m))
    }

    fn missing_steps_suggestion(query: &str, knowledge: &KnowledgeBase) -> String {
        match knowledge.find_procedure(query) {
            Some(procedure) => {
                let steps: Vec<String> = procedure
                    .steps
                    .iter()
                    .enumerate()
                    .map(|(i, step)| format!("{}. {}", i + 1, step))
                    .collect();
                format!(
                    "Uraikan langkah-langkah {} secara berurutan: {}",
                    procedure.name,
                    steps.join("; ")
                )
            }
            None => "Uraikan prosedurnya dalam langkah-langkah bernomor.".to_string(),
        }
    }
}

impl Default for CompletenessCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for CompletenessCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Completeness
    }

    fn run(&self, query: &str, response: &str, knowledge: &KnowledgeBase) -> CheckOutcome {
        let mut outcome = CheckOutcome::full(self.kind());
        let query_lower = query.to_lowercase();

        if Self::has_marker(&query_lower, &PROCEDURAL_MARKERS) && !STEP_PATTERN.is_match(response) {
            outcome.push(
                ValidationIssue::new(
                    IssueType::Incomplete,
                    Severity::Medium,
                    "Pertanyaan menanyakan prosedur, tetapi jawaban tidak memuat langkah-langkah",
                )
                .with_suggestion(Self::missing_steps_suggestion(query, knowledge)),
            );
            outcome.deduct(MISSING_STEPS_PENALTY);
        }

        if char_len(query) > LONG_QUERY_CHARS && char_len(response) < SHORT_RESPONSE_CHARS {
            outcome.push(
                ValidationIssue::new(
                    IssueType::Incomplete,
                    Severity::Medium,
                    "Jawaban terlalu singkat untuk pertanyaan yang rinci",
                )
                .with_suggestion("Berikan penjelasan yang sebanding dengan rincian pertanyaan."),
            );
            outcome.deduct(BREVITY_PENALTY);
        }

        if Self::has_marker(&query_lower, &DEFINITION_MARKERS) && !COPULA_PATTERN.is_match(response) {
            outcome.push(
                ValidationIssue::new(
                    IssueType::Incomplete,
                    Severity::Low,
                    "Pertanyaan meminta definisi, tetapi jawaban tidak memberikan definisi yang jelas",
                )
                .with_suggestion("Awali jawaban dengan definisi, misalnya \"X adalah ...\"."),
            );
            outcome.deduct(MISSING_DEFINITION_PENALTY);
        }

        outcome
    }
}
