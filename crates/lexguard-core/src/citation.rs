//! Legal citation extraction.
//!
//! Citations are returned verbatim because they are shown to the end user
//! as-is. A text may match more than one grammar; every match is kept here
//! and deduplication happens only when sources are aggregated.
//!
//! Supported grammars (case-insensitive):
//!
//! | Family | Grammar |
//! |--------|---------|
//! | Statute | `UU No. <N> Tahun <YYYY>`, `Undang-Undang Nomor <N> Tahun <YYYY>` |
//! | Perppu | `Perppu No. <N>/<YYYY>` |
//! | Perpres | `Perpres No. <N> Tahun <YYYY>` |
//! | Codes | `KUHP Pasal <N>`, `KUHPerdata Pasal <N>`, `KUHAP Pasal <N>` |
//! | Constitution | `UUD 1945 Pasal <N>[A-Z]?` |
//! | Court decisions | `Putusan MK No. <docket>`, `Putusan MA No. <docket>` |

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Coarse family of a legal citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationFamily {
    Statute,
    Perppu,
    PresidentialRegulation,
    PenalCode,
    CivilCode,
    CriminalProcedureCode,
    Constitution,
    ConstitutionalCourtDecision,
    SupremeCourtDecision,
}

/// A citation found in text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalSource {
    #[serde(rename = "type")]
    pub family: CitationFamily,

    /// Verbatim matched text
    pub full_citation: String,

    /// Byte offset of the match in the scanned text
    pub start: usize,
}

// Grammar bodies, without anchors. Shared by extraction and format validation.
const STATUTE_SHORT: &str = r"UU\s+No\.?\s*\d+\s+Tahun\s+\d{4}";
const STATUTE_LONG: &str = r"Undang-Undang\s+Nomor\s+\d+\s+Tahun\s+\d{4}";
const PERPPU: &str = r"Perppu\s+No\.?\s*\d+/\d{4}";
const PERPRES: &str = r"Perpres\s+No\.?\s*\d+\s+Tahun\s+\d{4}";
const KUHP: &str = r"KUHP\s+Pasal\s+\d+";
const KUHPERDATA: &str = r"KUHPerdata\s+Pasal\s+\d+";
const KUHAP: &str = r"KUHAP\s+Pasal\s+\d+";
const UUD: &str = r"UUD\s+1945\s+Pasal\s+\d+[A-Z]?";
const PUTUSAN_MK: &str = r"Putusan\s+MK\s+No\.?\s*\d(?:[\w/.-]*\w)?";
const PUTUSAN_MA: &str = r"Putusan\s+MA\s+No\.?\s*\d(?:[\w/.-]*\w)?";

const GRAMMARS: [(CitationFamily, &str); 10] = [
    (CitationFamily::Statute, STATUTE_SHORT),
    (CitationFamily::Statute, STATUTE_LONG),
    (CitationFamily::Perppu, PERPPU),
    (CitationFamily::PresidentialRegulation, PERPRES),
    (CitationFamily::PenalCode, KUHP),
    (CitationFamily::CivilCode, KUHPERDATA),
    (CitationFamily::CriminalProcedureCode, KUHAP),
    (CitationFamily::Constitution, UUD),
    (CitationFamily::ConstitutionalCourtDecision, PUTUSAN_MK),
    (CitationFamily::SupremeCourtDecision, PUTUSAN_MA),
];

lazy_static! {
    /// Grammars for scanning free text.
    static ref CITATION_PATTERNS: Vec<(CitationFamily, Regex)> = GRAMMARS
        .iter()
        .map(|(family, body)| (*family, Regex::new(&format!(r"(?i)\b{}\b", body)).unwrap()))
        .collect();

    /// The same grammars anchored to a whole string.
    static ref ANCHORED_PATTERNS: Vec<Regex> = GRAMMARS
        .iter()
        .map(|(_, body)| Regex::new(&format!(r"(?i)^{}$", body)).unwrap())
        .collect();
}

/// Extract every citation in `text`, ordered by position.
///
/// Matches at the same position keep grammar order.
pub fn extract_citations(text: &str) -> Vec<LegalSource> {
    let mut found: Vec<(usize, usize, LegalSource)> = Vec::new();

    for (order, (family, regex)) in CITATION_PATTERNS.iter().enumerate() {
        for m in regex.find_iter(text) {
            found.push((
                m.start(),
                order,
                LegalSource {
                    family: *family,
                    full_citation: m.as_str().to_string(),
                    start: m.start(),
                },
            ));
        }
    }

    found.sort_by_key(|(start, order, _)| (*start, *order));
    found.into_iter().map(|(_, _, source)| source).collect()
}

/// Whether `citation` is, in its entirety, a recognized citation.
pub fn is_valid_citation(citation: &str) -> bool {
    ANCHORED_PATTERNS.iter().any(|r| r.is_match(citation.trim()))
}

/// Family of a whole-string citation, if recognized.
pub fn classify(citation: &str) -> Option<CitationFamily> {
    ANCHORED_PATTERNS
        .iter()
        .zip(GRAMMARS.iter())
        .find(|(r, _)| r.is_match(citation.trim()))
        .map(|(_, (family, _))| *family)
}
