//! Knowledge base: static, read-only reference data.
//!
//! A knowledge base is loaded once, validated against an embedded JSON
//! Schema, normalized, and never mutated afterwards. It is shared by
//! reference across concurrent validations without synchronization.

mod schema;
mod thresholds;

pub use schema::{validate_knowledge_schema, SchemaError};
pub use thresholds::Thresholds;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::citation::is_valid_citation;
use crate::text::normalize_whitespace;

/// Built-in knowledge base (embedded at compile time).
const BUILTIN_KNOWLEDGE_YAML: &str = include_str!("../../data/knowledge_base.yaml");

/// Errors that can occur when loading a knowledge base.
#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Failed to read knowledge base file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Schema validation failed: {}", .0.join("; "))]
    SchemaViolation(Vec<String>),

    #[error("Knowledge base validation failed: {0}")]
    ValidationError(String),
}

/// Citations for one area of law.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegalDomain {
    pub name: String,

    /// Citation -> canonical text
    pub citations: BTreeMap<String, String>,
}

/// A common false belief and its correction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Misconception {
    pub phrase: String,
    pub truth: String,
}

/// A multi-step legal procedure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Procedure {
    pub name: String,
    pub steps: Vec<String>,
}

/// On-domain and off-domain keywords for topic classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct KeywordSets {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

/// A canonical citation entry, borrowed from the knowledge base.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CitationEntry<'a> {
    pub domain: &'a str,
    pub citation: &'a str,
    /// Lower-cased citation, for case-insensitive lookups
    pub citation_lower: &'a str,
    pub text: &'a str,
}

/// Read-only reference data consulted by the checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub version: String,

    pub domains: Vec<LegalDomain>,

    #[serde(default)]
    pub misconceptions: Vec<Misconception>,

    #[serde(default)]
    pub procedures: Vec<Procedure>,

    pub keywords: KeywordSets,

    #[serde(default)]
    pub formal_vocabulary: Vec<String>,

    #[serde(default)]
    pub thresholds: Thresholds,

    /// Lower-cased citation keys, parallel to `domains` flattened in order
    #[serde(skip)]
    citation_keys_lower: Vec<String>,

    /// Whitespace-normalized, lower-cased misconception phrases
    #[serde(skip)]
    misconception_phrases: Vec<String>,

    #[serde(skip)]
    formal_index: HashSet<String>,
}

impl KnowledgeBase {
    /// The knowledge base shipped with the crate.
    pub fn builtin() -> Result<Self, KnowledgeError> {
        Self::from_yaml(BUILTIN_KNOWLEDGE_YAML)
    }

    /// Parse a knowledge base from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, KnowledgeError> {
        let document: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(document)
    }

    /// Parse a knowledge base from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, KnowledgeError> {
        let document: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(document)
    }

    /// Parse a knowledge base from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a knowledge base from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load from a file, choosing the parser by extension (`.json` or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_file(path),
            _ => Self::from_yaml_file(path),
        }
    }

    fn from_value(document: serde_json::Value) -> Result<Self, KnowledgeError> {
        validate_knowledge_schema(&document).map_err(KnowledgeError::SchemaViolation)?;

        let mut knowledge: KnowledgeBase = serde_json::from_value(document)?;
        knowledge.validate()?;
        knowledge.build_indexes();

        tracing::debug!(
            version = %knowledge.version,
            citations = knowledge.citation_keys_lower.len(),
            misconceptions = knowledge.misconceptions.len(),
            procedures = knowledge.procedures.len(),
            "Knowledge base loaded"
        );

        Ok(knowledge)
    }

    /// Semantic checks the schema cannot express.
    fn validate(&self) -> Result<(), KnowledgeError> {
        if self.keywords.positive.is_empty() {
            return Err(KnowledgeError::ValidationError(
                "keywords.positive must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for domain in &self.domains {
            for citation in domain.citations.keys() {
                if !is_valid_citation(citation) {
                    return Err(KnowledgeError::ValidationError(format!(
                        "Unrecognized citation key in domain '{}': {}",
                        domain.name, citation
                    )));
                }
                if !seen.insert(citation.to_lowercase()) {
                    return Err(KnowledgeError::ValidationError(format!(
                        "Duplicate citation key: {}",
                        citation
                    )));
                }
            }
        }

        for procedure in &self.procedures {
            if procedure.steps.is_empty() {
                return Err(KnowledgeError::ValidationError(format!(
                    "Procedure '{}' has no steps",
                    procedure.name
                )));
            }
        }

        self.thresholds
            .check()
            .map_err(KnowledgeError::ValidationError)?;

        Ok(())
    }

    fn build_indexes(&mut self) {
        for list in [&mut self.keywords.positive, &mut self.keywords.negative] {
            for keyword in list.iter_mut() {
                *keyword = keyword.to_lowercase();
            }
        }

        self.citation_keys_lower = self
            .domains
            .iter()
            .flat_map(|d| d.citations.keys())
            .map(|k| k.to_lowercase())
            .collect();

        self.misconception_phrases = self
            .misconceptions
            .iter()
            .map(|m| normalize_whitespace(&m.phrase))
            .collect();

        self.formal_index = self
            .formal_vocabulary
            .iter()
            .map(|w| w.to_lowercase())
            .collect();
    }

    /// Every canonical citation, in domain then key order.
    pub fn citations(&self) -> impl Iterator<Item = CitationEntry<'_>> {
        self.domains
            .iter()
            .flat_map(|d| d.citations.iter().map(move |(k, v)| (d.name.as_str(), k, v)))
            .zip(self.citation_keys_lower.iter())
            .map(|((domain, citation, text), lower)| CitationEntry {
                domain,
                citation,
                citation_lower: lower,
                text,
            })
    }

    /// Canonical text for a citation, case-insensitive.
    pub fn canonical_text(&self, citation: &str) -> Option<&str> {
        let needle = citation.trim().to_lowercase();
        self.citations()
            .find(|e| e.citation_lower == needle)
            .map(|e| e.text)
    }

    /// Misconceptions paired with their normalized phrase.
    pub fn misconceptions(&self) -> impl Iterator<Item = (&str, &Misconception)> {
        self.misconception_phrases
            .iter()
            .map(String::as_str)
            .zip(self.misconceptions.iter())
    }

    /// The first procedure whose name occurs in `text` (case-insensitive).
    pub fn find_procedure(&self, text: &str) -> Option<&Procedure> {
        let lower = text.to_lowercase();
        self.procedures
            .iter()
            .find(|p| lower.contains(&p.name.to_lowercase()))
    }

    pub fn is_formal_word(&self, word: &str) -> bool {
        self.formal_index.contains(word)
    }

    pub fn citation_count(&self) -> usize {
        self.citation_keys_lower.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
version: "test"
domains:
  - name: pidana
    citations:
      "KUHP Pasal 362": "Pencurian diancam pidana penjara."
misconceptions:
  - phrase: "Perjanjian   lisan TIDAK sah"
    truth: "Perjanjian lisan tetap sah."
keywords:
  positive: ["Hukum", "pidana"]
  negative: ["masak"]
formal_vocabulary: ["Berdasarkan"]
"#;

    #[test]
    fn test_builtin_loads() {
        let kb = KnowledgeBase::builtin().unwrap();
        assert!(kb.citation_count() > 10);
        assert!(kb.canonical_text("KUHP Pasal 362").is_some());
        assert!(kb.find_procedure("Bagaimana prosedur gugatan cerai?").is_some());
        assert_eq!(kb.thresholds, Thresholds::default());
    }

    #[test]
    fn test_minimal_is_normalized() {
        let kb = KnowledgeBase::from_yaml(MINIMAL).unwrap();
        assert_eq!(kb.keywords.positive, vec!["hukum", "pidana"]);
        let (phrase, _) = kb.misconceptions().next().unwrap();
        assert_eq!(phrase, "perjanjian lisan tidak sah");
        assert!(kb.is_formal_word("berdasarkan"));
        assert_eq!(kb.canonical_text("kuhp pasal 362"), Some("Pencurian diancam pidana penjara."));
    }

    #[test]
    fn test_json_round_trip_source() {
        let kb = KnowledgeBase::from_yaml(MINIMAL).unwrap();
        let json = serde_json::to_string(&kb).unwrap();
        let reloaded = KnowledgeBase::from_json(&json).unwrap();
        assert_eq!(reloaded.citation_count(), 1);
    }

    #[test]
    fn test_schema_violation_reported() {
        let yaml = r#"
version: "test"
domains: []
"#;
        let result = KnowledgeBase::from_yaml(yaml);
        assert!(matches!(result, Err(KnowledgeError::SchemaViolation(_))));
    }

    #[test]
    fn test_unrecognized_citation_key() {
        let yaml = r#"
version: "test"
domains:
  - name: pidana
    citations:
      "Pasal tentang pencurian": "teks"
keywords:
  positive: ["hukum"]
  negative: []
"#;
        let result = KnowledgeBase::from_yaml(yaml);
        assert!(matches!(result, Err(KnowledgeError::ValidationError(_))));
    }

    #[test]
    fn test_duplicate_citation_across_domains() {
        let yaml = r#"
version: "test"
domains:
  - name: a
    citations:
      "KUHP Pasal 362": "satu"
  - name: b
    citations:
      "kuhp pasal 362": "dua"
keywords:
  positive: ["hukum"]
  negative: []
"#;
        let result = KnowledgeBase::from_yaml(yaml);
        assert!(matches!(result, Err(KnowledgeError::ValidationError(_))));
    }

    #[test]
    fn test_procedure_without_steps() {
        let yaml = r#"
version: "test"
domains: []
procedures:
  - name: "laporan polisi"
    steps: []
keywords:
  positive: ["hukum"]
  negative: []
"#;
        let result = KnowledgeBase::from_yaml(yaml);
        assert!(matches!(result, Err(KnowledgeError::ValidationError(_))));
    }

    #[test]
    fn test_empty_positive_keywords() {
        let yaml = r#"
version: "test"
domains: []
keywords:
  positive: []
  negative: []
"#;
        let result = KnowledgeBase::from_yaml(yaml);
        assert!(matches!(result, Err(KnowledgeError::ValidationError(_))));
    }
}
