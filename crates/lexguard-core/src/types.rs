//! Core types for lexguard validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    TopicIrrelevant,
    MissingSource,
    Hallucination,
    Inconsistency,
    Incomplete,
    UnsafeContent,
    LowQuality,
}

impl IssueType {
    /// All issue types in a fixed order, used for generic suggestions.
    pub fn all() -> [IssueType; 7] {
        [
            IssueType::TopicIrrelevant,
            IssueType::MissingSource,
            IssueType::Hallucination,
            IssueType::Inconsistency,
            IssueType::Incomplete,
            IssueType::UnsafeContent,
            IssueType::LowQuality,
        ]
    }
}

/// Ordinal severity. `Critical` vetoes validity regardless of confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn is_critical(&self) -> bool {
        matches!(self, Severity::Critical)
    }
}

/// A single problem found by a check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,

    pub severity: Severity,

    /// Human-readable description of what was found
    pub message: String,

    /// Concrete next step that would resolve the issue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn new(issue_type: IssueType, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            issue_type,
            severity,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Attach a suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// The seven checks, in definition order.
///
/// Definition order is the aggregation order: issues and sources are
/// concatenated in this order no matter which check finishes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    TopicRelevance,
    SourceCitation,
    FactConsistency,
    LogicalConsistency,
    Completeness,
    Safety,
    Quality,
}

impl CheckKind {
    /// All checks in definition order.
    pub fn all() -> [CheckKind; 7] {
        [
            CheckKind::TopicRelevance,
            CheckKind::SourceCitation,
            CheckKind::FactConsistency,
            CheckKind::LogicalConsistency,
            CheckKind::Completeness,
            CheckKind::Safety,
            CheckKind::Quality,
        ]
    }

    /// The question this check answers.
    pub fn question(&self) -> &'static str {
        match self {
            CheckKind::TopicRelevance => "Is this about Indonesian law?",
            CheckKind::SourceCitation => "Does the answer cite its legal sources?",
            CheckKind::FactConsistency => "Does the answer agree with known legal text?",
            CheckKind::LogicalConsistency => "Does the answer contradict itself?",
            CheckKind::Completeness => "Does the answer address what was asked?",
            CheckKind::Safety => "Does the answer coach anyone to break the law?",
            CheckKind::Quality => "Is the answer well-formed and formal?",
        }
    }

    /// Issue type reported when this check fails internally.
    pub fn primary_issue_type(&self) -> IssueType {
        match self {
            CheckKind::TopicRelevance => IssueType::TopicIrrelevant,
            CheckKind::SourceCitation => IssueType::MissingSource,
            CheckKind::FactConsistency => IssueType::Hallucination,
            CheckKind::LogicalConsistency => IssueType::Inconsistency,
            CheckKind::Completeness => IssueType::Incomplete,
            CheckKind::Safety => IssueType::UnsafeContent,
            CheckKind::Quality => IssueType::LowQuality,
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CheckKind::TopicRelevance => "topic_relevance",
            CheckKind::SourceCitation => "source_citation",
            CheckKind::FactConsistency => "fact_consistency",
            CheckKind::LogicalConsistency => "logical_consistency",
            CheckKind::Completeness => "completeness",
            CheckKind::Safety => "safety",
            CheckKind::Quality => "quality",
        };
        f.write_str(name)
    }
}

/// Maximum score each check can award.
pub const CHECK_MAX_SCORE: f64 = 10.0;

/// What one check observed. Consumed by the aggregator; never serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub kind: CheckKind,
    pub score: f64,
    pub max_score: f64,
    pub issues: Vec<ValidationIssue>,
    pub sources: Vec<String>,
}

impl CheckOutcome {
    /// A full-score outcome with no issues.
    pub fn full(kind: CheckKind) -> Self {
        Self {
            kind,
            score: CHECK_MAX_SCORE,
            max_score: CHECK_MAX_SCORE,
            issues: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// Zero-score outcome for a check that could not complete.
    ///
    /// Carries one CRITICAL issue so a broken check can never let an
    /// answer through.
    pub fn failed(kind: CheckKind, reason: impl AsRef<str>) -> Self {
        Self {
            kind,
            score: 0.0,
            max_score: CHECK_MAX_SCORE,
            issues: vec![ValidationIssue::new(
                kind.primary_issue_type(),
                Severity::Critical,
                format!("Pemeriksaan {} gagal dijalankan: {}", kind, reason.as_ref()),
            )],
            sources: Vec::new(),
        }
    }

    /// Subtract points, flooring at zero.
    pub fn deduct(&mut self, points: f64) {
        self.score = (self.score - points).max(0.0);
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }
}

/// Per-check contribution to the final confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckScore {
    pub check: CheckKind,
    pub score: f64,
    pub max_score: f64,
}

/// Final verdict for one `(query, response)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,

    /// The response as assessed, unmodified
    pub validated_text: String,

    /// Aggregate score in [0, 100]
    pub confidence: f64,

    /// Issues in check-definition order
    pub issues: Vec<ValidationIssue>,

    /// Citations found, deduplicated, first-seen order
    pub sources: Vec<String>,

    /// Present only when `is_valid` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,

    /// Per-check breakdown in definition order
    #[serde(default)]
    pub checks: Vec<CheckScore>,

    pub validated_at: DateTime<Utc>,
}

impl ValidationResult {
    /// First CRITICAL issue in orchestrator order.
    pub fn first_critical(&self) -> Option<&ValidationIssue> {
        self.issues.iter().find(|i| i.severity.is_critical())
    }

    pub fn has_critical(&self) -> bool {
        self.first_critical().is_some()
    }

    pub fn has_issue(&self, issue_type: IssueType, severity: Severity) -> bool {
        self.issues
            .iter()
            .any(|i| i.issue_type == issue_type && i.severity == severity)
    }

    /// Score a single check contributed, if it ran.
    pub fn check_score(&self, kind: CheckKind) -> Option<f64> {
        self.checks.iter().find(|c| c.check == kind).map(|c| c.score)
    }

    /// Equality on everything except the timestamp.
    pub fn is_equivalent(&self, other: &ValidationResult) -> bool {
        self.is_valid == other.is_valid
            && self.validated_text == other.validated_text
            && self.confidence == other.confidence
            && self.issues == other.issues
            && self.sources == other.sources
            && self.suggestions == other.suggestions
            && self.checks == other.checks
    }
}
