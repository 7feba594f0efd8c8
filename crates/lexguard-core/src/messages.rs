//! Suggestions and user-facing rejection messages.
//!
//! Both are pure and total: they never fail and the error message is
//! never empty.

use serde::{Deserialize, Serialize};

use crate::types::{IssueType, ValidationIssue, ValidationResult};

/// Language of user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Indonesian,
    English,
}

/// Which rejection template applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Template {
    OffTopic,
    MissingSource,
    UnsafeContent,
    GenericFailure,
    Incomplete,
}

/// Category-level suggestion for an issue type, independent of the message.
pub fn generic_suggestion(issue_type: IssueType) -> &'static str {
    match issue_type {
        IssueType::TopicIrrelevant => "Ajukan pertanyaan yang berkaitan dengan hukum Indonesia.",
        IssueType::MissingSource => {
            "Sertakan rujukan undang-undang atau pasal yang spesifik untuk setiap klaim hukum."
        }
        IssueType::Hallucination => {
            "Verifikasi setiap klaim terhadap teks resmi peraturan perundang-undangan."
        }
        IssueType::Inconsistency => "Periksa kembali pernyataan yang saling bertentangan.",
        IssueType::Incomplete => {
            "Lengkapi jawaban dengan langkah-langkah atau penjelasan yang lebih rinci."
        }
        IssueType::UnsafeContent => {
            "Jangan memberikan panduan untuk melanggar hukum; arahkan pengguna ke saluran hukum yang sah."
        }
        IssueType::LowQuality => "Gunakan bahasa formal dan hindari pengulangan.",
    }
}

/// Suggestions for a failed validation.
///
/// Issue-level suggestions come first (deduplicated, in issue order),
/// followed by one generic suggestion per issue type present.
pub fn build_suggestions(issues: &[ValidationIssue]) -> Vec<String> {
    let mut suggestions: Vec<String> = Vec::new();

    for suggestion in issues.iter().filter_map(|i| i.suggestion.as_deref()) {
        if !suggestions.iter().any(|s| s == suggestion) {
            suggestions.push(suggestion.to_string());
        }
    }

    for issue_type in IssueType::all() {
        if issues.iter().any(|i| i.issue_type == issue_type) {
            let generic = generic_suggestion(issue_type);
            if !suggestions.iter().any(|s| s == generic) {
                suggestions.push(generic.to_string());
            }
        }
    }

    suggestions
}

/// The single most useful next step: the suggestion of the most severe
/// issue, earliest first on ties.
pub fn primary_suggestion(result: &ValidationResult) -> Option<String> {
    let mut best: Option<&ValidationIssue> = None;
    for issue in &result.issues {
        if best.map_or(true, |b| issue.severity > b.severity) {
            best = Some(issue);
        }
    }

    best.map(|issue| {
        issue
            .suggestion
            .clone()
            .unwrap_or_else(|| generic_suggestion(issue.issue_type).to_string())
    })
}

/// Localized rejection message for an invalid result (Indonesian).
pub fn generate_error_message(result: &ValidationResult) -> String {
    generate_error_message_in(result, Locale::default())
}

/// Localized rejection message for an invalid result.
pub fn generate_error_message_in(result: &ValidationResult, locale: Locale) -> String {
    let template = match result.first_critical() {
        Some(issue) => match issue.issue_type {
            IssueType::TopicIrrelevant => Template::OffTopic,
            IssueType::MissingSource => Template::MissingSource,
            IssueType::UnsafeContent => Template::UnsafeContent,
            IssueType::Incomplete => Template::Incomplete,
            _ => Template::GenericFailure,
        },
        None => Template::Incomplete,
    };

    render(template, locale).to_string()
}

fn render(template: Template, locale: Locale) -> &'static str {
    match (template, locale) {
        (Template::OffTopic, Locale::Indonesian) => {
            "Maaf, saya hanya dapat menjawab pertanyaan seputar hukum Indonesia. \
             Silakan ajukan pertanyaan tentang peraturan perundang-undangan, hak dan kewajiban hukum, \
             atau prosedur hukum."
        }
        (Template::OffTopic, Locale::English) => {
            "Sorry, I can only answer questions about Indonesian law. \
             Please ask about statutes, legal rights and obligations, or legal procedures."
        }
        (Template::MissingSource, Locale::Indonesian) => {
            "Maaf, saya belum dapat memberikan jawaban yang didukung rujukan hukum yang jelas. \
             Silakan konsultasikan dengan advokat atau konsultan hukum untuk informasi yang akurat."
        }
        (Template::MissingSource, Locale::English) => {
            "Sorry, I could not produce an answer backed by clear legal references. \
             Please consult an advocate or legal consultant for accurate information."
        }
        (Template::UnsafeContent, Locale::Indonesian) => {
            "Maaf, saya tidak dapat membantu permintaan yang berkaitan dengan upaya melanggar \
             atau menghindari hukum. Jika Anda menghadapi masalah hukum, silakan hubungi advokat \
             atau lembaga bantuan hukum."
        }
        (Template::UnsafeContent, Locale::English) => {
            "Sorry, I cannot help with requests to break or evade the law. \
             If you are facing a legal problem, please contact an advocate or a legal aid institute."
        }
        (Template::GenericFailure, Locale::Indonesian) => {
            "Maaf, terjadi kendala saat memvalidasi jawaban. \
             Silakan coba lagi atau konsultasikan dengan profesional hukum."
        }
        (Template::GenericFailure, Locale::English) => {
            "Sorry, something went wrong while validating the answer. \
             Please try again or consult a legal professional."
        }
        (Template::Incomplete, Locale::Indonesian) => {
            "Informasi yang tersedia mungkin belum lengkap. Untuk kepastian hukum, \
             silakan konsultasikan dengan advokat atau konsultan hukum profesional."
        }
        (Template::Incomplete, Locale::English) => {
            "The available information may be incomplete. For legal certainty, \
             please consult a professional advocate or legal consultant."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;
    use chrono::Utc;

    fn result_with(issues: Vec<ValidationIssue>) -> ValidationResult {
        ValidationResult {
            is_valid: false,
            validated_text: String::new(),
            confidence: 40.0,
            issues,
            sources: vec![],
            suggestions: None,
            checks: vec![],
            validated_at: Utc::now(),
        }
    }

    #[test]
    fn test_suggestions_dedup_and_generic() {
        let issues = vec![
            ValidationIssue::new(IssueType::MissingSource, Severity::Medium, "a").with_suggestion("x"),
            ValidationIssue::new(IssueType::MissingSource, Severity::Low, "b").with_suggestion("x"),
            ValidationIssue::new(IssueType::LowQuality, Severity::Low, "c"),
        ];
        let suggestions = build_suggestions(&issues);
        assert_eq!(
            suggestions,
            vec![
                "x".to_string(),
                generic_suggestion(IssueType::MissingSource).to_string(),
                generic_suggestion(IssueType::LowQuality).to_string(),
            ]
        );
    }

    #[test]
    fn test_error_message_picks_first_critical() {
        let result = result_with(vec![
            ValidationIssue::new(IssueType::Incomplete, Severity::Medium, "a"),
            ValidationIssue::new(IssueType::MissingSource, Severity::Critical, "b"),
            ValidationIssue::new(IssueType::UnsafeContent, Severity::Critical, "c"),
        ]);
        assert_eq!(
            generate_error_message(&result),
            render(Template::MissingSource, Locale::Indonesian)
        );
    }

    #[test]
    fn test_error_message_without_critical() {
        let result = result_with(vec![ValidationIssue::new(IssueType::Incomplete, Severity::Medium, "a")]);
        let message = generate_error_message(&result);
        assert!(message.contains("belum lengkap"));
    }

    #[test]
    fn test_missing_answer_reads_as_incomplete() {
        let result = result_with(vec![ValidationIssue::new(IssueType::Incomplete, Severity::Critical, "a")]);
        assert_eq!(
            generate_error_message_in(&result, Locale::English),
            render(Template::Incomplete, Locale::English)
        );
    }

    #[test]
    fn test_error_message_fallback_for_other_critical() {
        let result = result_with(vec![ValidationIssue::new(IssueType::LowQuality, Severity::Critical, "a")]);
        assert_eq!(
            generate_error_message_in(&result, Locale::English),
            render(Template::GenericFailure, Locale::English)
        );
    }

    #[test]
    fn test_every_template_non_empty() {
        for template in [
            Template::OffTopic,
            Template::MissingSource,
            Template::UnsafeContent,
            Template::GenericFailure,
            Template::Incomplete,
        ] {
            for locale in [Locale::Indonesian, Locale::English] {
                assert!(!render(template, locale).trim().is_empty());
            }
        }
    }

    #[test]
    fn test_primary_suggestion_prefers_severity() {
        let result = result_with(vec![
            ValidationIssue::new(IssueType::LowQuality, Severity::Low, "a").with_suggestion("low"),
            ValidationIssue::new(IssueType::Hallucination, Severity::High, "b").with_suggestion("high"),
            ValidationIssue::new(IssueType::Inconsistency, Severity::High, "c").with_suggestion("later"),
        ]);
        assert_eq!(primary_suggestion(&result).as_deref(), Some("high"));
        assert_eq!(primary_suggestion(&result_with(vec![])), None);
    }
}
