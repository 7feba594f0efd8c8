//! lexguard CLI
//!
//! Validate generated answers about Indonesian law from the command line.
//!
//! **Usage:**
//! ```bash
//! lexguard validate --query "Apa sanksi pencurian?" --response-file answer.txt
//! lexguard citations "Berdasarkan KUHP Pasal 362 ..."
//! lexguard knowledge lint knowledge.yaml
//! lexguard --knowledge knowledge.yaml knowledge dump --format json
//! ```
//!
//! `validate` exits 0 for a valid answer and 2 for an invalid one; any
//! other failure exits 1.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use lexguard_core::{
    extract_citations, generate_error_message_in, primary_suggestion, KnowledgeBase, Locale,
    ValidationResult,
};
use lexguard_runtime::{RuntimeConfig, RuntimeValidator};

const LOG_ENV: &str = "LEXGUARD_LOG";
const EXIT_INVALID: u8 = 2;

/// Validate generated answers about Indonesian law
#[derive(Parser, Debug)]
#[command(name = "lexguard", version, about)]
struct Cli {
    /// Knowledge base file (YAML or JSON); defaults to the built-in one
    #[arg(long, global = true, env = "LEXGUARD_KNOWLEDGE", value_name = "FILE")]
    knowledge: Option<PathBuf>,

    /// Enable debug logging (overridden by LEXGUARD_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate an answer against its query
    Validate(ValidateArgs),

    /// Extract legal citations from text
    Citations(CitationsArgs),

    /// Inspect knowledge base files
    #[command(subcommand)]
    Knowledge(KnowledgeCommand),
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// The user's question
    #[arg(short, long)]
    query: String,

    /// The candidate answer
    #[arg(short, long, conflicts_with = "response_file")]
    response: Option<String>,

    /// Read the answer from a file ("-" for stdin)
    #[arg(long, value_name = "FILE")]
    response_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Language of the rejection message
    #[arg(long, value_enum, default_value_t = LocaleArg::Id)]
    locale: LocaleArg,
}

#[derive(Args, Debug)]
struct CitationsArgs {
    /// Text to scan; read from stdin when omitted
    text: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Subcommand, Debug)]
enum KnowledgeCommand {
    /// Check a knowledge base file against the schema and semantic rules
    Lint {
        file: PathBuf,
    },

    /// Print the loaded knowledge base
    Dump {
        #[arg(long, value_enum, default_value_t = DumpFormat::Yaml)]
        format: DumpFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum DumpFormat {
    Yaml,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LocaleArg {
    Id,
    En,
}

impl From<LocaleArg> for Locale {
    fn from(arg: LocaleArg) -> Self {
        match arg {
            LocaleArg::Id => Locale::Indonesian,
            LocaleArg::En => Locale::English,
        }
    }
}

/// JSON shape printed by `validate --format json`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateReport<'a> {
    #[serde(flatten)]
    result: &'a ValidationResult,

    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    primary_suggestion: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Validate(args) => {
            let knowledge = load_knowledge(cli.knowledge.as_deref())?;
            validate(knowledge, args).await
        }
        Command::Citations(args) => {
            citations(args)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Knowledge(KnowledgeCommand::Lint { file }) => {
            lint(&file)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Knowledge(KnowledgeCommand::Dump { format }) => {
            let knowledge = load_knowledge(cli.knowledge.as_deref())?;
            dump(&knowledge, format)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "lexguard=debug" } else { "lexguard=info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_knowledge(path: Option<&std::path::Path>) -> Result<KnowledgeBase> {
    let knowledge = match path {
        Some(path) => KnowledgeBase::from_file(path)
            .with_context(|| format!("Failed to load knowledge base from {}", path.display()))?,
        None => KnowledgeBase::builtin().context("Built-in knowledge base is invalid")?,
    };

    tracing::debug!(
        version = %knowledge.version,
        citations = knowledge.citation_count(),
        builtin = path.is_none(),
        "Using knowledge base"
    );
    Ok(knowledge)
}

async fn validate(knowledge: KnowledgeBase, args: ValidateArgs) -> Result<ExitCode> {
    let response = match (&args.response, &args.response_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => read_input(Some(path))?,
        (None, None) => bail!("Provide the answer with --response or --response-file"),
    };

    let config = RuntimeConfig::from_env().context("Invalid LEXGUARD_* environment")?;
    let validator = RuntimeValidator::new(Arc::new(knowledge), config);
    let result = validator
        .validate_bounded(&args.query, &response)
        .await
        .context("Validation did not complete")?;

    let locale = Locale::from(args.locale);
    let error_message = (!result.is_valid).then(|| generate_error_message_in(&result, locale));

    match args.format {
        OutputFormat::Json => {
            let report = ValidateReport {
                result: &result,
                error_message,
                primary_suggestion: primary_suggestion(&result),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print_result(&result, error_message.as_deref()),
    }

    Ok(if result.is_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_INVALID)
    })
}

fn citations(args: CitationsArgs) -> Result<()> {
    let text = match args.text {
        Some(text) => text,
        None => read_input(None)?,
    };
    let found = extract_citations(&text);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&found)?),
        OutputFormat::Text => {
            for source in &found {
                println!("{:<32} {}", label(&source.family), source.full_citation);
            }
            if found.is_empty() {
                eprintln!("No citations found");
            }
        }
    }

    Ok(())
}

fn lint(file: &std::path::Path) -> Result<()> {
    let knowledge = KnowledgeBase::from_file(file)
        .with_context(|| format!("{} is not a valid knowledge base", file.display()))?;

    println!(
        "OK: {} (version {}): {} citations, {} misconceptions, {} procedures",
        file.display(),
        knowledge.version,
        knowledge.citation_count(),
        knowledge.misconceptions.len(),
        knowledge.procedures.len()
    );
    Ok(())
}

fn dump(knowledge: &KnowledgeBase, format: DumpFormat) -> Result<()> {
    match format {
        DumpFormat::Yaml => print!("{}", serde_yaml::to_string(knowledge)?),
        DumpFormat::Json => println!("{}", serde_json::to_string_pretty(knowledge)?),
    }
    Ok(())
}

/// Read a file, or stdin when the path is absent or "-".
fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn print_result(result: &ValidationResult, error_message: Option<&str>) {
    let verdict = if result.is_valid { "VALID" } else { "INVALID" };
    println!("{} (confidence {:.1})", verdict, result.confidence);

    if !result.sources.is_empty() {
        println!("Sources: {}", result.sources.join(", "));
    }

    if !result.checks.is_empty() {
        println!("Checks:");
        for check in &result.checks {
            println!(
                "  {:<20} {:>4.1}/{:.0}",
                check.check.to_string(),
                check.score,
                check.max_score
            );
        }
    }

    if !result.issues.is_empty() {
        println!("Issues:");
        for issue in &result.issues {
            println!(
                "  [{}] {}: {}",
                label(&issue.severity),
                label(&issue.issue_type),
                issue.message
            );
        }
    }

    if let Some(suggestions) = &result.suggestions {
        println!("Suggestions:");
        for suggestion in suggestions {
            println!("  - {}", suggestion);
        }
    }

    if let Some(message) = error_message {
        println!();
        println!("{}", message);
    }
}

/// The serialized name of a unit enum variant.
fn label<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use lexguard_core::{CitationFamily, IssueType, LegalSource, Severity};

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_validate() {
        let cli = Cli::parse_from([
            "lexguard",
            "validate",
            "--query",
            "Apa sanksi pencurian?",
            "--response",
            "KUHP Pasal 362",
            "--format",
            "json",
            "--locale",
            "en",
        ]);
        match cli.command {
            Command::Validate(args) => {
                assert_eq!(args.format, OutputFormat::Json);
                assert_eq!(Locale::from(args.locale), Locale::English);
                assert_eq!(args.response.as_deref(), Some("KUHP Pasal 362"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_response_sources_conflict() {
        let parsed = Cli::try_parse_from([
            "lexguard",
            "validate",
            "-q",
            "x",
            "-r",
            "y",
            "--response-file",
            "answer.txt",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_labels_use_wire_names() {
        assert_eq!(label(&Severity::Critical), "CRITICAL");
        assert_eq!(label(&IssueType::MissingSource), "MISSING_SOURCE");
        assert_eq!(label(&CitationFamily::PenalCode), "penal_code");
    }

    #[test]
    fn test_report_flattens_result() {
        let knowledge = KnowledgeBase::builtin().unwrap();
        let result = lexguard_core::validate_response(&knowledge, "Resep kue?", "Campur tepung.");
        let report = ValidateReport {
            result: &result,
            error_message: Some("m".to_string()),
            primary_suggestion: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(json["errorMessage"], "m");
        assert!(json.get("primarySuggestion").is_none());
    }

    #[test]
    fn test_citation_json_shape() {
        let found: Vec<LegalSource> = extract_citations("Lihat KUHP Pasal 362.");
        let json = serde_json::to_value(&found).unwrap();
        assert_eq!(json[0]["fullCitation"], "KUHP Pasal 362");
        assert_eq!(json[0]["type"], "penal_code");
    }
}
