use std::io::{IsTerminal, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use colored::Colorize;
use html_validator::{
    DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, ValidationResult, Validator, ValidatorConfig, output,
};

use crate::logging;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Human,
    Json,
}

/// Whether every validated document came back without errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    Invalid,
}

#[derive(Parser, Debug)]
#[command(name = "html-validator")]
#[command(about = "Check HTML from a URL, a file or a string with the Nu HTML Checker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// URLs, file paths or literal markup, validated in order
    #[arg(required = true)]
    pub sources: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Human)]
    pub format: Format,

    /// Checker endpoint receiving the markup
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// User-Agent sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Request timeout in seconds (HTTP client default when omitted)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Exit with status 0 even if a document has errors
    #[arg(long)]
    pub allow_errors: bool,

    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    fn validator_config(&self) -> Result<ValidatorConfig> {
        let mut config = ValidatorConfig::default()
            .with_endpoint(&self.endpoint)?
            .with_user_agent(self.user_agent.clone());
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

/// Parse arguments, validate every source and print the results to stdout.
///
/// # Errors
///
/// Returns the first validation failure (network, file, response) with the
/// offending source as context.
pub async fn run() -> Result<Outcome> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let validator = Validator::new(cli.validator_config()?)?;
    let mut all_valid = true;

    for source in &cli.sources {
        let label = short_label(source);
        tracing::info!(source = %label, "validating");

        let result = validator
            .validate(source)
            .await
            .with_context(|| format!("could not validate '{label}'"))?;
        all_valid &= result.is_valid();

        let mut stdout = std::io::stdout().lock();
        match cli.format {
            Format::Json => output::write_json(&result, &mut stdout)?,
            Format::Human => write_colored(source, &result, &mut stdout)?,
        }
    }

    if all_valid || cli.allow_errors {
        Ok(Outcome::Valid)
    } else {
        Ok(Outcome::Invalid)
    }
}

/// Render the plain-text report, then style the lines that carry a verdict.
fn write_colored(source: &str, result: &ValidationResult, writer: &mut dyn Write) -> Result<()> {
    let mut plain = Vec::new();
    output::write_human(source, result, &mut plain)?;

    for line in String::from_utf8_lossy(&plain).lines() {
        let styled = if line.starts_with('\u{2713}') {
            line.green().bold()
        } else if line.starts_with('\u{2717}') {
            line.red().bold()
        } else if line.contains(": error") || line.contains(": non-document-error") {
            line.red()
        } else if line.contains(": info/warning:") {
            line.yellow()
        } else {
            line.normal()
        };
        writeln!(writer, "{styled}")?;
    }
    Ok(())
}

fn short_label(source: &str) -> String {
    let first = source.lines().next().unwrap_or_default();
    if first.chars().count() > 60 || source.contains('\n') {
        let head: String = first.chars().take(60).collect();
        format!("{head}...")
    } else {
        first.to_owned()
    }
}
