//! Output formatting for validation results.
//!
//! Provides JSON and plain-text writers for a [`ValidationResult`].
//! Color/terminal styling is left to the CLI layer.

use std::io::Write;

use crate::result::ValidationResult;

/// Write a result as pretty-printed JSON, field names exactly as the checker sent them.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(result: &ValidationResult, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Write a result as human-readable plain text.
///
/// `source` is the label shown in the header (usually what the user typed).
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(
    source: &str,
    result: &ValidationResult,
    writer: &mut dyn Write,
) -> anyhow::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer, "  HTML VALIDATOR")?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer)?;
    writeln!(writer, "  Source:    {}", source_label(source))?;
    writeln!(writer, "  Messages:  {}", result.messages.len())?;
    writeln!(writer, "  Errors:    {}", result.error_count())?;
    writeln!(writer, "  Warnings:  {}", result.warning_count())?;
    writeln!(writer)?;

    if !result.messages.is_empty() {
        writeln!(writer, "{}", "-".repeat(80))?;
        writeln!(writer, "  MESSAGES")?;
        writeln!(writer, "{}", "-".repeat(80))?;
        for message in &result.messages {
            writeln!(writer, "{}", message.format_human_readable())?;
            if let Some(extract) = &message.extract {
                writeln!(writer, "    {}", extract.replace('\n', " "))?;
            }
        }
        writeln!(writer)?;
    }

    writeln!(writer, "{}", "=".repeat(80))?;
    if result.is_valid() {
        writeln!(writer, "\u{2713} Document is valid")?;
    } else {
        writeln!(
            writer,
            "\u{2717} {} error(s) found",
            result.error_count()
        )?;
    }
    writeln!(writer, "{}", "=".repeat(80))?;

    Ok(())
}

/// Raw markup can be long and multi-line; show only its first line, shortened.
fn source_label(source: &str) -> String {
    const MAX: usize = 60;
    let first_line = source.lines().next().unwrap_or_default().trim();
    let multi_line = source.trim().lines().nth(1).is_some();
    if first_line.chars().count() > MAX {
        let head: String = first_line.chars().take(MAX).collect();
        format!("{head}...")
    } else if multi_line {
        format!("{first_line} ...")
    } else {
        first_line.to_owned()
    }
}
