//! Output formatting for conversion outcomes.
//!
//! Provides functions to render a [`ConversionOutcome`] as JSON or plain text.

use crate::ConversionOutcome;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Formats the outcome into a string, without a trailing newline.
pub fn format_outcome(outcome: &ConversionOutcome, format: OutputFormat, pretty: bool) -> String {
    match format {
        OutputFormat::Json => format_json(outcome, pretty),
        OutputFormat::Text => format_text(outcome),
    }
}

// ----------------------- Internal formatting -----------------------

fn format_text(outcome: &ConversionOutcome) -> String {
    format!(
        "converted: {}\ncopied: {}\nfailed: {}\ntotal: {}",
        outcome.converted,
        outcome.copied,
        outcome.failed,
        outcome.total()
    )
}

fn format_json(outcome: &ConversionOutcome, pretty: bool) -> String {
    // Four integer fields can't fail to serialize; fall back to text anyway.
    let json = if pretty {
        serde_json::to_string_pretty(outcome)
    } else {
        serde_json::to_string(outcome)
    };
    json.unwrap_or_else(|_| format_text(outcome))
}
