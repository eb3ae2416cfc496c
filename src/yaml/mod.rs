//! YAML parsing with source-span diagnostics
//!
//! Hand-edited record files are the main input surface of `pft`, so parse
//! failures point at the offending line and suggest a fix where the mistake
//! is a known one.

use miette::{Diagnostic, IntoDiagnostic, NamedSource, Result, SourceSpan};
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;

/// YAML error with source location, rendered by miette
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(pft::yaml))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

/// Parse a YAML entity file, producing a span-labelled diagnostic on failure
pub fn parse_yaml_file<T: DeserializeOwned + 'static>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).into_diagnostic()?;
    serde_yml::from_str(&content)
        .map_err(|e| diagnose(&e, &content, &path.display().to_string()).into())
}

fn diagnose(err: &serde_yml::Error, source: &str, filename: &str) -> YamlSyntaxError {
    let offset = match err.location() {
        Some(loc) => line_col_to_offset(source, loc.line(), loc.column()),
        None => 0,
    };
    let message = err.to_string();

    YamlSyntaxError {
        src: NamedSource::new(filename, source.to_string()),
        span: SourceSpan::from(offset..offset.saturating_add(1)),
        help: generate_help(&message),
        message,
    }
}

// line and column are 1-based, as serde_yml reports them
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let skipped: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (skipped + column.saturating_sub(1)).min(source.len().saturating_sub(1))
}

/// Suggest fixes for common mistakes in hand-edited record files
fn generate_help(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    if msg.contains("tab") {
        return Some("Indent with spaces; YAML does not allow tab indentation.".to_string());
    }
    if msg.contains("invalid type: string") && msg.contains("bool") {
        return Some(
            "Checklist entries take bare booleans: `Purchase Request: true`, not quoted text."
                .to_string(),
        );
    }
    if msg.contains("naivedate") || msg.contains("date") {
        return Some("Dates use ISO format: YYYY-MM-DD (e.g., 2024-01-15).".to_string());
    }
    if msg.contains("unknown variant") {
        return Some(
            "Check the allowed values: status is active/archived, progress_status is \
             Pending/Success/Failed, procurement_type is SVP/Regular Bidding."
                .to_string(),
        );
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Shelf;
    use std::io::Write;

    #[test]
    fn test_parse_yaml_file_reports_location() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id: SHF-not-a-ulid\nname: bad").unwrap();

        let result: Result<Shelf> = parse_yaml_file(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_generate_help_for_tabs() {
        assert!(generate_help("found a tab character")
            .unwrap()
            .contains("spaces"));
        assert!(generate_help("something unrelated").is_none());
    }

    #[test]
    fn test_line_col_to_offset() {
        let src = "a: 1\nb: 2\n";
        assert_eq!(line_col_to_offset(src, 1, 1), 0);
        assert_eq!(line_col_to_offset(src, 2, 1), 5);
        assert_eq!(line_col_to_offset(src, 2, 4), 8);
    }
}
