pub mod extract;
pub mod usage;

use crate::input::{LoadedInput, SourceFile};
use colored::Colorize;
use graphql_coordinates::{extract_from_document, parse_document, CoordinateError, CoordinateSet};
use serde::Serialize;
use std::path::PathBuf;

/// Extraction result for one document file.
pub struct DocumentOutcome {
    pub path: PathBuf,
    pub result: Result<CoordinateSet, CoordinateError>,
}

/// A failed document, as reported in JSON output.
#[derive(Debug, Serialize)]
pub struct FileError {
    pub file: String,
    pub message: String,
}

/// Extract every loaded document against the loaded schema.
///
/// A failing document does not stop the others.
pub fn extract_documents(input: &LoadedInput) -> Vec<DocumentOutcome> {
    input
        .documents
        .iter()
        .map(|SourceFile { path, text }| {
            let source_name = path.display().to_string();
            let result = parse_document(text, &source_name)
                .and_then(|document| extract_from_document(&document, &input.schema));
            if let Err(ref e) = result {
                tracing::debug!(file = %source_name, error = %e, "Extraction failed");
            }
            DocumentOutcome {
                path: path.clone(),
                result,
            }
        })
        .collect()
}

/// Collect failures for JSON output.
pub fn file_errors(outcomes: &[DocumentOutcome]) -> Vec<FileError> {
    outcomes
        .iter()
        .filter_map(|outcome| {
            outcome.result.as_ref().err().map(|e| FileError {
                file: outcome.path.display().to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

/// Print failures to stderr in human format. Returns how many there were.
pub fn print_human_errors(outcomes: &[DocumentOutcome]) -> usize {
    let mut count = 0;
    for outcome in outcomes {
        if let Err(ref e) = outcome.result {
            count += 1;
            eprintln!(
                "{} {}: {}",
                "✗".red(),
                outcome.path.display().to_string().bold(),
                e
            );
        }
    }
    count
}

/// Render `Type.field` with the type dimmed.
fn paint_coordinate(coordinate: &str) -> String {
    match coordinate.split_once('.') {
        Some((type_name, field_name)) => format!("{}.{}", type_name.dimmed(), field_name),
        None => coordinate.cyan().to_string(),
    }
}
