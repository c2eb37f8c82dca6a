//! Coordinate usage command
//!
//! Counts, for every schema coordinate, how many documents reference it.
//! Useful for finding hot paths before a schema change and for spotting
//! fields that only one client still selects.

use super::{extract_documents, file_errors, paint_coordinate, print_human_errors, DocumentOutcome};
use crate::exit_code::ExitCode;
use crate::input::{InputArgs, LoadedInput};
use crate::{OutputFormat, OutputOptions};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// How many documents reference one coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoordinateUsage {
    pub coordinate: String,
    pub documents: usize,
}

#[tracing::instrument(skip_all, fields(project = ?project_name))]
pub fn run(
    input_args: &InputArgs,
    config_path: Option<&Path>,
    project_name: Option<&str>,
    format: OutputFormat,
    output: OutputOptions,
) -> Result<ExitCode> {
    let spinner = crate::progress::maybe_spinner(
        output.show_progress && matches!(format, OutputFormat::Human),
        "Loading schema and documents...",
    );
    let loaded = LoadedInput::load(input_args, config_path, project_name);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let input = loaded?;

    let outcomes = extract_documents(&input);
    let usage = count_usage(&outcomes);

    let failed = match format {
        OutputFormat::Human => {
            print_human(&usage, output.show_info);
            print_human_errors(&outcomes)
        }
        OutputFormat::Json => {
            let errors = file_errors(&outcomes);
            let failed = errors.len();
            let value = serde_json::json!({ "usage": usage, "errors": errors });
            println!("{}", serde_json::to_string_pretty(&value)?);
            failed
        }
    };

    Ok(if failed == 0 {
        ExitCode::Success
    } else {
        ExitCode::ExtractionError
    })
}

/// Document counts per coordinate, most used first, ties by coordinate.
pub fn count_usage(outcomes: &[DocumentOutcome]) -> Vec<CoordinateUsage> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for outcome in outcomes {
        if let Ok(ref coordinates) = outcome.result {
            for coordinate in coordinates {
                *counts.entry(coordinate.to_string()).or_insert(0) += 1;
            }
        }
    }

    let mut usage: Vec<CoordinateUsage> = counts
        .into_iter()
        .map(|(coordinate, documents)| CoordinateUsage {
            coordinate,
            documents,
        })
        .collect();
    usage.sort_by(|a, b| {
        b.documents
            .cmp(&a.documents)
            .then_with(|| a.coordinate.cmp(&b.coordinate))
    });
    usage
}

fn print_human(usage: &[CoordinateUsage], show_info: bool) {
    if show_info {
        println!();
        println!("{}", "Schema Coordinate Usage".bold());
        println!("{}", "=======================".dimmed());
        println!();
    }

    let width = usage
        .first()
        .map_or(1, |top| top.documents.to_string().len());
    for entry in usage {
        println!(
            "  {:>width$}  {}",
            entry.documents,
            paint_coordinate(&entry.coordinate)
        );
    }
}
