//! Coordinate extraction command
//!
//! Prints the schema coordinates referenced by the selected documents, either
//! as one merged set or per file.

use super::{extract_documents, file_errors, paint_coordinate, print_human_errors, DocumentOutcome};
use crate::exit_code::ExitCode;
use crate::input::{InputArgs, LoadedInput};
use crate::{OutputFormat, OutputOptions};
use anyhow::Result;
use colored::Colorize;
use graphql_coordinates::CoordinateSet;
use std::collections::BTreeMap;
use std::path::Path;

#[tracing::instrument(skip_all, fields(project = ?project_name, per_file = per_file))]
pub fn run(
    input_args: &InputArgs,
    config_path: Option<&Path>,
    project_name: Option<&str>,
    format: OutputFormat,
    per_file: bool,
    output: OutputOptions,
) -> Result<ExitCode> {
    let start_time = std::time::Instant::now();

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
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();

    match format {
        OutputFormat::Human => {
            print_human(&outcomes, per_file);
            print_human_errors(&outcomes);
            if output.show_info {
                print_summary(&outcomes, failed, input.schema_files.len(), start_time.elapsed());
            }
        }
        OutputFormat::Json => print_json(&outcomes, per_file)?,
    }

    Ok(if failed == 0 {
        ExitCode::Success
    } else {
        ExitCode::ExtractionError
    })
}

/// Union of every successfully extracted document.
pub fn merged(outcomes: &[DocumentOutcome]) -> CoordinateSet {
    let mut all = CoordinateSet::new();
    for outcome in outcomes {
        if let Ok(ref coordinates) = outcome.result {
            all.extend(coordinates.iter().cloned());
        }
    }
    all
}

fn print_human(outcomes: &[DocumentOutcome], per_file: bool) {
    if !per_file {
        for coordinate in merged(outcomes).to_sorted_strings() {
            println!("{}", paint_coordinate(&coordinate));
        }
        return;
    }

    for outcome in outcomes {
        let Ok(ref coordinates) = outcome.result else {
            continue;
        };
        println!("{}", outcome.path.display().to_string().bold());
        for coordinate in coordinates.to_sorted_strings() {
            println!("  {}", paint_coordinate(&coordinate));
        }
        println!();
    }
}

fn print_summary(
    outcomes: &[DocumentOutcome],
    failed: usize,
    schema_files: usize,
    duration: std::time::Duration,
) {
    let extracted = outcomes.len() - failed;
    let total = merged(outcomes).len();
    let line = format!(
        "{total} coordinates from {extracted} document(s) against {schema_files} schema file(s) in {:.2}s",
        duration.as_secs_f64()
    );
    if failed == 0 {
        eprintln!("{} {}", "✓".green(), line);
    } else {
        eprintln!("{} {} ({failed} failed)", "!".yellow(), line);
    }
}

fn print_json(outcomes: &[DocumentOutcome], per_file: bool) -> Result<()> {
    let errors = file_errors(outcomes);
    let value = if per_file {
        let files: BTreeMap<String, &CoordinateSet> = outcomes
            .iter()
            .filter_map(|o| {
                o.result
                    .as_ref()
                    .ok()
                    .map(|set| (o.path.display().to_string(), set))
            })
            .collect();
        serde_json::json!({ "files": files, "errors": errors })
    } else {
        serde_json::json!({ "coordinates": merged(outcomes), "errors": errors })
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
