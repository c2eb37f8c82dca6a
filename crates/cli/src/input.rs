//! Resolving the schema and document files a command works on.
//!
//! Files come from the command line when given (`--schema`, positional
//! documents), otherwise from the `.graphqlrc` project config.

use anyhow::{Context, Result};
use graphql_config::{find_config, load_config, ProjectConfig};
use graphql_coordinates::PreparedSchema;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File selection shared by every command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InputArgs {
    /// Document files or glob patterns (defaults to the config's documents)
    #[arg(value_name = "DOCUMENTS")]
    pub documents: Vec<String>,

    /// Schema SDL file or glob pattern, repeatable (defaults to the config's schema)
    #[arg(short, long = "schema", value_name = "FILE")]
    pub schema: Vec<String>,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("No GraphQL config file found. Use --config to specify one or pass --schema.")]
    NoConfig,

    #[error("No schema files matched {0}")]
    NoSchemaFiles(String),

    #[error("No documents to extract. Pass document paths or configure `documents`.")]
    NoDocuments,

    #[error("Invalid glob pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
}

/// A source file read from disk.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

/// Everything a command needs: the prepared schema and the documents.
#[derive(Debug)]
pub struct LoadedInput {
    pub schema: PreparedSchema,
    pub schema_files: Vec<PathBuf>,
    pub documents: Vec<SourceFile>,
}

impl LoadedInput {
    /// Resolve, read, and build.
    #[tracing::instrument(skip_all, fields(project = ?project_name))]
    pub fn load(
        args: &InputArgs,
        config_path: Option<&Path>,
        project_name: Option<&str>,
    ) -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to read working directory")?;

        let needs_config = args.schema.is_empty() || args.documents.is_empty();
        let project = if needs_config {
            Some(load_project(config_path, project_name, &current_dir)?)
        } else {
            None
        };

        let schema_paths = if args.schema.is_empty() {
            let (config, base_dir) = project.as_ref().ok_or(InputError::NoConfig)?;
            let files = config.schema_files(base_dir)?;
            if files.is_empty() {
                return Err(InputError::NoSchemaFiles(config.schema.paths().join(", ")).into());
            }
            files
        } else {
            let files = expand_patterns(&args.schema, &current_dir)?;
            if files.is_empty() {
                return Err(InputError::NoSchemaFiles(args.schema.join(", ")).into());
            }
            files
        };

        let document_paths = if args.documents.is_empty() {
            let (config, base_dir) = project.as_ref().ok_or(InputError::NoConfig)?;
            config.document_files(base_dir)?
        } else {
            expand_patterns(&args.documents, &current_dir)?
        };
        if document_paths.is_empty() {
            return Err(InputError::NoDocuments.into());
        }

        let schema_sources = read_files(&schema_paths)?;
        let schema = PreparedSchema::from_sources(
            schema_sources
                .iter()
                .map(|file| (file.path.as_path(), file.text.as_str())),
        )
        .context("Failed to build schema")?;

        tracing::info!(
            schema_files = schema_paths.len(),
            documents = document_paths.len(),
            object_types = schema.index.type_count(),
            "Loaded input"
        );

        Ok(Self {
            schema,
            schema_files: schema_paths,
            documents: read_files(&document_paths)?,
        })
    }
}

/// Find and load the project config; returns the project and its base directory.
fn load_project(
    config_path: Option<&Path>,
    project_name: Option<&str>,
    current_dir: &Path,
) -> Result<(ProjectConfig, PathBuf)> {
    let config_path = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config(current_dir)
            .context("Failed to search for config")?
            .ok_or(InputError::NoConfig)?,
    };

    let config = load_config(&config_path).context("Failed to load config")?;
    let (name, project) = config.select_project(project_name)?;
    tracing::debug!(project = name, "Selected project");

    let base_dir = config_path
        .parent()
        .map_or_else(|| current_dir.to_path_buf(), Path::to_path_buf);
    Ok((project.clone(), base_dir))
}

/// Expand command-line paths and glob patterns relative to `base_dir`.
fn expand_patterns(patterns: &[String], base_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = std::collections::BTreeSet::new();

    for pattern in patterns {
        let full_pattern = base_dir.join(pattern).display().to_string();
        let entries = glob::glob(&full_pattern).map_err(|e| InputError::Pattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        for entry in entries {
            let path = entry.map_err(std::io::Error::from)?;
            if path.is_file() {
                files.insert(path);
            }
        }
    }

    Ok(files.into_iter().collect())
}

fn read_files(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    paths
        .iter()
        .map(|path| {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            Ok(SourceFile {
                path: path.clone(),
                text,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_expand_patterns_dedupes_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.graphql"), "{ b }").unwrap();
        fs::write(dir.path().join("a.graphql"), "{ a }").unwrap();

        let files = expand_patterns(
            &["*.graphql".to_string(), "a.graphql".to_string()],
            dir.path(),
        )
        .unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a.graphql"), dir.path().join("b.graphql")]
        );
    }

    #[test]
    fn test_load_from_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(".graphqlrc.yml"),
            "schema: schema/*.graphql\ndocuments: ops/*.graphql\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("schema")).unwrap();
        fs::create_dir_all(dir.path().join("ops")).unwrap();
        fs::write(dir.path().join("schema/query.graphql"), "type Query { me: User }").unwrap();
        fs::write(dir.path().join("schema/user.graphql"), "type User { id: ID }").unwrap();
        fs::write(dir.path().join("ops/me.graphql"), "{ me { id } }").unwrap();

        let input = LoadedInput::load(
            &InputArgs::default(),
            Some(&dir.path().join(".graphqlrc.yml")),
            None,
        )
        .unwrap();

        assert_eq!(input.schema_files.len(), 2);
        assert_eq!(input.documents.len(), 1);
        assert_eq!(
            input.schema.index.return_type("Query", "me").map(AsRef::as_ref),
            Some("User")
        );
    }

    #[test]
    fn test_missing_schema_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("op.graphql"), "{ a }").unwrap();
        let args = InputArgs {
            documents: vec![dir.path().join("op.graphql").display().to_string()],
            schema: vec![dir.path().join("nope.graphql").display().to_string()],
        };

        let err = LoadedInput::load(&args, None, None).unwrap_err();
        assert!(err.downcast_ref::<InputError>().is_some());
    }
}
