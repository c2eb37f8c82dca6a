use crate::config::expand_braces;
use crate::{ConfigError, GraphQLConfig, ProjectConfig, Result};
use std::path::{Path, PathBuf};

/// Recognized config file names, searched in this order within each directory.
const CONFIG_FILES: &[&str] = &[
    ".graphqlrc.yml",
    ".graphqlrc.yaml",
    ".graphqlrc.json",
    ".graphqlrc",
    "graphql.config.yml",
    "graphql.config.yaml",
    "graphql.config.json",
];

/// How a config file's contents are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Yaml,
    Json,
    /// Extensionless `.graphqlrc`: YAML, then JSON.
    Either,
}

impl ConfigFormat {
    fn detect(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml" | "yaml") => Some(Self::Yaml),
            Some("json") => Some(Self::Json),
            None if path.file_name().is_some_and(|name| name == ".graphqlrc") => {
                Some(Self::Either)
            }
            _ => None,
        }
    }

    fn decode(self, contents: &str, path: &Path) -> Result<GraphQLConfig> {
        let invalid = |message: String| ConfigError::Invalid {
            path: path.to_path_buf(),
            message,
        };
        let yaml = || -> Result<GraphQLConfig> {
            serde_saphyr::from_str(contents).map_err(|e| invalid(format!("YAML parse error: {e}")))
        };
        let json = || -> Result<GraphQLConfig> {
            serde_json::from_str(contents).map_err(|e| invalid(format!("JSON parse error: {e}")))
        };

        match self {
            Self::Yaml => yaml(),
            Self::Json => json(),
            Self::Either => yaml().or_else(|_| json()),
        }
    }
}

/// Walk up from `start_dir` to the first directory holding a config file.
#[tracing::instrument(fields(start = %start_dir.display()))]
pub fn find_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let found = start_dir.ancestors().find_map(|dir| {
        CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    });

    match found {
        Some(ref path) => tracing::info!(path = %path.display(), "Found config file"),
        None => tracing::debug!("No config file found"),
    }
    Ok(found)
}

/// Read and validate the config at `path`.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<GraphQLConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config = load_config_from_str(&contents, path)?;
    tracing::info!(projects = config.project_count(), "Config loaded");
    Ok(config)
}

/// Decode and validate config text. `path` picks the format and labels errors.
#[tracing::instrument(skip(contents), fields(path = %path.display(), size = contents.len()))]
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<GraphQLConfig> {
    let format =
        ConfigFormat::detect(path).ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
    tracing::trace!(?format, "Decoding config");

    let config = format.decode(contents, path)?;
    for (name, project) in config.projects() {
        check_project(name, project, path)?;
    }
    Ok(config)
}

/// Every schema entry must be a usable glob; documents and excludes too when present.
fn check_project(name: &str, project: &ProjectConfig, path: &Path) -> Result<()> {
    let schema = project.schema.paths();
    if schema.is_empty() || schema.iter().any(|entry| entry.trim().is_empty()) {
        return Err(ConfigError::Invalid {
            path: path.to_path_buf(),
            message: format!("Project '{name}' has an empty schema entry"),
        });
    }
    check_globs(&schema)?;

    match project.documents {
        Some(ref documents) => {
            let patterns = documents.patterns();
            if patterns.is_empty() || patterns.iter().any(|p| p.trim().is_empty()) {
                return Err(ConfigError::Invalid {
                    path: path.to_path_buf(),
                    message: format!("Project '{name}' has an empty document pattern"),
                });
            }
            check_globs(&patterns)?;
        }
        // Still usable when documents are passed on the command line
        None => tracing::warn!(project = name, "Project has no documents configured"),
    }

    if let Some(ref excludes) = project.exclude {
        let excludes: Vec<&str> = excludes.iter().map(String::as_str).collect();
        check_globs(&excludes)?;
    }
    Ok(())
}

fn check_globs(patterns: &[&str]) -> Result<()> {
    for pattern in patterns {
        for expanded in expand_braces(pattern) {
            glob::Pattern::new(&expanded).map_err(|e| ConfigError::Pattern {
                pattern: (*pattern).to_string(),
                message: e.to_string(),
            })?;
        }
    }
    Ok(())
}
