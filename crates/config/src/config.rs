use crate::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Name under which a single-project config is exposed.
pub const DEFAULT_PROJECT: &str = "default";

/// Top-level GraphQL configuration.
/// Either a single project or multiple named projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphQLConfig {
    /// Multi-project configuration
    Multi {
        projects: HashMap<String, ProjectConfig>,
    },
    /// Single project configuration (boxed to reduce enum size)
    Single(Box<ProjectConfig>),
}

impl GraphQLConfig {
    /// Get all projects as an iterator.
    /// For single project configs, yields a single item with name "default".
    #[must_use]
    pub fn projects(&self) -> Box<dyn Iterator<Item = (&str, &ProjectConfig)> + '_> {
        match self {
            Self::Single(config) => Box::new(std::iter::once((DEFAULT_PROJECT, config.as_ref()))),
            Self::Multi { projects } => Box::new(
                projects
                    .iter()
                    .map(|(name, config)| (name.as_str(), config)),
            ),
        }
    }

    /// Get a specific project by name.
    /// For single project configs, returns the project if name is "default".
    #[must_use]
    pub fn get_project(&self, name: &str) -> Option<&ProjectConfig> {
        match self {
            Self::Single(config) if name == DEFAULT_PROJECT => Some(config.as_ref()),
            Self::Single(_) => None,
            Self::Multi { projects } => projects.get(name),
        }
    }

    /// Select a project, defaulting to "default" when no name is given.
    ///
    /// A multi-project config with exactly one project also resolves without
    /// a name.
    pub fn select_project(&self, name: Option<&str>) -> Result<(&str, &ProjectConfig)> {
        if let Some(name) = name {
            return self
                .projects()
                .find(|(candidate, _)| *candidate == name)
                .ok_or_else(|| ConfigError::UnknownProject(name.to_string()));
        }

        match self {
            Self::Single(config) => Ok((DEFAULT_PROJECT, config.as_ref())),
            Self::Multi { projects } if projects.len() == 1 => projects
                .iter()
                .next()
                .map(|(name, config)| (name.as_str(), config))
                .ok_or_else(|| ConfigError::UnknownProject(DEFAULT_PROJECT.to_string())),
            Self::Multi { projects } => projects
                .get_key_value(DEFAULT_PROJECT)
                .map(|(name, config)| (name.as_str(), config))
                .ok_or_else(|| ConfigError::UnknownProject(DEFAULT_PROJECT.to_string())),
        }
    }

    /// Check if this is a multi-project configuration
    #[must_use]
    pub const fn is_multi_project(&self) -> bool {
        matches!(self, Self::Multi { .. })
    }

    /// Get the number of projects
    #[must_use]
    pub fn project_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multi { projects } => projects.len(),
        }
    }
}

/// Configuration for a single GraphQL project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Schema source(s)
    pub schema: SchemaConfig,

    /// Document patterns (queries, mutations, fragments)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<DocumentsConfig>,

    /// File patterns to exclude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
}

impl ProjectConfig {
    /// Expand the schema patterns into existing files, relative to `base_dir`.
    pub fn schema_files(&self, base_dir: &Path) -> Result<Vec<PathBuf>> {
        self.resolve(&self.schema.paths(), base_dir)
    }

    /// Expand the document patterns into existing files, relative to `base_dir`.
    /// Returns an empty list when the project has no documents configured.
    pub fn document_files(&self, base_dir: &Path) -> Result<Vec<PathBuf>> {
        match self.documents {
            Some(ref documents) => self.resolve(&documents.patterns(), base_dir),
            None => Ok(Vec::new()),
        }
    }

    #[tracing::instrument(skip(self), fields(base = %base_dir.display()))]
    fn resolve(&self, patterns: &[&str], base_dir: &Path) -> Result<Vec<PathBuf>> {
        let excludes = self.exclude_patterns()?;
        let mut files = BTreeSet::new();

        for pattern in patterns {
            for expanded in expand_braces(pattern) {
                let full_pattern = base_dir.join(&expanded).display().to_string();
                let entries = glob::glob(&full_pattern).map_err(|e| ConfigError::Pattern {
                    pattern: full_pattern.clone(),
                    message: e.to_string(),
                })?;

                for entry in entries {
                    let path = entry.map_err(|e| ConfigError::Io(e.into()))?;
                    if !path.is_file() {
                        continue;
                    }
                    if path.components().any(|c| c.as_os_str() == "node_modules") {
                        continue;
                    }
                    let relative = path.strip_prefix(base_dir).unwrap_or(&path);
                    if excludes.iter().any(|ex| ex.matches_path(relative)) {
                        tracing::trace!(path = %path.display(), "Excluded");
                        continue;
                    }
                    files.insert(path);
                }
            }
        }

        tracing::debug!(files = files.len(), "Resolved patterns");
        Ok(files.into_iter().collect())
    }

    fn exclude_patterns(&self) -> Result<Vec<glob::Pattern>> {
        let Some(ref excludes) = self.exclude else {
            return Ok(Vec::new());
        };
        excludes
            .iter()
            .flat_map(|pattern| expand_braces(pattern))
            .map(|expanded| {
                glob::Pattern::new(&expanded).map_err(|e| ConfigError::Pattern {
                    pattern: expanded.clone(),
                    message: e.to_string(),
                })
            })
            .collect()
    }
}

/// Schema source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaConfig {
    /// Single file path or glob pattern
    Path(String),
    /// Multiple file paths or glob patterns
    Paths(Vec<String>),
}

impl SchemaConfig {
    /// Get all schema paths/patterns
    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        match self {
            Self::Path(path) => vec![path.as_str()],
            Self::Paths(paths) => paths.iter().map(String::as_str).collect(),
        }
    }
}

/// Documents source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentsConfig {
    /// Single pattern
    Pattern(String),
    /// Multiple patterns
    Patterns(Vec<String>),
}

impl DocumentsConfig {
    /// Get all document patterns
    #[must_use]
    pub fn patterns(&self) -> Vec<&str> {
        match self {
            Self::Pattern(pattern) => vec![pattern.as_str()],
            Self::Patterns(patterns) => patterns.iter().map(String::as_str).collect(),
        }
    }
}

/// Normalize a glob pattern for consistent matching
///
/// Handles:
/// - Leading "./" prefix (removes it)
/// - Leading "/" prefix (removes it - patterns are relative to the config)
/// - Consecutive slashes (collapses to single slash)
fn normalize_pattern(pattern: &str) -> String {
    let trimmed = pattern.trim();
    let trimmed = trimmed.strip_prefix("./").unwrap_or(trimmed);
    let mut normalized = trimmed.trim_start_matches('/').to_string();

    while normalized.contains("//") {
        normalized = normalized.replace("//", "/");
    }

    normalized
}

/// Expand brace patterns like "src/**/*.{graphql,gql}" into separate patterns
/// Also normalizes patterns for consistent matching
pub(crate) fn expand_braces(pattern: &str) -> Vec<String> {
    let normalized = normalize_pattern(pattern);

    // Simple brace expansion - handles single brace group
    if let (Some(start), Some(end)) = (normalized.find('{'), normalized.find('}')) {
        if start < end {
            let before = &normalized[..start];
            let after = &normalized[end + 1..];
            let options = &normalized[start + 1..end];

            return options
                .split(',')
                .map(|opt| format!("{}{}{}", before, opt.trim(), after))
                .collect();
        }
    }

    vec![normalized]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn project(schema: SchemaConfig, documents: Option<DocumentsConfig>) -> ProjectConfig {
        ProjectConfig {
            schema,
            documents,
            exclude: None,
        }
    }

    #[test]
    fn test_single_project_config() {
        let config = GraphQLConfig::Single(Box::new(project(
            SchemaConfig::Path("schema.graphql".to_string()),
            Some(DocumentsConfig::Pattern("**/*.graphql".to_string())),
        )));

        assert!(!config.is_multi_project());
        assert_eq!(config.project_count(), 1);
        assert!(config.get_project("default").is_some());
        assert!(config.get_project("other").is_none());
    }

    #[test]
    fn test_select_project() {
        let mut projects = HashMap::new();
        projects.insert(
            "frontend".to_string(),
            project(SchemaConfig::Path("frontend/schema.graphql".to_string()), None),
        );
        projects.insert(
            "backend".to_string(),
            project(SchemaConfig::Path("backend/schema.graphql".to_string()), None),
        );
        let config = GraphQLConfig::Multi { projects };

        let (name, _) = config.select_project(Some("backend")).unwrap();
        assert_eq!(name, "backend");
        assert!(matches!(
            config.select_project(Some("mobile")),
            Err(ConfigError::UnknownProject(_))
        ));
        // Two projects and none named "default"
        assert!(config.select_project(None).is_err());
    }

    #[test]
    fn test_select_sole_project_without_name() {
        let mut projects = HashMap::new();
        projects.insert(
            "api".to_string(),
            project(SchemaConfig::Path("schema.graphql".to_string()), None),
        );
        let config = GraphQLConfig::Multi { projects };

        let (name, _) = config.select_project(None).unwrap();
        assert_eq!(name, "api");
    }

    #[test]
    fn test_schema_and_documents_patterns() {
        let multiple = SchemaConfig::Paths(vec![
            "schema1.graphql".to_string(),
            "schema2.graphql".to_string(),
        ]);
        assert_eq!(multiple.paths(), vec!["schema1.graphql", "schema2.graphql"]);

        let docs = DocumentsConfig::Pattern("**/*.graphql".to_string());
        assert_eq!(docs.patterns(), vec!["**/*.graphql"]);
    }

    #[test]
    fn test_expand_braces() {
        assert_eq!(
            expand_braces("./src/**/*.{graphql, gql}"),
            vec!["src/**/*.graphql", "src/**/*.gql"]
        );
        assert_eq!(expand_braces("a//b.graphql"), vec!["a/b.graphql"]);
    }

    #[test]
    fn test_resolve_files_with_exclude() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("schema.graphql"), "type Query { a: Int }").unwrap();
        fs::create_dir_all(dir.path().join("ops/generated")).unwrap();
        fs::write(dir.path().join("ops/a.graphql"), "{ a }").unwrap();
        fs::write(dir.path().join("ops/b.gql"), "{ a }").unwrap();
        fs::write(dir.path().join("ops/generated/c.graphql"), "{ a }").unwrap();

        let config = ProjectConfig {
            schema: SchemaConfig::Path("schema.graphql".to_string()),
            documents: Some(DocumentsConfig::Pattern("ops/**/*.{graphql,gql}".to_string())),
            exclude: Some(vec!["ops/generated/**".to_string()]),
        };

        let schema = config.schema_files(dir.path()).unwrap();
        assert_eq!(schema, vec![dir.path().join("schema.graphql")]);

        let documents = config.document_files(dir.path()).unwrap();
        assert_eq!(
            documents,
            vec![dir.path().join("ops/a.graphql"), dir.path().join("ops/b.gql")]
        );
    }

    #[test]
    fn test_no_documents_configured() {
        let dir = tempfile::tempdir().unwrap();
        let config = project(SchemaConfig::Path("schema.graphql".to_string()), None);
        assert!(config.document_files(dir.path()).unwrap().is_empty());
    }
}
