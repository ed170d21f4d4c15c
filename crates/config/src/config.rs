use crate::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Name under which a single-project config exposes its project.
pub const DEFAULT_PROJECT: &str = "default";

/// Top-level GraphQL configuration.
/// Either a single project or multiple named projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphQLConfig {
    /// Multi-project configuration
    Multi {
        projects: BTreeMap<String, ProjectConfig>,
    },
    /// Single project configuration (boxed to reduce enum size)
    Single(Box<ProjectConfig>),
}

impl GraphQLConfig {
    /// Get all projects as an iterator.
    /// For single project configs, yields a single item named [`DEFAULT_PROJECT`].
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
    /// For single project configs, returns the project if name is [`DEFAULT_PROJECT`].
    #[must_use]
    pub fn get_project(&self, name: &str) -> Option<&ProjectConfig> {
        match self {
            Self::Single(config) if name == DEFAULT_PROJECT => Some(config.as_ref()),
            Self::Single(_) => None,
            Self::Multi { projects } => projects.get(name),
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

    /// Find the project that applies to a linted file.
    ///
    /// A single-project config applies to every file it does not exclude.
    /// In a multi-project config the first project (by name) whose
    /// `include`/`documents` patterns match the file wins.
    ///
    /// `config_dir` is the directory holding the config file; patterns are
    /// relative to it.
    #[must_use]
    pub fn project_for_file(
        &self,
        file: &Path,
        config_dir: &Path,
    ) -> Option<(&str, &ProjectConfig)> {
        let relative = file.strip_prefix(config_dir).unwrap_or(file);
        let relative = relative.to_string_lossy();

        match self {
            Self::Single(config) => {
                (!config.is_excluded(&relative)).then_some((DEFAULT_PROJECT, config.as_ref()))
            }
            Self::Multi { projects } => {
                let found = projects
                    .iter()
                    .find(|(_, config)| config.matches_file(&relative));
                tracing::debug!(
                    file = %relative,
                    project = found.map(|(name, _)| name.as_str()),
                    "Resolved project for file"
                );
                found.map(|(name, config)| (name.as_str(), config))
            }
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

    /// File patterns to include
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<DocumentsConfig>,

    /// File patterns to exclude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<DocumentsConfig>,

    /// Tool-specific extensions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<HashMap<String, serde_json::Value>>,
}

impl ProjectConfig {
    fn is_excluded(&self, relative: &str) -> bool {
        self.exclude
            .as_ref()
            .is_some_and(|exclude| matches_any(&exclude.patterns(), relative))
    }

    /// Whether a file (relative to the config directory) belongs to this project.
    ///
    /// `include` takes precedence over `documents` when both are given.
    #[must_use]
    pub fn matches_file(&self, relative: &str) -> bool {
        if self.is_excluded(relative) {
            return false;
        }
        self.include
            .as_ref()
            .or(self.documents.as_ref())
            .is_some_and(|patterns| matches_any(&patterns.patterns(), relative))
    }

    /// Expand the schema pointers into files, in declaration order.
    ///
    /// Plain paths must exist; glob patterns must match at least one file.
    /// URLs are rejected because schemas are never fetched over the network.
    pub fn schema_files(&self, config_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for pointer in self.schema.paths() {
            if pointer.starts_with("http://") || pointer.starts_with("https://") {
                return Err(ConfigError::RemoteSchema(pointer.to_string()));
            }

            let mut matched = false;
            for pattern in expand_braces(pointer) {
                let full = config_dir.join(&pattern);
                if !is_glob(&pattern) {
                    if full.is_file() {
                        files.push(full);
                        matched = true;
                    }
                    continue;
                }

                let full = full.to_string_lossy();
                let paths = glob::glob(&full).map_err(|e| ConfigError::InvalidPattern {
                    pattern: pointer.to_string(),
                    message: e.to_string(),
                })?;
                for path in paths.flatten() {
                    if path.is_file() {
                        files.push(path);
                        matched = true;
                    }
                }
            }

            if !matched {
                return Err(ConfigError::SchemaNotFound {
                    pattern: pointer.to_string(),
                    base: config_dir.to_path_buf(),
                });
            }
        }

        tracing::debug!(count = files.len(), "Expanded schema pointers");
        Ok(files)
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

/// A single pattern or a list of patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentsConfig {
    /// Single pattern
    Pattern(String),
    /// Multiple patterns
    Patterns(Vec<String>),
}

impl DocumentsConfig {
    /// Get all patterns
    #[must_use]
    pub fn patterns(&self) -> Vec<&str> {
        match self {
            Self::Pattern(pattern) => vec![pattern.as_str()],
            Self::Patterns(patterns) => patterns.iter().map(String::as_str).collect(),
        }
    }
}

fn matches_any(patterns: &[&str], relative: &str) -> bool {
    patterns.iter().any(|pattern| {
        expand_braces(pattern).iter().any(|expanded| {
            glob::Pattern::new(expanded).is_ok_and(|glob| glob.matches(relative))
        })
    })
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Strip a leading `./` or `/` and collapse repeated slashes
fn normalize_pattern(pattern: &str) -> String {
    let trimmed = pattern
        .strip_prefix("./")
        .or_else(|| pattern.strip_prefix('/'))
        .unwrap_or(pattern);

    let mut normalized = trimmed.to_string();
    while normalized.contains("//") {
        normalized = normalized.replace("//", "/");
    }
    normalized
}

/// Expand a single brace group like "src/**/*.{ts,tsx}" into separate patterns
fn expand_braces(pattern: &str) -> Vec<String> {
    let normalized = normalize_pattern(pattern);

    if let (Some(start), Some(end)) = (normalized.find('{'), normalized.find('}')) {
        if start < end {
            let before = &normalized[..start];
            let after = &normalized[end + 1..];
            return normalized[start + 1..end]
                .split(',')
                .map(|option| format!("{before}{}{after}", option.trim()))
                .collect();
        }
    }

    vec![normalized]
}
