use crate::{ConfigError, GraphQLConfig, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names, most preferred first.
pub const CONFIG_FILES: &[&str] = &[
    ".graphqlrc.yml",
    ".graphqlrc.yaml",
    ".graphqlrc.json",
    ".graphqlrc",
    "graphql.config.yml",
    "graphql.config.yaml",
    "graphql.config.json",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
    /// Extensionless `.graphqlrc`: YAML, falling back to JSON
    Either,
}

impl Format {
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
}

/// Nearest config file in `start_dir` or one of its ancestors.
#[tracing::instrument(fields(start = %start_dir.display()))]
pub fn find_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let found = start_dir.ancestors().find_map(|dir| {
        CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    });
    match &found {
        Some(path) => tracing::debug!(path = %path.display(), "Found graphql-config file"),
        None => tracing::debug!("No graphql-config file found"),
    }
    Ok(found)
}

/// Read and parse the config file at `path`.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<GraphQLConfig> {
    let contents = fs::read_to_string(path)?;
    let config = load_config_from_str(&contents, path)?;
    tracing::debug!(projects = config.project_count(), "Loaded graphql-config");
    Ok(config)
}

/// Parse config text; `path` picks the format and labels errors.
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<GraphQLConfig> {
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

    let config = match Format::detect(path) {
        Some(Format::Yaml) => yaml()?,
        Some(Format::Json) => json()?,
        Some(Format::Either) => yaml().or_else(|_| json())?,
        None => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    if let Some((name, _)) = config.projects().find(|(_, project)| {
        let pointers = project.schema.paths();
        pointers.is_empty() || pointers.iter().any(|p| p.trim().is_empty())
    }) {
        return Err(invalid(format!("Project '{name}' has an empty schema pointer")));
    }

    Ok(config)
}
