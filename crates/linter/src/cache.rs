//! Resolution of option groups, memoized per distinct group.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use graphql_config::{find_config, load_config};

use crate::dialect::Dialect;
use crate::error::SetupError;
use crate::options::{OptionGroup, ValidatorsOption};
use crate::schema::{
    schema_from_introspection, schema_from_introspection_file, schema_from_project,
    schema_from_sdl, SchemaRef,
};
use crate::validation::{lookup_rule, ValidationRule, SPECIFIED_RULES};

/// An option group with its schema loaded and validators bound.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// `None` when a graphql-config file exists but no project covers the
    /// file: templates are parsed but not validated.
    pub schema: Option<SchemaRef>,
    pub dialect: Option<Dialect>,
    pub tag_name: String,
    pub validators: Vec<Arc<dyn ValidationRule>>,
    pub infer_literals: bool,
}

/// Cache of resolved option groups and graphql-config project schemas.
///
/// Entries never change once written, so concurrent resolution of the same
/// group at worst computes it twice.
#[derive(Debug, Default)]
pub struct ConfigCache {
    resolved: RwLock<HashMap<String, Arc<ResolvedConfig>>>,
    project_schemas: RwLock<HashMap<(PathBuf, String), SchemaRef>>,
}

impl ConfigCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        if let Ok(mut resolved) = self.resolved.write() {
            resolved.clear();
        }
        if let Ok(mut schemas) = self.project_schemas.write() {
            schemas.clear();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resolved.read().map_or(0, |resolved| resolved.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve `group` for linting `file`.
    ///
    /// The `literal` dialect lints standalone GraphQL files that may belong
    /// to different graphql-config projects, so on a cache hit its project
    /// schema is looked up again for `file`.
    pub fn resolve(
        &self,
        group: &OptionGroup,
        file: &Path,
    ) -> Result<Arc<ResolvedConfig>, SetupError> {
        let key = group.cache_key();
        let cached = self
            .resolved
            .read()
            .ok()
            .and_then(|resolved| resolved.get(&key).cloned());

        if let Some(hit) = cached {
            let is_literal = group.env.as_deref() == Some(Dialect::Literal.as_str());
            if !is_literal || !uses_graphql_config(group) {
                tracing::trace!(key = %key, "Option group cache hit");
                return Ok(hit);
            }
            tracing::debug!(file = %file.display(), "Refreshing project schema for literal file");
            let schema = self.external_schema(group, file)?;
            return Ok(Arc::new(ResolvedConfig {
                schema,
                ..(*hit).clone()
            }));
        }

        tracing::debug!(key = %key, "Resolving option group");
        let resolved = Arc::new(self.resolve_uncached(group, file)?);
        if let Ok(mut cache) = self.resolved.write() {
            cache.insert(key, Arc::clone(&resolved));
        }
        Ok(resolved)
    }

    fn resolve_uncached(
        &self,
        group: &OptionGroup,
        file: &Path,
    ) -> Result<ResolvedConfig, SetupError> {
        if group.schema_source_count() > 1 {
            return Err(SetupError::ExclusiveSchemaSources);
        }

        let schema = if let Some(json) = &group.schema_json {
            Some(schema_from_introspection(json)?)
        } else if let Some(path) = &group.schema_json_filepath {
            Some(schema_from_introspection_file(path)?)
        } else if let Some(sdl) = &group.schema_string {
            Some(schema_from_sdl(sdl, "schemaString")?)
        } else {
            self.external_schema(group, file)?
        };

        let dialect = group
            .env
            .as_deref()
            .map(str::parse::<Dialect>)
            .transpose()?;

        let tag_name = group
            .tag_name
            .clone()
            .unwrap_or_else(|| Dialect::default_tag(dialect).to_string());

        let names: Vec<&str> = match &group.validators {
            Some(ValidatorsOption::All(_)) => SPECIFIED_RULES.to_vec(),
            Some(ValidatorsOption::List(names)) => names.iter().map(String::as_str).collect(),
            None => {
                let excluded = Dialect::excluded_validators(dialect);
                SPECIFIED_RULES
                    .into_iter()
                    .filter(|name| !excluded.contains(name))
                    .collect()
            }
        };
        let required_fields = group.required_fields.clone().unwrap_or_default();
        let validators = names
            .into_iter()
            .map(|name| lookup_rule(name, &required_fields))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            dialect = dialect.map(Dialect::as_str),
            tag = %tag_name,
            validators = validators.len(),
            has_schema = schema.is_some(),
            "Resolved option group"
        );

        Ok(ResolvedConfig {
            schema,
            dialect,
            tag_name,
            validators,
            infer_literals: group.infer_literals,
        })
    }

    /// Schema from the graphql-config file governing `file`.
    fn external_schema(
        &self,
        group: &OptionGroup,
        file: &Path,
    ) -> Result<Option<SchemaRef>, SetupError> {
        let file = absolute(file);
        let start = file
            .parent()
            .map_or_else(|| absolute(Path::new(".")), Path::to_path_buf);
        let config_path = find_config(&start)?.ok_or(SetupError::MissingSchema)?;
        let config = load_config(&config_path)?;
        let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

        let (name, project) = match &group.project_name {
            Some(name) => {
                let project =
                    config
                        .get_project(name)
                        .ok_or_else(|| SetupError::ProjectNotFound {
                            name: name.clone(),
                            path: config_path.clone(),
                        })?;
                (name.as_str(), project)
            }
            None => match config.project_for_file(&file, config_dir) {
                Some(found) => found,
                None => {
                    tracing::debug!(file = %file.display(), "No graphql-config project covers file");
                    return Ok(None);
                }
            },
        };

        let key = (config_path.clone(), name.to_string());
        let cached = self
            .project_schemas
            .read()
            .ok()
            .and_then(|schemas| schemas.get(&key).cloned());
        if let Some(schema) = cached {
            tracing::trace!(project = name, "Project schema cache hit");
            return Ok(Some(schema));
        }

        let schema = schema_from_project(project, config_dir, name)?;
        if let Ok(mut schemas) = self.project_schemas.write() {
            schemas.insert(key, Arc::clone(&schema));
        }
        Ok(Some(schema))
    }
}

fn uses_graphql_config(group: &OptionGroup) -> bool {
    group.schema_json.is_none() && group.schema_json_filepath.is_none() && group.schema_string.is_none()
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
}
