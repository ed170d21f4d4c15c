//! Realizing a schema from the configured source.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use apollo_compiler::validation::Valid;
use apollo_compiler::Schema;
use graphql_config::ProjectConfig;
use graphql_introspect::{introspection_from_json, introspection_to_sdl};

use crate::error::SetupError;

/// A validated schema shared between option groups and files.
pub type SchemaRef = Arc<Valid<Schema>>;

/// Builds a schema from an introspection query result.
pub fn schema_from_introspection(value: &serde_json::Value) -> Result<SchemaRef, SetupError> {
    let introspection = introspection_from_json(value).map_err(SetupError::InvalidIntrospection)?;
    schema_from_sdl(&introspection_to_sdl(&introspection), "introspection.graphql")
}

/// Reads an introspection result from a JSON file.
pub fn schema_from_introspection_file(path: &Path) -> Result<SchemaRef, SetupError> {
    let value = read_json(path)?;
    schema_from_introspection(&value)
}

/// Parses and validates SDL text. `name` shows up in error messages.
pub fn schema_from_sdl(sdl: &str, name: &str) -> Result<SchemaRef, SetupError> {
    match Schema::parse_and_validate(sdl, name) {
        Ok(schema) => {
            tracing::debug!(name, types = schema.types.len(), "Built schema");
            Ok(Arc::new(schema))
        }
        Err(with_errors) => Err(SetupError::InvalidSchema {
            name: name.to_string(),
            message: with_errors.errors.to_string(),
        }),
    }
}

/// Loads every schema pointer of a graphql-config project.
///
/// `.json` pointers are introspection results and are printed to SDL first;
/// all pieces are concatenated into one schema document.
pub fn schema_from_project(
    project: &ProjectConfig,
    config_dir: &Path,
    name: &str,
) -> Result<SchemaRef, SetupError> {
    let files = project.schema_files(config_dir)?;
    let mut sdl = String::new();

    for file in &files {
        let piece = if is_json(file) {
            let value = read_json(file)?;
            let introspection =
                introspection_from_json(&value).map_err(SetupError::InvalidIntrospection)?;
            introspection_to_sdl(&introspection)
        } else {
            fs::read_to_string(file).map_err(|e| SetupError::SchemaFile {
                path: file.clone(),
                message: e.to_string(),
            })?
        };
        if !sdl.is_empty() {
            sdl.push('\n');
        }
        sdl.push_str(&piece);
    }

    tracing::debug!(project = name, files = files.len(), "Loaded project schema");
    schema_from_sdl(&sdl, name)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read_json(path: &Path) -> Result<serde_json::Value, SetupError> {
    let text = fs::read_to_string(path).map_err(|e| SetupError::SchemaFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| SetupError::SchemaFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_tag_test_utils::{TEST_INTROSPECTION, TEST_SCHEMA};

    #[test]
    fn builds_schema_from_sdl() {
        let schema = schema_from_sdl(TEST_SCHEMA, "schema.graphql").unwrap();
        assert!(schema.types.contains_key("Greetings"));
    }

    #[test]
    fn reports_invalid_sdl() {
        let err = schema_from_sdl("type Query { a: Missing }", "broken.graphql").unwrap_err();
        assert!(matches!(err, SetupError::InvalidSchema { ref name, .. } if name == "broken.graphql"));
    }

    #[test]
    fn builds_schema_from_introspection() {
        let value: serde_json::Value = serde_json::from_str(TEST_INTROSPECTION).unwrap();
        let schema = schema_from_introspection(&value).unwrap();
        assert!(schema.types.contains_key("Query"));
    }

    #[test]
    fn rejects_payload_without_schema() {
        let err = schema_from_introspection(&serde_json::json!({ "data": {} })).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please pass a valid GraphQL introspection query result."
        );
    }

    #[test]
    fn reads_introspection_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        fs::write(&path, TEST_INTROSPECTION).unwrap();
        let schema = schema_from_introspection_file(&path).unwrap();
        assert!(schema.types.contains_key("Query"));

        let missing = schema_from_introspection_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, SetupError::SchemaFile { .. }));
    }

    #[test]
    fn concatenates_project_schema_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.graphql"), "type Query { a: A }").unwrap();
        fs::write(dir.path().join("b.graphql"), "type A { id: ID }").unwrap();
        let config = graphql_config::load_config_from_str(
            "schema: \"*.graphql\"\n",
            &dir.path().join(".graphqlrc.yml"),
        )
        .unwrap();
        let project = config.get_project(graphql_config::DEFAULT_PROJECT).unwrap();

        let schema = schema_from_project(project, dir.path(), "default").unwrap();
        assert!(schema.types.contains_key("A"));
    }
}
