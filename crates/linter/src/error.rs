use std::path::PathBuf;

use graphql_config::ConfigError;
use graphql_introspect::IntrospectionError;
use graphql_tag_extract::ExtractError;
use thiserror::Error;

/// Problems with the lint configuration. These abort the whole run.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Invalid option for env, only `apollo`, `lokka`, `fraql`, `relay`, and `literal` supported.")]
    InvalidEnv,

    #[error("Options schemaJson, schemaJsonFilepath, schemaString and projectName are mutually exclusive.")]
    ExclusiveSchemaSources,

    #[error("Must provide GraphQL Config file or pass in `schemaJson` option with schema object or `schemaJsonFilepath` with absolute path to the json file.")]
    MissingSchema,

    #[error("Project with name \"{name}\" not found in {}.", path.display())]
    ProjectNotFound { name: String, path: PathBuf },

    #[error("Please pass a valid GraphQL introspection query result.")]
    InvalidIntrospection(#[source] IntrospectionError),

    #[error("Could not read schema file {}: {message}", path.display())]
    SchemaFile { path: PathBuf, message: String },

    #[error("Invalid schema {name}: {message}")]
    InvalidSchema { name: String, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Multiple options for GraphQL tag {0}.")]
    DuplicateTag(String),

    #[error("Unknown validator \"{0}\".")]
    UnknownValidator(String),

    #[error("Rule graphql/{rule} does not accept the `{option}` option.")]
    UnsupportedOption { rule: &'static str, option: &'static str },

    #[error("Rule graphql/required-fields requires the `requiredFields` option.")]
    MissingRequiredFields,

    #[error("Invalid options for graphql/{rule}: {message}")]
    InvalidOptions { rule: String, message: String },

    #[error("Unknown rule \"{0}\".")]
    UnknownRule(String),

    #[error("Invalid lint configuration {}: {message}", path.display())]
    LintConfig { path: PathBuf, message: String },
}

/// Errors from linting one file.
#[derive(Debug, Error)]
pub enum LintError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("{}: {source}", path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: ExtractError,
    },
}

impl LintError {
    /// Whether the error is fatal for the whole run rather than one file.
    #[must_use]
    pub const fn is_setup(&self) -> bool {
        matches!(self, Self::Setup(_))
    }
}
