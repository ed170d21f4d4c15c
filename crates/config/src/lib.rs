//! graphql-config support.
//!
//! Locates and loads `.graphqlrc` / `graphql.config.*` files, selects the
//! project that applies to a linted file, and expands a project's schema
//! pointers into concrete files.

mod config;
mod error;
mod loader;

pub use config::{DocumentsConfig, GraphQLConfig, ProjectConfig, SchemaConfig, DEFAULT_PROJECT};
pub use error::{ConfigError, Result};
pub use loader::{find_config, load_config, load_config_from_str, CONFIG_FILES};
