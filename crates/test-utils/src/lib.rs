//! Shared fixtures and snapshot helpers for the graphql-tag-lint crates.

pub mod assertions;

pub use assertions::{format_diagnostic_messages, format_diagnostics};

/// Schema used throughout the tests, as SDL.
pub const TEST_SCHEMA: &str = include_str!("../fixtures/schema.graphql");

/// The same schema as an introspection query result.
pub const TEST_INTROSPECTION: &str = include_str!("../fixtures/schema.json");
