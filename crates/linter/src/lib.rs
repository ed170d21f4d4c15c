//! Schema validation for GraphQL written in tagged template literals.
//!
//! Each template whose tag matches a configured option group is turned back
//! into a GraphQL document (interpolations become placeholders chosen by the
//! group's dialect), parsed, and validated against the group's schema. At
//! most one problem is reported per template, at its location in the host
//! file.

mod cache;
mod client_fields;
mod config;
mod diagnostics;
mod dialect;
mod error;
mod infer;
mod linter;
mod location;
mod options;
mod pipeline;
mod processor;
mod reconstruct;
mod rule;
mod schema;
mod tag;
pub mod validation;

pub use cache::{ConfigCache, ResolvedConfig};
pub use client_fields::strip_client_fields;
pub use config::{find_lint_config, load_lint_config, LintConfig, RuleEntry, LINT_CONFIG_FILES};
pub use diagnostics::{Diagnostic, NodeKind, NodeRef, Report};
pub use dialect::Dialect;
pub use error::{LintError, SetupError};
pub use infer::{infer_template, InferredLiteral};
pub use linter::Linter;
pub use location::{
    is_location_in_span, source_location_from_doc_location, transform_location, SourceMapEntry,
};
pub use options::{AllValidators, OptionGroup, ValidatorsOption};
pub use pipeline::handle_template;
pub use processor::{is_processed, postprocess, preprocess, INTERNAL_TAG, PROCESSED_EXTENSIONS};
pub use reconstruct::{
    placeholder, reconstruct, InterpolationError, InterpolationWidth, InvalidInterpolation,
    Reconstruction, Splice, FILLER,
};
pub use rule::{RuleDispatch, RuleKind, RULE_NAMESPACE};
pub use schema::{
    schema_from_introspection, schema_from_introspection_file, schema_from_project,
    schema_from_sdl, SchemaRef,
};
pub use tag::tag_matches;

pub use graphql_tag_types::{DiagnosticSeverity, RuleSeverity, SourceLocation};
