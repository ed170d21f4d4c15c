//! Tagged template extraction for JavaScript and TypeScript sources.
//!
//! The linter never looks at host-language semantics beyond what is needed
//! to find `tag`-prefixed template literals. This crate parses a file with
//! swc and records, for every tagged template, the shape of its tag, its
//! static chunks and the spans of its interpolations. Variable declarators
//! with static initializers are recorded too so that simple string constants
//! can be resolved when literal inference is enabled.

mod error;
mod escape;
mod extractor;
mod file;
mod template;

pub use error::{ExtractError, Result};
pub use escape::{cook_js, unescape_js, CookedText};
pub use extractor::extract_from_source;
pub use file::{Bindings, ExtractedFile};
pub use template::{Interpolation, Quasi, StaticExpr, TagExpr, TaggedTemplate, Template};

// Re-export types from graphql-tag-types for convenience
pub use graphql_tag_types::{Language, OffsetRange, SourceLocation};
