//! Foundation types for graphql-tag-lint.
//!
//! This crate provides shared types used across the linter stack.
//! It has zero external dependencies, making it suitable as a foundation layer.
//!
//! # Type Categories
//!
//! - **File types**: [`Language`]
//! - **Position types**: [`OffsetRange`], [`SourceLocation`], [`SourceSpan`], [`LineIndex`]
//! - **Severity types**: [`DiagnosticSeverity`], [`RuleSeverity`]

mod file;
mod line_index;
mod position;
mod severity;

pub use file::Language;
pub use line_index::LineIndex;
pub use position::{OffsetRange, SourceLocation, SourceSpan};
pub use severity::{DiagnosticSeverity, RuleSeverity};
