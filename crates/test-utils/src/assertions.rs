//! Snapshot helpers for diagnostics.
//!
//! Diagnostics are rendered one per line so that insta snapshots stay
//! readable and diff well.

use std::fmt::Display;

/// Format located diagnostics for snapshot testing.
///
/// Each item is `(location, rule, message)`.
///
/// ```
/// use graphql_tag_test_utils::format_diagnostics;
///
/// let formatted = format_diagnostics([("3:5", "graphql/template-strings", "Unknown field")]);
/// assert_eq!(formatted, "[1] 3:5 graphql/template-strings: Unknown field");
/// ```
pub fn format_diagnostics<I, L, R, M>(diagnostics: I) -> String
where
    I: IntoIterator<Item = (L, R, M)>,
    L: Display,
    R: Display,
    M: Display,
{
    let lines: Vec<String> = diagnostics
        .into_iter()
        .enumerate()
        .map(|(i, (location, rule, message))| format!("[{}] {location} {rule}: {message}", i + 1))
        .collect();
    if lines.is_empty() {
        return String::from("(no diagnostics)");
    }
    lines.join("\n")
}

/// Format diagnostics with their messages only (without position info).
pub fn format_diagnostic_messages<T: AsRef<str>>(messages: &[T]) -> String {
    if messages.is_empty() {
        return String::from("(no diagnostics)");
    }

    messages
        .iter()
        .enumerate()
        .map(|(i, m)| format!("[{}] {}", i + 1, m.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
