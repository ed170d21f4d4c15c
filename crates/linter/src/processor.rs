//! File-mode processors for standalone `.graphql` files.
//!
//! The file text is wrapped in a template tagged with [`INTERNAL_TAG`] so
//! the regular template pipeline can lint it.

use std::path::Path;

use crate::diagnostics::Diagnostic;
use crate::rule::RuleKind;

/// Tag used for the wrapped file text.
pub const INTERNAL_TAG: &str = "GraphQLTagLintFile";

/// Extensions linted through the processors.
pub const PROCESSED_EXTENSIONS: [&str; 2] = ["graphql", "gql"];

#[must_use]
pub fn is_processed(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PROCESSED_EXTENSIONS.contains(&ext))
}

/// Wrap a GraphQL file in a tagged template.
#[must_use]
pub fn preprocess(text: &str) -> String {
    let mut wrapped = String::with_capacity(INTERNAL_TAG.len() + text.len() + 2);
    wrapped.push_str(INTERNAL_TAG);
    wrapped.push('`');
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' | '`' => wrapped.push('\\'),
            '$' if chars.peek() == Some(&'{') => wrapped.push('\\'),
            _ => {}
        }
        wrapped.push(c);
    }
    wrapped.push('`');
    wrapped
}

/// Flatten per-block diagnostics, keeping only the ones from our rules.
#[must_use]
pub fn postprocess(messages: Vec<Vec<Diagnostic>>) -> Vec<Diagnostic> {
    let ids: Vec<String> = RuleKind::ALL.into_iter().map(RuleKind::qualified_id).collect();
    messages
        .into_iter()
        .flatten()
        .filter(|diagnostic| ids.contains(&diagnostic.rule))
        .collect()
}

#[cfg(test)]
mod tests {
    use graphql_tag_extract::{extract_from_source, unescape_js, Language};
    use graphql_tag_types::{DiagnosticSeverity, OffsetRange, SourceLocation};

    use super::*;
    use crate::diagnostics::{NodeRef, Report};

    #[test]
    fn wraps_plain_text() {
        assert_eq!(preprocess("{ a }"), "GraphQLTagLintFile`{ a }`");
    }

    #[test]
    fn escapes_template_syntax() {
        assert_eq!(
            preprocess("a ` b \\ c ${d} $e"),
            "GraphQLTagLintFile`a \\` b \\\\ c \\${d} $e`"
        );
    }

    #[test]
    fn wrapped_text_extracts_as_one_chunk() {
        let text = "# a `quoted` ${thing}\nquery { a }\n";
        let file = extract_from_source(&preprocess(text), Language::JavaScript).unwrap();
        assert_eq!(file.templates.len(), 1);
        let template = &file.templates[0].template;
        assert!(template.expressions.is_empty());
        assert_eq!(unescape_js(&template.quasis[0].text), text);
    }

    #[test]
    fn recognizes_graphql_files() {
        assert!(is_processed(Path::new("a/b.graphql")));
        assert!(is_processed(Path::new("b.gql")));
        assert!(!is_processed(Path::new("b.js")));
        assert!(!is_processed(Path::new("graphql")));
    }

    #[test]
    fn keeps_only_our_rules() {
        let diagnostic = |rule: &str| {
            Diagnostic::from_report(
                rule,
                DiagnosticSeverity::Error,
                Report::new(
                    "message",
                    NodeRef::tagged_template(OffsetRange::new(0, 1)),
                    SourceLocation::new(1, 1),
                ),
            )
        };
        let kept = postprocess(vec![
            vec![diagnostic("graphql/template-strings"), diagnostic("semi")],
            vec![diagnostic("graphql/named-operations")],
        ]);
        let rules: Vec<&str> = kept.iter().map(|d| d.rule.as_str()).collect();
        assert_eq!(rules, ["graphql/template-strings", "graphql/named-operations"]);
    }
}
