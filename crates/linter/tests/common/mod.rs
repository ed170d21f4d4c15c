//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::path::Path;

use graphql_tag_linter::{Diagnostic, LintConfig, Linter, OptionGroup, RuleEntry, RuleKind};
use graphql_tag_test_utils::{format_diagnostics, TEST_INTROSPECTION};
use graphql_tag_types::RuleSeverity;

/// Option group with the test schema inlined as an introspection result.
pub fn group() -> OptionGroup {
    OptionGroup {
        schema_json: Some(serde_json::from_str(TEST_INTROSPECTION).unwrap()),
        ..OptionGroup::default()
    }
}

pub fn env_group(env: &str) -> OptionGroup {
    OptionGroup {
        env: Some(env.to_string()),
        ..group()
    }
}

/// Linter running only `kind` at error level.
pub fn linter(kind: RuleKind, groups: Vec<OptionGroup>) -> Linter {
    Linter::new(LintConfig::new([(
        kind,
        RuleEntry {
            severity: RuleSeverity::Error,
            groups,
        },
    )]))
}

pub fn lint(linter: &Linter, code: &str) -> Vec<Diagnostic> {
    lint_file(linter, "test.js", code)
}

pub fn lint_file(linter: &Linter, path: &str, code: &str) -> Vec<Diagnostic> {
    linter
        .lint_source(Path::new(path), code)
        .unwrap_or_else(|e| panic!("linting failed: {e}"))
}

pub fn messages(linter: &Linter, code: &str) -> Vec<String> {
    lint(linter, code).into_iter().map(|d| d.message).collect()
}

/// Assert `code` lints clean.
pub fn assert_valid(linter: &Linter, code: &str) {
    let diagnostics = lint(linter, code);
    assert!(
        diagnostics.is_empty(),
        "expected no diagnostics for {code:?}, got {diagnostics:#?}"
    );
}

pub fn format(diagnostics: &[Diagnostic]) -> String {
    format_diagnostics(
        diagnostics
            .iter()
            .map(|d| (d.location, d.rule.as_str(), d.message.as_str())),
    )
}
