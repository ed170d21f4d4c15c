//! Lint configuration files driving a whole session.

use std::fs;

use graphql_tag_linter::{find_lint_config, load_lint_config, DiagnosticSeverity, Linter};
use graphql_tag_test_utils::{format_diagnostics, TEST_INTROSPECTION};

#[test]
fn yaml_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("schema.json");
    fs::write(&schema, TEST_INTROSPECTION).unwrap();
    fs::write(
        dir.path().join(".graphql-tag-lint.yml"),
        format!(
            "rules:\n  graphql/template-strings:\n    - error\n    - env: apollo\n      schemaJsonFilepath: {path}\n  graphql/named-operations:\n    - warn\n    - schemaJsonFilepath: {path}\n  graphql/no-deprecated-fields: off\n",
            path = schema.display()
        ),
    )
    .unwrap();

    let path = find_lint_config(&dir.path().join("src")).unwrap();
    let linter = Linter::new(load_lint_config(&path).unwrap());
    let diagnostics = linter
        .lint_source(
            &dir.path().join("src/app.js"),
            "const a = gql`{ greetings { hi } }`;\nconst b = gql`query B { nope }`;\n",
        )
        .unwrap();

    assert_eq!(diagnostics[0].severity, DiagnosticSeverity::Warning);
    assert_eq!(diagnostics[1].severity, DiagnosticSeverity::Error);
    insta::assert_snapshot!(
        format_diagnostics(diagnostics.iter().map(|d| (d.location, &d.rule, &d.message))),
        @r#"
    [1] 1:15 graphql/named-operations: All operations must be named
    [2] 2:25 graphql/template-strings: Cannot query field "nope" on type "Query".
    "#
    );
}

#[test]
fn json_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".graphql-tag-lint.json");
    let config = serde_json::json!({
        "rules": {
            "required-fields": [2, {
                "schemaJson": serde_json::from_str::<serde_json::Value>(TEST_INTROSPECTION).unwrap(),
                "requiredFields": ["id"]
            }]
        }
    });
    fs::write(&path, config.to_string()).unwrap();

    let linter = Linter::new(load_lint_config(&path).unwrap());
    let diagnostics = linter
        .lint_source(
            &dir.path().join("a.js"),
            "gql`query { greetings { hello } }`",
        )
        .unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "'id' field required on 'greetings'");
}
