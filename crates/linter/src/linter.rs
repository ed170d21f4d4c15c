//! Lint session: runs the configured rules over files.

use std::path::Path;

use graphql_tag_extract::{extract_from_source, ExtractedFile, Language};

use crate::cache::ConfigCache;
use crate::config::LintConfig;
use crate::diagnostics::Diagnostic;
use crate::error::LintError;
use crate::processor::{is_processed, postprocess, preprocess};
use crate::rule::RuleDispatch;

/// Owns the lint configuration and the option-group cache for a run.
#[derive(Debug, Default)]
pub struct Linter {
    config: LintConfig,
    cache: ConfigCache,
}

impl Linter {
    #[must_use]
    pub fn new(config: LintConfig) -> Self {
        Self {
            config,
            cache: ConfigCache::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &LintConfig {
        &self.config
    }

    #[must_use]
    pub const fn cache(&self) -> &ConfigCache {
        &self.cache
    }

    /// Lint one file, sorted by location.
    ///
    /// Standalone GraphQL files are wrapped first. Files of other types
    /// yield nothing.
    #[tracing::instrument(skip(self, source), fields(path = %path.display()))]
    pub fn lint_source(&self, path: &Path, source: &str) -> Result<Vec<Diagnostic>, LintError> {
        let extract = |text: &str, language| {
            extract_from_source(text, language).map_err(|source| LintError::Extract {
                path: path.to_path_buf(),
                source,
            })
        };

        let mut diagnostics = if is_processed(path) {
            let file = extract(&preprocess(source), Language::JavaScript)?;
            postprocess(vec![self.run_rules(&file, path)?])
        } else {
            match Language::from_path(path) {
                Some(language) if language.is_js_family() => {
                    let file = extract(source, language)?;
                    self.run_rules(&file, path)?
                }
                _ => {
                    tracing::warn!("Skipping file with unsupported extension");
                    return Ok(Vec::new());
                }
            }
        };

        diagnostics.sort_by(|a, b| a.location.cmp(&b.location).then_with(|| a.rule.cmp(&b.rule)));
        tracing::debug!(diagnostics = diagnostics.len(), "Linted file");
        Ok(diagnostics)
    }

    fn run_rules(&self, file: &ExtractedFile, path: &Path) -> Result<Vec<Diagnostic>, LintError> {
        if file.templates.is_empty() {
            return Ok(Vec::new());
        }

        let mut diagnostics = Vec::new();
        for (kind, entry) in self.config.enabled_rules() {
            let Some(severity) = entry.severity.to_diagnostic_severity() else {
                continue;
            };
            let dispatch = RuleDispatch::new(kind, &entry.groups, &self.cache, path)?;
            let rule = kind.qualified_id();
            diagnostics.extend(
                dispatch
                    .check_file(file)
                    .into_iter()
                    .map(|report| Diagnostic::from_report(rule.as_str(), severity, report)),
            );
        }
        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use graphql_tag_test_utils::TEST_SCHEMA;
    use graphql_tag_types::{DiagnosticSeverity, RuleSeverity, SourceLocation};

    use super::*;
    use crate::config::RuleEntry;
    use crate::options::OptionGroup;
    use crate::rule::RuleKind;

    fn group() -> OptionGroup {
        OptionGroup {
            schema_string: Some(TEST_SCHEMA.to_string()),
            ..OptionGroup::default()
        }
    }

    fn linter(rules: &[(RuleKind, RuleSeverity)]) -> Linter {
        Linter::new(LintConfig::new(rules.iter().map(|(kind, severity)| {
            (
                *kind,
                RuleEntry {
                    severity: *severity,
                    groups: vec![group()],
                },
            )
        })))
    }

    #[test]
    fn lints_javascript() {
        let linter = linter(&[
            (RuleKind::TemplateStrings, RuleSeverity::Error),
            (RuleKind::NamedOperations, RuleSeverity::Warn),
        ]);
        let diagnostics = linter
            .lint_source(Path::new("a.js"), "const q = gql`{ missing }`;")
            .unwrap();

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].rule, "graphql/named-operations");
        assert_eq!(diagnostics[0].severity, DiagnosticSeverity::Warning);
        assert_eq!(diagnostics[0].location, SourceLocation::new(1, 15));
        assert_eq!(diagnostics[1].rule, "graphql/template-strings");
        assert_eq!(diagnostics[1].location, SourceLocation::new(1, 17));
    }

    #[test]
    fn disabled_rules_do_not_run() {
        let linter = linter(&[(RuleKind::NamedOperations, RuleSeverity::Off)]);
        let diagnostics = linter
            .lint_source(Path::new("a.ts"), "const q: string = gql`{ number }`;")
            .unwrap();
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn graphql_files_use_file_coordinates() {
        let linter = Linter::new(LintConfig::new([(
            RuleKind::TemplateStrings,
            RuleEntry {
                severity: RuleSeverity::Error,
                groups: vec![OptionGroup {
                    env: Some("literal".to_string()),
                    ..group()
                }],
            },
        )]));
        let diagnostics = linter
            .lint_source(
                Path::new("query.graphql"),
                "# `ticks` and ${braces}\nquery Q {\n  missing\n}\n",
            )
            .unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Cannot query field \"missing\" on type \"Query\"."
        );
        assert_eq!(diagnostics[0].location, SourceLocation::new(3, 3));
    }

    #[test]
    fn host_syntax_errors_are_per_file() {
        let linter = linter(&[(RuleKind::TemplateStrings, RuleSeverity::Error)]);
        let error = linter
            .lint_source(Path::new("broken.js"), "const = gql`{ a }`")
            .unwrap_err();
        assert!(!error.is_setup());
    }

    #[test]
    fn setup_errors_are_fatal() {
        let linter = Linter::new(LintConfig::new([(
            RuleKind::TemplateStrings,
            RuleEntry {
                severity: RuleSeverity::Error,
                groups: vec![OptionGroup {
                    env: Some("nope".to_string()),
                    ..group()
                }],
            },
        )]));
        let error = linter
            .lint_source(Path::new("a.js"), "gql`{ number }`")
            .unwrap_err();
        assert!(error.is_setup());
    }

    #[test]
    fn other_files_are_skipped() {
        let linter = linter(&[(RuleKind::TemplateStrings, RuleSeverity::Error)]);
        assert!(linter
            .lint_source(Path::new("README.md"), "gql`{ missing }`")
            .unwrap()
            .is_empty());
    }
}
