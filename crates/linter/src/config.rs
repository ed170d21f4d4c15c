//! Lint configuration: which rules run, at what severity, with which
//! option groups.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use graphql_tag_types::RuleSeverity;
use serde::Deserialize;

use crate::error::SetupError;
use crate::options::OptionGroup;
use crate::rule::RuleKind;

/// File names searched for, in order of preference.
pub const LINT_CONFIG_FILES: [&str; 3] = [
    ".graphql-tag-lint.yml",
    ".graphql-tag-lint.yaml",
    ".graphql-tag-lint.json",
];

/// Severity and option groups configured for one rule.
///
/// Accepts ESLint-style entries:
///
/// ```yaml
/// rules:
///   # Severity only, one empty option group
///   graphql/named-operations: warn
///
///   # Numeric severity
///   template-strings: 2
///
///   # [severity, group, group, ...]
///   graphql/template-strings:
///     - error
///     - env: apollo
///       schemaJsonFilepath: ./schema.json
///     - env: relay
///       schemaJsonFilepath: ./schema.json
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleEntry {
    pub severity: RuleSeverity,
    pub groups: Vec<OptionGroup>,
}

struct Severity(RuleSeverity);

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(SeverityVisitor)
    }
}

struct SeverityVisitor;

impl serde::de::Visitor<'_> for SeverityVisitor {
    type Value = Severity;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a severity ('off', 'warn', 'error', 0, 1 or 2)")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        RuleSeverity::from_name(value)
            .map(Severity)
            .ok_or_else(|| E::custom(format!("unknown severity: {value}")))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        RuleSeverity::from_level(value)
            .map(Severity)
            .ok_or_else(|| E::custom(format!("unknown severity: {value}")))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        u64::try_from(value)
            .map_err(|_| E::custom(format!("unknown severity: {value}")))
            .and_then(|value| self.visit_u64(value))
    }

    // YAML 1.1 readers turn a bare `off` into `false`.
    fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        if value {
            Err(E::custom("unknown severity: true"))
        } else {
            Ok(Severity(RuleSeverity::Off))
        }
    }
}

impl<'de> Deserialize<'de> for RuleEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, SeqAccess, Visitor};

        struct RuleEntryVisitor;

        impl<'de> Visitor<'de> for RuleEntryVisitor {
            type Value = RuleEntry;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a severity or an array [severity, ...option groups]")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let Severity(severity) = SeverityVisitor.visit_str(value)?;
                Ok(RuleEntry {
                    severity,
                    groups: Vec::new(),
                })
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let Severity(severity) = SeverityVisitor.visit_u64(value)?;
                Ok(RuleEntry {
                    severity,
                    groups: Vec::new(),
                })
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let Severity(severity) = SeverityVisitor.visit_i64(value)?;
                Ok(RuleEntry {
                    severity,
                    groups: Vec::new(),
                })
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let Severity(severity) = SeverityVisitor.visit_bool(value)?;
                Ok(RuleEntry {
                    severity,
                    groups: Vec::new(),
                })
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let Severity(severity) = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &"array with severity"))?;
                let mut groups = Vec::new();
                while let Some(group) = seq.next_element::<OptionGroup>()? {
                    groups.push(group);
                }
                Ok(RuleEntry { severity, groups })
            }
        }

        deserializer.deserialize_any(RuleEntryVisitor)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLintConfig {
    #[serde(default)]
    rules: BTreeMap<String, RuleEntry>,
}

/// Rule entries by rule.
#[derive(Debug, Clone, PartialEq)]
pub struct LintConfig {
    rules: BTreeMap<RuleKind, RuleEntry>,
}

impl Default for LintConfig {
    /// `graphql/template-strings` at error level, schema from graphql-config.
    fn default() -> Self {
        Self {
            rules: BTreeMap::from([(RuleKind::TemplateStrings, RuleEntry::default())]),
        }
    }
}

impl LintConfig {
    /// Configuration with exactly `rules`.
    #[must_use]
    pub fn new(rules: impl IntoIterator<Item = (RuleKind, RuleEntry)>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Parse configuration text; `path` picks the format and names the
    /// file in errors.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, SetupError> {
        let invalid = |message: String| SetupError::LintConfig {
            path: path.to_path_buf(),
            message,
        };
        let raw: RawLintConfig = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(contents)
                .map_err(|e| invalid(format!("JSON parse error: {e}")))?,
            _ => serde_saphyr::from_str(contents)
                .map_err(|e| invalid(format!("YAML parse error: {e}")))?,
        };

        let rules = raw
            .rules
            .into_iter()
            .map(|(id, entry)| {
                RuleKind::from_id(&id)
                    .map(|kind| (kind, entry))
                    .ok_or(SetupError::UnknownRule(id))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { rules })
    }

    /// Entry for `kind`, if configured.
    #[must_use]
    pub fn entry(&self, kind: RuleKind) -> Option<&RuleEntry> {
        self.rules.get(&kind)
    }

    /// Rules that are not turned off, in rule order.
    pub fn enabled_rules(&self) -> impl Iterator<Item = (RuleKind, &RuleEntry)> {
        self.rules
            .iter()
            .filter(|(_, entry)| entry.severity.is_enabled())
            .map(|(kind, entry)| (*kind, entry))
    }
}

/// Find a lint configuration file by walking up from `start_dir`.
#[must_use]
pub fn find_lint_config(start_dir: &Path) -> Option<PathBuf> {
    start_dir.ancestors().find_map(|dir| {
        LINT_CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    })
}

/// Read and parse the lint configuration at `path`.
pub fn load_lint_config(path: &Path) -> Result<LintConfig, SetupError> {
    let contents = fs::read_to_string(path).map_err(|e| SetupError::LintConfig {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let config = LintConfig::parse(&contents, path)?;
    tracing::debug!(
        path = %path.display(),
        rules = config.enabled_rules().count(),
        "Loaded lint configuration"
    );
    Ok(config)
}
