//! The five rules and the option-group dispatch they share.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use graphql_tag_extract::{ExtractedFile, TaggedTemplate};

use crate::cache::{ConfigCache, ResolvedConfig};
use crate::diagnostics::Report;
use crate::error::SetupError;
use crate::options::{OptionGroup, ValidatorsOption};
use crate::pipeline::handle_template;
use crate::tag::tag_matches;

/// Namespace prefix of every rule id.
pub const RULE_NAMESPACE: &str = "graphql/";

/// One of the registered rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    TemplateStrings,
    NamedOperations,
    RequiredFields,
    CapitalizedTypeName,
    NoDeprecatedFields,
}

impl RuleKind {
    pub const ALL: [Self; 5] = [
        Self::TemplateStrings,
        Self::NamedOperations,
        Self::RequiredFields,
        Self::CapitalizedTypeName,
        Self::NoDeprecatedFields,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::TemplateStrings => "template-strings",
            Self::NamedOperations => "named-operations",
            Self::RequiredFields => "required-fields",
            Self::CapitalizedTypeName => "capitalized-type-name",
            Self::NoDeprecatedFields => "no-deprecated-fields",
        }
    }

    /// Id including the `graphql/` namespace.
    #[must_use]
    pub fn qualified_id(self) -> String {
        format!("{RULE_NAMESPACE}{}", self.id())
    }

    /// Look a rule up by id, with or without the namespace.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.strip_prefix(RULE_NAMESPACE).unwrap_or(id);
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// The validator a rule other than `template-strings` always runs.
    const fn fixed_validator(self) -> Option<&'static str> {
        match self {
            Self::TemplateStrings => None,
            Self::NamedOperations => Some("OperationsMustHaveNames"),
            Self::RequiredFields => Some("RequiredFields"),
            Self::CapitalizedTypeName => Some("typeNamesShouldBeCapitalized"),
            Self::NoDeprecatedFields => Some("noDeprecatedFields"),
        }
    }

    /// Check which options this rule accepts and pin its validator.
    pub fn effective_group(self, group: &OptionGroup) -> Result<OptionGroup, SetupError> {
        if group.validators.is_some() && self != Self::TemplateStrings {
            return Err(SetupError::UnsupportedOption {
                rule: self.id(),
                option: "validators",
            });
        }
        if group.required_fields.is_some() && self != Self::RequiredFields {
            return Err(SetupError::UnsupportedOption {
                rule: self.id(),
                option: "requiredFields",
            });
        }
        if self == Self::RequiredFields && group.required_fields.is_none() {
            return Err(SetupError::MissingRequiredFields);
        }

        let mut group = group.clone();
        if let Some(validator) = self.fixed_validator() {
            group.validators = Some(ValidatorsOption::names(&[validator]));
        }
        Ok(group)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A rule with its option groups resolved for one file.
#[derive(Debug, Clone)]
pub struct RuleDispatch {
    pub kind: RuleKind,
    configs: Vec<Arc<ResolvedConfig>>,
}

impl RuleDispatch {
    /// Resolve `groups` for `file`.
    ///
    /// No groups behaves as a single empty group. Two groups ending up with
    /// the same tag name are rejected.
    pub fn new(
        kind: RuleKind,
        groups: &[OptionGroup],
        cache: &ConfigCache,
        file: &Path,
    ) -> Result<Self, SetupError> {
        let default_group = [OptionGroup::default()];
        let groups = if groups.is_empty() {
            &default_group[..]
        } else {
            groups
        };

        let mut tags = HashSet::new();
        let mut configs = Vec::with_capacity(groups.len());
        for group in groups {
            let resolved = cache.resolve(&kind.effective_group(group)?, file)?;
            if !tags.insert(resolved.tag_name.clone()) {
                return Err(SetupError::DuplicateTag(resolved.tag_name.clone()));
            }
            configs.push(resolved);
        }

        Ok(Self { kind, configs })
    }

    /// Run the pipeline for `tagged` under the first group whose tag
    /// matches. Templates with other tags are skipped silently.
    #[must_use]
    pub fn check_template(&self, file: &ExtractedFile, tagged: &TaggedTemplate) -> Option<Report> {
        let config = self
            .configs
            .iter()
            .find(|config| tag_matches(&config.tag_name, &tagged.tag))?;
        handle_template(file, tagged, config)
    }

    /// Every report for `file`, in template order.
    #[must_use]
    pub fn check_file(&self, file: &ExtractedFile) -> Vec<Report> {
        file.templates
            .iter()
            .filter_map(|tagged| self.check_template(file, tagged))
            .collect()
    }
}
