//! Raw option groups as written in the lint configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One schema + dialect + tag binding.
///
/// ```yaml
/// - env: apollo
///   schemaJsonFilepath: ./schema.json
///   tagName: gql
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptionGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_json: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_json_filepath: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_string: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    #[serde(default, alias = "dialect", skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validators: Option<ValidatorsOption>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_fields: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub infer_literals: bool,
}

impl OptionGroup {
    /// Number of schema sources named by this group.
    #[must_use]
    pub fn schema_source_count(&self) -> usize {
        [
            self.schema_json.is_some(),
            self.schema_json_filepath.is_some(),
            self.schema_string.is_some(),
            self.project_name.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    /// Canonical serialization used as the resolution cache key.
    #[must_use]
    pub fn cache_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// The `all` keyword accepted by `validators`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllValidators {
    #[serde(rename = "all")]
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidatorsOption {
    /// Every known validator, ignoring the dialect's exclusions.
    All(AllValidators),
    /// Exactly these validators, in this order.
    List(Vec<String>),
}

impl ValidatorsOption {
    #[must_use]
    pub fn names(names: &[&str]) -> Self {
        Self::List(names.iter().map(|name| (*name).to_string()).collect())
    }
}
