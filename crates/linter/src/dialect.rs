//! Interpolation dialects and their defaults.

use std::fmt;
use std::str::FromStr;

use crate::error::SetupError;
use crate::processor::INTERNAL_TAG;

/// A convention for what `${...}` inside a tagged template stands for.
///
/// No dialect at all (`Option<Dialect>::None`) behaves like Apollo for
/// interpolation purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Apollo,
    Lokka,
    Fraql,
    Relay,
    /// Whole standalone GraphQL files wrapped by the file processor.
    Literal,
}

/// Validators left out of the default set when interpolations cannot be
/// resolved statically.
const FRAGMENT_EXCLUSIONS: &[&str] = &["KnownFragmentNames", "NoUnusedFragments"];

const RELAY_EXCLUSIONS: &[&str] = &[
    "KnownDirectives",
    "KnownFragmentNames",
    "NoUndefinedVariables",
    "NoUnusedFragments",
    "NoUnusedVariables",
    "ProvidedRequiredArguments",
    "ScalarLeafs",
];

impl Dialect {
    pub const ALL: [Self; 5] = [
        Self::Apollo,
        Self::Lokka,
        Self::Fraql,
        Self::Relay,
        Self::Literal,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apollo => "apollo",
            Self::Lokka => "lokka",
            Self::Fraql => "fraql",
            Self::Relay => "relay",
            Self::Literal => "literal",
        }
    }

    /// Tag name used when the option group does not set one.
    #[must_use]
    pub fn default_tag(dialect: Option<Self>) -> &'static str {
        match dialect {
            Some(Self::Relay) => "Relay.QL",
            Some(Self::Literal) => INTERNAL_TAG,
            _ => "gql",
        }
    }

    /// Built-in validators excluded from the default set for `dialect`.
    #[must_use]
    pub fn excluded_validators(dialect: Option<Self>) -> &'static [&'static str] {
        match dialect {
            Some(Self::Relay) => RELAY_EXCLUSIONS,
            _ => FRAGMENT_EXCLUSIONS,
        }
    }

    /// Whether anonymous `fragment on T` sugar is accepted.
    #[must_use]
    pub const fn allows_anonymous_fragments(self) -> bool {
        matches!(self, Self::Lokka | Self::Relay)
    }
}

impl FromStr for Dialect {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|dialect| dialect.as_str() == s)
            .ok_or(SetupError::InvalidEnv)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
