//! Lookup of validators by name.

use std::marker::PhantomData;
use std::sync::{Arc, LazyLock};

use super::rules::{
    ExecutableDefinitions, FieldsOnCorrectType, FragmentsOnCompositeTypes, KnownArgumentNames,
    KnownDirectives, KnownFragmentNames, KnownTypeNames, LoneAnonymousOperation,
    NoDeprecatedFields, NoFragmentCycles, NoUndefinedVariables, NoUnusedFragments,
    NoUnusedVariables, OperationsMustHaveNames, OverlappingFieldsCanBeMerged,
    PossibleFragmentSpreads, ProvidedRequiredArguments, RequiredFieldsRule, ScalarLeafs,
    SingleFieldSubscriptions, TypeNamesShouldBeCapitalized, UniqueArgumentNames,
    UniqueDirectivesPerLocation, UniqueFragmentNames, UniqueInputFieldNames,
    UniqueOperationNames, UniqueVariableNames, ValuesOfCorrectType, VariablesAreInputTypes,
    VariablesInAllowedPosition,
};
use super::{DocumentVisitor, ValidationRule};
use crate::error::SetupError;

/// Built-in validator names in graphql-js `specifiedRules` order.
pub const SPECIFIED_RULES: [&str; 26] = [
    "ExecutableDefinitions",
    "UniqueOperationNames",
    "LoneAnonymousOperation",
    "SingleFieldSubscriptions",
    "KnownTypeNames",
    "FragmentsOnCompositeTypes",
    "VariablesAreInputTypes",
    "ScalarLeafs",
    "FieldsOnCorrectType",
    "UniqueFragmentNames",
    "KnownFragmentNames",
    "NoUnusedFragments",
    "PossibleFragmentSpreads",
    "NoFragmentCycles",
    "UniqueVariableNames",
    "NoUndefinedVariables",
    "NoUnusedVariables",
    "KnownDirectives",
    "UniqueDirectivesPerLocation",
    "KnownArgumentNames",
    "UniqueArgumentNames",
    "ValuesOfCorrectType",
    "ProvidedRequiredArguments",
    "VariablesInAllowedPosition",
    "OverlappingFieldsCanBeMerged",
    "UniqueInputFieldNames",
];

/// A validator whose visitor needs no options.
struct VisitorRule<V> {
    name: &'static str,
    visitor: PhantomData<fn() -> V>,
}

impl<V> VisitorRule<V>
where
    V: DocumentVisitor + Default + 'static,
{
    fn shared(name: &'static str) -> Arc<dyn ValidationRule> {
        Arc::new(Self {
            name,
            visitor: PhantomData,
        })
    }
}

impl<V> ValidationRule for VisitorRule<V>
where
    V: DocumentVisitor + Default + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn visitor(&self) -> Box<dyn DocumentVisitor> {
        Box::new(V::default())
    }
}

/// Built-in validators, created once and shared by every resolved config.
static BUILTIN_RULES: LazyLock<Vec<Arc<dyn ValidationRule>>> = LazyLock::new(|| {
    vec![
        VisitorRule::<ExecutableDefinitions>::shared("ExecutableDefinitions"),
        VisitorRule::<UniqueOperationNames>::shared("UniqueOperationNames"),
        VisitorRule::<LoneAnonymousOperation>::shared("LoneAnonymousOperation"),
        VisitorRule::<SingleFieldSubscriptions>::shared("SingleFieldSubscriptions"),
        VisitorRule::<KnownTypeNames>::shared("KnownTypeNames"),
        VisitorRule::<FragmentsOnCompositeTypes>::shared("FragmentsOnCompositeTypes"),
        VisitorRule::<VariablesAreInputTypes>::shared("VariablesAreInputTypes"),
        VisitorRule::<ScalarLeafs>::shared("ScalarLeafs"),
        VisitorRule::<FieldsOnCorrectType>::shared("FieldsOnCorrectType"),
        VisitorRule::<UniqueFragmentNames>::shared("UniqueFragmentNames"),
        VisitorRule::<KnownFragmentNames>::shared("KnownFragmentNames"),
        VisitorRule::<NoUnusedFragments>::shared("NoUnusedFragments"),
        VisitorRule::<PossibleFragmentSpreads>::shared("PossibleFragmentSpreads"),
        VisitorRule::<NoFragmentCycles>::shared("NoFragmentCycles"),
        VisitorRule::<UniqueVariableNames>::shared("UniqueVariableNames"),
        VisitorRule::<NoUndefinedVariables>::shared("NoUndefinedVariables"),
        VisitorRule::<NoUnusedVariables>::shared("NoUnusedVariables"),
        VisitorRule::<KnownDirectives>::shared("KnownDirectives"),
        VisitorRule::<UniqueDirectivesPerLocation>::shared("UniqueDirectivesPerLocation"),
        VisitorRule::<KnownArgumentNames>::shared("KnownArgumentNames"),
        VisitorRule::<UniqueArgumentNames>::shared("UniqueArgumentNames"),
        VisitorRule::<ValuesOfCorrectType>::shared("ValuesOfCorrectType"),
        VisitorRule::<ProvidedRequiredArguments>::shared("ProvidedRequiredArguments"),
        VisitorRule::<VariablesInAllowedPosition>::shared("VariablesInAllowedPosition"),
        VisitorRule::<OverlappingFieldsCanBeMerged>::shared("OverlappingFieldsCanBeMerged"),
        VisitorRule::<UniqueInputFieldNames>::shared("UniqueInputFieldNames"),
    ]
});

static CUSTOM_RULES: LazyLock<Vec<Arc<dyn ValidationRule>>> = LazyLock::new(|| {
    vec![
        VisitorRule::<OperationsMustHaveNames>::shared("OperationsMustHaveNames"),
        VisitorRule::<TypeNamesShouldBeCapitalized>::shared("typeNamesShouldBeCapitalized"),
        VisitorRule::<NoDeprecatedFields>::shared("noDeprecatedFields"),
    ]
});

/// Built-in validator by name. The graphql-js 15 `Rule` suffix and the
/// legacy `ProvidedNonNullArguments` name are accepted.
#[must_use]
pub fn builtin_rule(name: &str) -> Option<Arc<dyn ValidationRule>> {
    let name = name.strip_suffix("Rule").unwrap_or(name);
    let name = match name {
        "ProvidedNonNullArguments" => "ProvidedRequiredArguments",
        other => other,
    };
    BUILTIN_RULES
        .iter()
        .find(|rule| rule.name() == name)
        .map(Arc::clone)
}

/// Validator from the custom catalog. `required_fields` configures
/// `RequiredFields`.
#[must_use]
pub fn custom_rule(name: &str, required_fields: &[String]) -> Option<Arc<dyn ValidationRule>> {
    if name == "RequiredFields" {
        return Some(Arc::new(RequiredFieldsRule::new(required_fields.to_vec())));
    }
    CUSTOM_RULES
        .iter()
        .find(|rule| rule.name() == name)
        .map(Arc::clone)
}

/// Resolves a validator name, preferring the custom catalog.
pub fn lookup_rule(
    name: &str,
    required_fields: &[String],
) -> Result<Arc<dyn ValidationRule>, SetupError> {
    custom_rule(name, required_fields)
        .or_else(|| builtin_rule(name))
        .ok_or_else(|| SetupError::UnknownValidator(name.to_string()))
}
