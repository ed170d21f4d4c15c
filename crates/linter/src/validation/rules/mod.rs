//! Built-in validators, following graphql-js, and the custom catalog.

mod arguments;
mod custom;
mod definitions;
mod directives;
mod fields;
mod fragments;
mod values;
mod variables;

use apollo_compiler::ast;
use apollo_compiler::{Name, Node};

pub(crate) use arguments::{KnownArgumentNames, ProvidedRequiredArguments, UniqueArgumentNames};
pub(crate) use custom::{
    NoDeprecatedFields, OperationsMustHaveNames, RequiredFieldsRule, TypeNamesShouldBeCapitalized,
};
pub(crate) use definitions::{
    ExecutableDefinitions, KnownTypeNames, LoneAnonymousOperation, SingleFieldSubscriptions,
    UniqueOperationNames,
};
pub(crate) use directives::{KnownDirectives, UniqueDirectivesPerLocation};
pub(crate) use fields::{FieldsOnCorrectType, OverlappingFieldsCanBeMerged, ScalarLeafs};
pub(crate) use fragments::{
    FragmentsOnCompositeTypes, KnownFragmentNames, NoFragmentCycles, NoUnusedFragments,
    PossibleFragmentSpreads, UniqueFragmentNames,
};
pub(crate) use values::{UniqueInputFieldNames, ValuesOfCorrectType};
pub(crate) use variables::{
    NoUndefinedVariables, NoUnusedVariables, UniqueVariableNames, VariablesAreInputTypes,
    VariablesInAllowedPosition,
};

pub(super) fn offset_of<T>(node: &Node<T>) -> Option<usize> {
    node.location().map(|span| span.offset())
}

pub(super) fn name_offset(name: &Name) -> Option<usize> {
    name.location().map(|span| span.offset())
}

/// Prints a value the way graphql-js `print` does.
pub(super) fn print_value(value: &ast::Value) -> String {
    match value {
        ast::Value::Null => "null".to_string(),
        ast::Value::Enum(name) => name.to_string(),
        ast::Value::Variable(name) => format!("${name}"),
        ast::Value::String(text) => {
            serde_json::to_string(text.as_str()).unwrap_or_else(|_| format!("\"{text}\""))
        }
        ast::Value::Float(number) => number.as_str().to_string(),
        ast::Value::Int(number) => number.as_str().to_string(),
        ast::Value::Boolean(flag) => flag.to_string(),
        ast::Value::List(items) => {
            let items: Vec<String> = items.iter().map(|item| print_value(item)).collect();
            format!("[{}]", items.join(", "))
        }
        ast::Value::Object(fields) => {
            let fields: Vec<String> = fields
                .iter()
                .map(|(name, value)| format!("{name}: {}", print_value(value)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argument_value(query: &str) -> Node<ast::Value> {
        let document = ast::Document::parse(query, "value.graphql").unwrap();
        let ast::Definition::OperationDefinition(operation) = &document.definitions[0] else {
            unreachable!()
        };
        let ast::Selection::Field(field) = &operation.selection_set[0] else {
            unreachable!()
        };
        field.arguments[0].value.clone()
    }

    #[test]
    fn prints_values_like_graphql_js() {
        let value = argument_value(r#"{ f(a: {b: [1, 2.5, "x\"y"], c: null, d: ENUM, e: $v, f: true}) }"#);
        assert_eq!(
            print_value(&value),
            r#"{b: [1, 2.5, "x\"y"], c: null, d: ENUM, e: $v, f: true}"#
        );
    }
}
