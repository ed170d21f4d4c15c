use std::collections::{HashMap, HashSet};

use apollo_compiler::ast::{self, Type};
use apollo_compiler::{Name, Node};

use super::{name_offset, offset_of};
use crate::validation::type_info::{is_input, is_non_null, is_subtype, named_type, nullable, print_type};
use crate::validation::{DocumentVisitor, ValidationContext};

#[derive(Default)]
pub(crate) struct VariablesAreInputTypes;

impl DocumentVisitor for VariablesAreInputTypes {
    fn enter_variable_definition(
        &mut self,
        cx: &mut ValidationContext<'_>,
        variable: &Node<ast::VariableDefinition>,
    ) {
        let named = named_type(&variable.ty);
        if cx.schema.types.contains_key(named) && !is_input(cx.schema, named) {
            cx.report(
                format!(
                    "Variable \"${}\" cannot be non-input type \"{}\".",
                    variable.name,
                    print_type(&variable.ty)
                ),
                offset_of(&variable.ty),
            );
        }
    }
}

#[derive(Default)]
pub(crate) struct UniqueVariableNames {
    seen: HashMap<Name, Option<usize>>,
}

impl DocumentVisitor for UniqueVariableNames {
    fn enter_operation(
        &mut self,
        _cx: &mut ValidationContext<'_>,
        _operation: &Node<ast::OperationDefinition>,
    ) {
        self.seen.clear();
    }

    fn enter_variable_definition(
        &mut self,
        cx: &mut ValidationContext<'_>,
        variable: &Node<ast::VariableDefinition>,
    ) {
        if let Some(first) = self.seen.get(&variable.name) {
            cx.report(
                format!(
                    "There can be only one variable named \"{}\".",
                    variable.name
                ),
                *first,
            );
        } else {
            self.seen
                .insert(variable.name.clone(), name_offset(&variable.name));
        }
    }
}

fn operation_suffix(operation: &ast::OperationDefinition, preposition: &str) -> String {
    operation
        .name
        .as_ref()
        .map(|name| format!(" {preposition} operation \"{name}\""))
        .unwrap_or_default()
}

#[derive(Default)]
pub(crate) struct NoUndefinedVariables;

impl DocumentVisitor for NoUndefinedVariables {
    fn leave_operation(
        &mut self,
        cx: &mut ValidationContext<'_>,
        operation: &Node<ast::OperationDefinition>,
    ) {
        let defined: HashSet<&Name> = operation.variables.iter().map(|var| &var.name).collect();
        let suffix = operation_suffix(operation, "by");
        for usage in cx.recursive_variable_usages(operation) {
            if !defined.contains(&usage.name) {
                cx.report(
                    format!("Variable \"${}\" is not defined{suffix}.", usage.name),
                    usage.offset,
                );
            }
        }
    }
}

#[derive(Default)]
pub(crate) struct NoUnusedVariables;

impl DocumentVisitor for NoUnusedVariables {
    fn leave_operation(
        &mut self,
        cx: &mut ValidationContext<'_>,
        operation: &Node<ast::OperationDefinition>,
    ) {
        let used: HashSet<Name> = cx
            .recursive_variable_usages(operation)
            .into_iter()
            .map(|usage| usage.name)
            .collect();
        let suffix = operation_suffix(operation, "in");
        for variable in &operation.variables {
            if !used.contains(&variable.name) {
                cx.report(
                    format!("Variable \"${}\" is never used{suffix}.", variable.name),
                    offset_of(variable),
                );
            }
        }
    }
}

#[derive(Default)]
pub(crate) struct VariablesInAllowedPosition;

impl VariablesInAllowedPosition {
    fn allowed(
        cx: &ValidationContext<'_>,
        variable: &ast::VariableDefinition,
        location: &Type,
        location_has_default: bool,
    ) -> bool {
        if is_non_null(location) && !is_non_null(&variable.ty) {
            let non_null_default = variable
                .default_value
                .as_ref()
                .is_some_and(|value| !matches!(**value, ast::Value::Null));
            if !non_null_default && !location_has_default {
                return false;
            }
            return is_subtype(cx.schema, &variable.ty, &nullable(location));
        }
        is_subtype(cx.schema, &variable.ty, location)
    }
}

impl DocumentVisitor for VariablesInAllowedPosition {
    fn leave_operation(
        &mut self,
        cx: &mut ValidationContext<'_>,
        operation: &Node<ast::OperationDefinition>,
    ) {
        for usage in cx.recursive_variable_usages(operation) {
            let Some(expected) = &usage.expected else {
                continue;
            };
            let Some(variable) = operation.variables.iter().find(|var| var.name == usage.name) else {
                continue;
            };
            if !cx.schema.types.contains_key(named_type(&variable.ty)) {
                continue;
            }
            if !Self::allowed(cx, variable, expected, usage.has_default) {
                cx.report(
                    format!(
                        "Variable \"${}\" of type \"{}\" used in position expecting type \"{}\".",
                        usage.name,
                        print_type(&variable.ty),
                        print_type(expected)
                    ),
                    offset_of(variable),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::validation::test_support::messages;
    use crate::validation::{builtin_rule, ValidationRule};

    fn rule(name: &str) -> Vec<Arc<dyn ValidationRule>> {
        vec![builtin_rule(name).unwrap()]
    }

    #[test]
    fn variables_must_be_input_types() {
        assert_eq!(
            messages(
                &rule("VariablesAreInputTypes"),
                "query($a: Film!) { sum(a: 1, b: 1) }"
            ),
            vec!["Variable \"$a\" cannot be non-input type \"Film!\"."]
        );
    }

    #[test]
    fn duplicate_variables() {
        assert_eq!(
            messages(
                &rule("UniqueVariableNames"),
                "query($a: Int!, $a: Int!) { sum(a: $a, b: $a) }"
            ),
            vec!["There can be only one variable named \"a\"."]
        );
    }

    #[test]
    fn undefined_and_unused_variables() {
        assert_eq!(
            messages(
                &rule("NoUndefinedVariables"),
                "query($a: Int!) { sum(a: $a, b: $b) }"
            ),
            vec!["Variable \"$b\" is not defined."]
        );
        assert_eq!(
            messages(
                &rule("NoUndefinedVariables"),
                "query Named { ...F } fragment F on Query { sum(a: $x, b: 1) }"
            ),
            vec!["Variable \"$x\" is not defined by operation \"Named\"."]
        );
        assert_eq!(
            messages(
                &rule("NoUnusedVariables"),
                "query($a: Int!) { sum(a: 1, b: 1) }"
            ),
            vec!["Variable \"$a\" is never used."]
        );
        assert!(messages(
            &rule("NoUnusedVariables"),
            "query($a: Int!) { ...F } fragment F on Query { sum(a: $a, b: 1) }"
        )
        .is_empty());
    }

    #[test]
    fn variable_types_must_fit_their_position() {
        assert_eq!(
            messages(
                &rule("VariablesInAllowedPosition"),
                "query($a: String!) { sum(a: $a, b: 1) }"
            ),
            vec!["Variable \"$a\" of type \"String!\" used in position expecting type \"Int!\"."]
        );
        assert_eq!(
            messages(
                &rule("VariablesInAllowedPosition"),
                "query($a: Int) { sum(a: $a, b: 1) }"
            ),
            vec!["Variable \"$a\" of type \"Int\" used in position expecting type \"Int!\"."]
        );
        assert!(messages(
            &rule("VariablesInAllowedPosition"),
            "query($a: Int = 3) { sum(a: $a, b: 1) }"
        )
        .is_empty());
    }
}
