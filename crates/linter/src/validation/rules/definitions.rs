use std::collections::HashMap;

use apollo_compiler::ast;
use apollo_compiler::{Name, Node};

use super::{name_offset, offset_of};
use crate::validation::context::selection_offset;
use crate::validation::suggestions::{did_you_mean, suggestion_list};
use crate::validation::{DocumentVisitor, ValidationContext};

#[derive(Default)]
pub(crate) struct ExecutableDefinitions;

impl DocumentVisitor for ExecutableDefinitions {
    fn enter_document(&mut self, cx: &mut ValidationContext<'_>, document: &ast::Document) {
        for definition in &document.definitions {
            if matches!(
                definition,
                ast::Definition::OperationDefinition(_) | ast::Definition::FragmentDefinition(_)
            ) {
                continue;
            }
            let name = definition.name().map_or("schema", Name::as_str);
            cx.report(
                format!("The {name} definition is not executable."),
                definition.location().map(|span| span.offset()),
            );
        }
    }
}

#[derive(Default)]
pub(crate) struct UniqueOperationNames {
    seen: HashMap<Name, Option<usize>>,
}

impl DocumentVisitor for UniqueOperationNames {
    fn enter_operation(
        &mut self,
        cx: &mut ValidationContext<'_>,
        operation: &Node<ast::OperationDefinition>,
    ) {
        let Some(name) = &operation.name else {
            return;
        };
        if let Some(first) = self.seen.get(name) {
            cx.report(
                format!("There can be only one operation named \"{name}\"."),
                *first,
            );
        } else {
            self.seen.insert(name.clone(), name_offset(name));
        }
    }
}

#[derive(Default)]
pub(crate) struct LoneAnonymousOperation {
    operations: usize,
}

impl DocumentVisitor for LoneAnonymousOperation {
    fn enter_document(&mut self, _cx: &mut ValidationContext<'_>, document: &ast::Document) {
        self.operations = document
            .definitions
            .iter()
            .filter(|definition| matches!(definition, ast::Definition::OperationDefinition(_)))
            .count();
    }

    fn enter_operation(
        &mut self,
        cx: &mut ValidationContext<'_>,
        operation: &Node<ast::OperationDefinition>,
    ) {
        if operation.name.is_none() && self.operations > 1 {
            cx.report(
                "This anonymous operation must be the only defined operation.",
                offset_of(operation),
            );
        }
    }
}

#[derive(Default)]
pub(crate) struct SingleFieldSubscriptions;

impl DocumentVisitor for SingleFieldSubscriptions {
    fn enter_operation(
        &mut self,
        cx: &mut ValidationContext<'_>,
        operation: &Node<ast::OperationDefinition>,
    ) {
        if operation.operation_type != ast::OperationType::Subscription
            || operation.selection_set.len() == 1
        {
            return;
        }
        let subject = match &operation.name {
            Some(name) => format!("Subscription \"{name}\" "),
            None => "Anonymous Subscription ".to_string(),
        };
        cx.report(
            format!("{subject}must select only one top level field."),
            operation.selection_set.get(1).and_then(selection_offset),
        );
    }
}

#[derive(Default)]
pub(crate) struct KnownTypeNames;

impl DocumentVisitor for KnownTypeNames {
    fn enter_named_type(&mut self, cx: &mut ValidationContext<'_>, name: &Name) {
        if cx.schema.types.contains_key(name) {
            return;
        }
        let suggestions = suggestion_list(name, cx.schema.types.keys().map(Name::as_str));
        cx.report(
            format!("Unknown type \"{name}\".{}", did_you_mean(&suggestions)),
            name_offset(name),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::validation::test_support::{messages, offsets};
    use crate::validation::{builtin_rule, ValidationRule};

    fn rule(name: &str) -> Vec<Arc<dyn ValidationRule>> {
        vec![builtin_rule(name).unwrap()]
    }

    #[test]
    fn type_definitions_are_not_executable() {
        assert_eq!(
            messages(&rule("ExecutableDefinitions"), "{ number } type Foo { a: Int }"),
            vec!["The Foo definition is not executable."]
        );
    }

    #[test]
    fn duplicate_operation_names_point_at_the_first() {
        let query = "query Q { number } query Q { number }";
        assert_eq!(
            messages(&rule("UniqueOperationNames"), query),
            vec!["There can be only one operation named \"Q\"."]
        );
        assert_eq!(offsets(&rule("UniqueOperationNames"), query), vec![Some(6)]);
    }

    #[test]
    fn anonymous_operation_must_be_alone() {
        assert_eq!(
            messages(&rule("LoneAnonymousOperation"), "{ number } { number }"),
            vec![
                "This anonymous operation must be the only defined operation.",
                "This anonymous operation must be the only defined operation."
            ]
        );
        assert!(messages(&rule("LoneAnonymousOperation"), "{ number }").is_empty());
    }

    #[test]
    fn unknown_types_get_suggestions() {
        assert_eq!(
            messages(
                &rule("KnownTypeNames"),
                "fragment F on Flim { title } { allFilms { films { ...F } } }"
            ),
            vec!["Unknown type \"Flim\". Did you mean \"Film\"?"]
        );
        assert_eq!(
            messages(&rule("KnownTypeNames"), "query($a: Int) { sum(a: $a, b: 1) }"),
            Vec::<String>::new()
        );
    }
}
