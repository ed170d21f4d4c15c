use std::collections::HashMap;

use apollo_compiler::ast;
use apollo_compiler::{Name, Node};

use super::offset_of;
use crate::validation::{DirectiveSite, DocumentVisitor, ValidationContext};

#[derive(Default)]
pub(crate) struct KnownDirectives;

impl DocumentVisitor for KnownDirectives {
    fn enter_directive(
        &mut self,
        cx: &mut ValidationContext<'_>,
        directive: &Node<ast::Directive>,
        site: DirectiveSite,
    ) {
        let message = match cx.schema.directive_definitions.get(&directive.name) {
            None => format!("Unknown directive \"{}\".", directive.name),
            Some(def) if !def.locations.contains(&site.location()) => format!(
                "Directive \"{}\" may not be used on {}.",
                directive.name,
                site.as_str()
            ),
            Some(_) => return,
        };
        cx.report(message, offset_of(directive));
    }
}

#[derive(Default)]
pub(crate) struct UniqueDirectivesPerLocation;

impl UniqueDirectivesPerLocation {
    fn check(cx: &mut ValidationContext<'_>, directives: &ast::DirectiveList) {
        let mut seen: HashMap<&Name, Option<usize>> = HashMap::new();
        let mut found = Vec::new();
        for directive in directives.iter() {
            let repeatable = cx
                .schema
                .directive_definitions
                .get(&directive.name)
                .is_some_and(|def| def.repeatable);
            if repeatable {
                continue;
            }
            match seen.get(&directive.name) {
                Some(first) => found.push((
                    format!(
                        "The directive \"{}\" can only be used once at this location.",
                        directive.name
                    ),
                    *first,
                )),
                None => {
                    seen.insert(&directive.name, offset_of(directive));
                }
            }
        }
        for (message, offset) in found {
            cx.report(message, offset);
        }
    }
}

impl DocumentVisitor for UniqueDirectivesPerLocation {
    fn enter_operation(
        &mut self,
        cx: &mut ValidationContext<'_>,
        operation: &Node<ast::OperationDefinition>,
    ) {
        Self::check(cx, &operation.directives);
    }

    fn enter_fragment_definition(
        &mut self,
        cx: &mut ValidationContext<'_>,
        fragment: &Node<ast::FragmentDefinition>,
    ) {
        Self::check(cx, &fragment.directives);
    }

    fn enter_field(&mut self, cx: &mut ValidationContext<'_>, field: &Node<ast::Field>) {
        Self::check(cx, &field.directives);
    }

    fn enter_fragment_spread(
        &mut self,
        cx: &mut ValidationContext<'_>,
        spread: &Node<ast::FragmentSpread>,
    ) {
        Self::check(cx, &spread.directives);
    }

    fn enter_inline_fragment(
        &mut self,
        cx: &mut ValidationContext<'_>,
        inline: &Node<ast::InlineFragment>,
    ) {
        Self::check(cx, &inline.directives);
    }

    fn enter_variable_definition(
        &mut self,
        cx: &mut ValidationContext<'_>,
        variable: &Node<ast::VariableDefinition>,
    ) {
        Self::check(cx, &variable.directives);
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
    fn unknown_and_misplaced_directives() {
        assert_eq!(
            messages(
                &rule("KnownDirectives"),
                "{ number, allFilms @goofy(if: false) { films { title } } }"
            ),
            vec!["Unknown directive \"goofy\"."]
        );
        assert_eq!(
            messages(&rule("KnownDirectives"), "query @include(if: true) { number }"),
            vec!["Directive \"include\" may not be used on QUERY."]
        );
        assert!(messages(
            &rule("KnownDirectives"),
            "{ number, allFilms @include(if: false) { films { title } } }"
        )
        .is_empty());
    }

    #[test]
    fn directives_are_unique_per_location() {
        assert_eq!(
            messages(
                &rule("UniqueDirectivesPerLocation"),
                "{ number @skip(if: true) @skip(if: false) }"
            ),
            vec!["The directive \"skip\" can only be used once at this location."]
        );
    }
}
