use std::collections::HashMap;

use apollo_compiler::ast;
use apollo_compiler::schema::InputValueDefinition;
use apollo_compiler::{Name, Node};

use super::{name_offset, offset_of};
use crate::validation::suggestions::{did_you_mean, suggestion_list};
use crate::validation::type_info::{is_non_null, print_type};
use crate::validation::{DirectiveSite, DocumentVisitor, ValidationContext};

fn argument_names(arguments: &[Node<InputValueDefinition>]) -> impl Iterator<Item = &str> {
    arguments.iter().map(|arg| arg.name.as_str())
}

#[derive(Default)]
pub(crate) struct KnownArgumentNames {
    in_directive: bool,
}

impl DocumentVisitor for KnownArgumentNames {
    fn enter_directive(
        &mut self,
        _cx: &mut ValidationContext<'_>,
        _directive: &Node<ast::Directive>,
        _site: DirectiveSite,
    ) {
        self.in_directive = true;
    }

    fn leave_directive(
        &mut self,
        _cx: &mut ValidationContext<'_>,
        _directive: &Node<ast::Directive>,
        _site: DirectiveSite,
    ) {
        self.in_directive = false;
    }

    fn enter_argument(&mut self, cx: &mut ValidationContext<'_>, argument: &Node<ast::Argument>) {
        if cx.argument_def().is_some() {
            return;
        }
        let message = if self.in_directive {
            let Some(directive) = cx.directive_def() else {
                return;
            };
            let suggestions = suggestion_list(&argument.name, argument_names(&directive.arguments));
            format!(
                "Unknown argument \"{}\" on directive \"@{}\".{}",
                argument.name,
                directive.name,
                did_you_mean(&suggestions)
            )
        } else {
            let (Some(field), Some(parent)) = (cx.field_def(), cx.parent_type()) else {
                return;
            };
            let suggestions = suggestion_list(&argument.name, argument_names(&field.arguments));
            format!(
                "Unknown argument \"{}\" on field \"{}\" of type \"{parent}\".{}",
                argument.name,
                field.name,
                did_you_mean(&suggestions)
            )
        };
        cx.report(message, offset_of(argument));
    }
}

#[derive(Default)]
pub(crate) struct UniqueArgumentNames {
    seen: HashMap<Name, Option<usize>>,
}

impl DocumentVisitor for UniqueArgumentNames {
    fn enter_field(&mut self, _cx: &mut ValidationContext<'_>, _field: &Node<ast::Field>) {
        self.seen.clear();
    }

    fn enter_directive(
        &mut self,
        _cx: &mut ValidationContext<'_>,
        _directive: &Node<ast::Directive>,
        _site: DirectiveSite,
    ) {
        self.seen.clear();
    }

    fn enter_argument(&mut self, cx: &mut ValidationContext<'_>, argument: &Node<ast::Argument>) {
        if let Some(first) = self.seen.get(&argument.name) {
            cx.report(
                format!(
                    "There can be only one argument named \"{}\".",
                    argument.name
                ),
                *first,
            );
        } else {
            self.seen
                .insert(argument.name.clone(), name_offset(&argument.name));
        }
    }
}

/// Reports on leave so that unknown and duplicate arguments come first.
#[derive(Default)]
pub(crate) struct ProvidedRequiredArguments;

impl ProvidedRequiredArguments {
    fn missing<'d>(
        defined: &'d [Node<InputValueDefinition>],
        provided: &[Node<ast::Argument>],
    ) -> Vec<&'d InputValueDefinition> {
        defined
            .iter()
            .filter(|def| is_non_null(&def.ty) && def.default_value.is_none())
            .filter(|def| !provided.iter().any(|arg| arg.name == def.name))
            .map(|def| &**def)
            .collect()
    }
}

impl DocumentVisitor for ProvidedRequiredArguments {
    fn leave_field(&mut self, cx: &mut ValidationContext<'_>, field: &Node<ast::Field>) {
        let Some(def) = cx.field_def().cloned() else {
            return;
        };
        for arg in Self::missing(&def.arguments, &field.arguments) {
            cx.report(
                format!(
                    "Field \"{}\" argument \"{}\" of type \"{}\" is required, but it was not provided.",
                    field.name,
                    arg.name,
                    print_type(&arg.ty)
                ),
                offset_of(field),
            );
        }
    }

    fn leave_directive(
        &mut self,
        cx: &mut ValidationContext<'_>,
        directive: &Node<ast::Directive>,
        _site: DirectiveSite,
    ) {
        let Some(def) = cx.directive_def().cloned() else {
            return;
        };
        for arg in Self::missing(&def.arguments, &directive.arguments) {
            cx.report(
                format!(
                    "Directive \"@{}\" argument \"{}\" of type \"{}\" is required, but it was not provided.",
                    directive.name,
                    arg.name,
                    print_type(&arg.ty)
                ),
                offset_of(directive),
            );
        }
    }
}
