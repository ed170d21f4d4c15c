//! Depth-first walk over an executable document.

use apollo_compiler::ast;
use apollo_compiler::Node;

use super::context::ValidationContext;
use super::type_info::named_type;
use super::{DirectiveSite, DocumentVisitor};

type Visitors = [Box<dyn DocumentVisitor>];

macro_rules! each {
    ($visitors:ident, $cx:ident, $hook:ident($($arg:expr),*)) => {
        for visitor in $visitors.iter_mut() {
            visitor.$hook($cx $(, $arg)*);
        }
    };
}

pub(crate) fn walk_document(cx: &mut ValidationContext<'_>, visitors: &mut Visitors) {
    let document = cx.document;
    each!(visitors, cx, enter_document(document));
    for definition in &document.definitions {
        match definition {
            ast::Definition::OperationDefinition(operation) => {
                walk_operation(cx, visitors, operation);
            }
            ast::Definition::FragmentDefinition(fragment) => {
                walk_fragment_definition(cx, visitors, fragment);
            }
            _ => {}
        }
    }
    each!(visitors, cx, leave_document(document));
}

pub(crate) fn walk_operation(
    cx: &mut ValidationContext<'_>,
    visitors: &mut Visitors,
    operation: &Node<ast::OperationDefinition>,
) {
    cx.type_info.enter_operation(cx.schema, operation.operation_type);
    each!(visitors, cx, enter_operation(operation));

    for variable in &operation.variables {
        walk_variable_definition(cx, visitors, variable);
    }
    walk_directives(
        cx,
        visitors,
        &operation.directives,
        DirectiveSite::for_operation(operation.operation_type),
    );
    walk_selection_set(cx, visitors, &operation.selection_set);

    each!(visitors, cx, leave_operation(operation));
    cx.type_info.leave_operation();
}

pub(crate) fn walk_fragment_definition(
    cx: &mut ValidationContext<'_>,
    visitors: &mut Visitors,
    fragment: &Node<ast::FragmentDefinition>,
) {
    cx.type_info.enter_fragment(cx.schema, Some(&fragment.type_condition));
    each!(visitors, cx, enter_fragment_definition(fragment));

    each!(visitors, cx, enter_named_type(&fragment.type_condition));
    walk_directives(
        cx,
        visitors,
        &fragment.directives,
        DirectiveSite::FragmentDefinition,
    );
    walk_selection_set(cx, visitors, &fragment.selection_set);

    each!(visitors, cx, leave_fragment_definition(fragment));
    cx.type_info.leave_fragment();
}

fn walk_variable_definition(
    cx: &mut ValidationContext<'_>,
    visitors: &mut Visitors,
    variable: &Node<ast::VariableDefinition>,
) {
    cx.type_info.enter_variable_definition(cx.schema, &variable.ty);
    each!(visitors, cx, enter_variable_definition(variable));

    each!(visitors, cx, enter_named_type(named_type(&variable.ty)));
    if let Some(default) = &variable.default_value {
        walk_value(cx, visitors, default);
    }
    walk_directives(
        cx,
        visitors,
        &variable.directives,
        DirectiveSite::VariableDefinition,
    );

    each!(visitors, cx, leave_variable_definition(variable));
    cx.type_info.leave_variable_definition();
}

fn walk_selection_set(
    cx: &mut ValidationContext<'_>,
    visitors: &mut Visitors,
    selections: &[ast::Selection],
) {
    cx.type_info.enter_selection_set(cx.schema);
    each!(visitors, cx, enter_selection_set(selections));

    for selection in selections {
        match selection {
            ast::Selection::Field(field) => walk_field(cx, visitors, field),
            ast::Selection::FragmentSpread(spread) => {
                each!(visitors, cx, enter_fragment_spread(spread));
                walk_directives(
                    cx,
                    visitors,
                    &spread.directives,
                    DirectiveSite::FragmentSpread,
                );
            }
            ast::Selection::InlineFragment(inline) => walk_inline_fragment(cx, visitors, inline),
        }
    }

    each!(visitors, cx, leave_selection_set(selections));
    cx.type_info.leave_selection_set();
}

fn walk_field(cx: &mut ValidationContext<'_>, visitors: &mut Visitors, field: &Node<ast::Field>) {
    cx.type_info.enter_field(cx.schema, field);
    each!(visitors, cx, enter_field(field));

    for argument in &field.arguments {
        walk_argument(cx, visitors, argument);
    }
    walk_directives(cx, visitors, &field.directives, DirectiveSite::Field);
    if !field.selection_set.is_empty() {
        walk_selection_set(cx, visitors, &field.selection_set);
    }

    each!(visitors, cx, leave_field(field));
    cx.type_info.leave_field();
}

fn walk_inline_fragment(
    cx: &mut ValidationContext<'_>,
    visitors: &mut Visitors,
    inline: &Node<ast::InlineFragment>,
) {
    cx.type_info
        .enter_fragment(cx.schema, inline.type_condition.as_ref());
    each!(visitors, cx, enter_inline_fragment(inline));

    if let Some(type_condition) = &inline.type_condition {
        each!(visitors, cx, enter_named_type(type_condition));
    }
    walk_directives(
        cx,
        visitors,
        &inline.directives,
        DirectiveSite::InlineFragment,
    );
    walk_selection_set(cx, visitors, &inline.selection_set);

    each!(visitors, cx, leave_inline_fragment(inline));
    cx.type_info.leave_fragment();
}

fn walk_directives(
    cx: &mut ValidationContext<'_>,
    visitors: &mut Visitors,
    directives: &ast::DirectiveList,
    site: DirectiveSite,
) {
    for directive in directives.iter() {
        cx.type_info.enter_directive(cx.schema, directive);
        each!(visitors, cx, enter_directive(directive, site));

        for argument in &directive.arguments {
            walk_argument(cx, visitors, argument);
        }

        each!(visitors, cx, leave_directive(directive, site));
        cx.type_info.leave_directive();
    }
}

fn walk_argument(
    cx: &mut ValidationContext<'_>,
    visitors: &mut Visitors,
    argument: &Node<ast::Argument>,
) {
    cx.type_info.enter_argument(argument);
    each!(visitors, cx, enter_argument(argument));

    walk_value(cx, visitors, &argument.value);

    each!(visitors, cx, leave_argument(argument));
    cx.type_info.leave_argument();
}

fn walk_value(cx: &mut ValidationContext<'_>, visitors: &mut Visitors, value: &Node<ast::Value>) {
    match &**value {
        ast::Value::List(items) => {
            each!(visitors, cx, enter_value(value));
            cx.type_info.enter_list_items();
            for item in items {
                walk_value(cx, visitors, item);
            }
            cx.type_info.leave_list_items();
        }
        ast::Value::Object(fields) => {
            each!(visitors, cx, enter_value(value));
            for (name, field_value) in fields {
                cx.type_info.enter_object_field(cx.schema, name);
                each!(visitors, cx, enter_object_field(name, field_value));
                walk_value(cx, visitors, field_value);
                cx.type_info.leave_object_field();
            }
        }
        ast::Value::Enum(name) => {
            cx.type_info.enter_enum_value(cx.schema, name);
            each!(visitors, cx, enter_value(value));
            cx.type_info.leave_enum_value();
        }
        _ => each!(visitors, cx, enter_value(value)),
    }
}
