//! Validators that ship with the linter on top of the graphql-js set.

use apollo_compiler::ast::{self, Type};
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::{Name, Node, Schema};

use super::{name_offset, offset_of};
use crate::validation::type_info::{deprecation_reason, named_type};
use crate::validation::{DocumentVisitor, ValidationContext, ValidationRule};

#[derive(Default)]
pub(crate) struct OperationsMustHaveNames;

impl DocumentVisitor for OperationsMustHaveNames {
    fn enter_operation(
        &mut self,
        cx: &mut ValidationContext<'_>,
        operation: &Node<ast::OperationDefinition>,
    ) {
        if operation.name.is_none() {
            cx.report("All operations must be named", offset_of(operation));
        }
    }
}

/// Requires every selection on a type that has one of `fields` to select it.
#[derive(Debug, Clone)]
pub(crate) struct RequiredFieldsRule {
    fields: Vec<String>,
}

impl RequiredFieldsRule {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }
}

impl ValidationRule for RequiredFieldsRule {
    fn name(&self) -> &'static str {
        "RequiredFields"
    }

    fn visitor(&self) -> Box<dyn DocumentVisitor> {
        Box::new(RequiredFields {
            fields: self.fields.clone(),
            owners: Vec::new(),
        })
    }
}

struct Owner {
    is_field: bool,
    /// One flag per required field.
    requested: Vec<bool>,
}

struct RequiredFields {
    fields: Vec<String>,
    owners: Vec<Owner>,
}

impl RequiredFields {
    fn owner(&self, is_field: bool, selections: &[ast::Selection]) -> Owner {
        Owner {
            is_field,
            requested: self
                .fields
                .iter()
                .map(|field| is_requested(selections, field))
                .collect(),
        }
    }

    /// Required fields that `ty` has but `selections` does not request.
    fn missing<'f>(
        &'f self,
        schema: &Schema,
        ty: &Type,
        selections: &[ast::Selection],
    ) -> Vec<&'f str> {
        self.fields
            .iter()
            .filter(|field| has_field(schema, ty, field) && !is_requested(selections, field))
            .map(String::as_str)
            .collect()
    }

    /// Whether the owners between an inline fragment and its nearest field
    /// request the required field at `index`.
    fn requested_above(&self, index: usize) -> bool {
        for owner in self.owners.iter().rev() {
            if owner.requested.get(index).copied().unwrap_or(false) {
                return true;
            }
            if owner.is_field {
                break;
            }
        }
        false
    }
}

/// A field counts as requested when selected directly or through a nested
/// inline fragment. Fragment spreads do not count.
fn is_requested(selections: &[ast::Selection], field: &str) -> bool {
    selections.iter().any(|selection| match selection {
        ast::Selection::Field(selected) => selected.name.as_str() == field,
        ast::Selection::InlineFragment(inline) => is_requested(&inline.selection_set, field),
        ast::Selection::FragmentSpread(_) => false,
    })
}

fn has_field(schema: &Schema, ty: &Type, field: &str) -> bool {
    match schema.types.get(named_type(ty)) {
        Some(ExtendedType::Object(object)) => object.fields.contains_key(field),
        Some(ExtendedType::Interface(interface)) => interface.fields.contains_key(field),
        _ => false,
    }
}

impl DocumentVisitor for RequiredFields {
    fn enter_operation(
        &mut self,
        _cx: &mut ValidationContext<'_>,
        operation: &Node<ast::OperationDefinition>,
    ) {
        let owner = self.owner(false, &operation.selection_set);
        self.owners.push(owner);
    }

    fn leave_operation(
        &mut self,
        _cx: &mut ValidationContext<'_>,
        _operation: &Node<ast::OperationDefinition>,
    ) {
        self.owners.pop();
    }

    fn enter_fragment_definition(
        &mut self,
        cx: &mut ValidationContext<'_>,
        fragment: &Node<ast::FragmentDefinition>,
    ) {
        if let Some(ty) = cx.output_type().cloned() {
            for field in self.missing(cx.schema, &ty, &fragment.selection_set) {
                cx.report(
                    format!(
                        "'{field}' field required on 'fragment {} on {}'",
                        fragment.name, fragment.type_condition
                    ),
                    offset_of(fragment),
                );
            }
        }
        let owner = self.owner(false, &fragment.selection_set);
        self.owners.push(owner);
    }

    fn leave_fragment_definition(
        &mut self,
        _cx: &mut ValidationContext<'_>,
        _fragment: &Node<ast::FragmentDefinition>,
    ) {
        self.owners.pop();
    }

    fn enter_field(&mut self, cx: &mut ValidationContext<'_>, field: &Node<ast::Field>) {
        if let Some(def) = cx.field_def().cloned() {
            for required in self.missing(cx.schema, &def.ty, &field.selection_set) {
                cx.report(
                    format!("'{required}' field required on '{}'", field.name),
                    offset_of(field),
                );
            }
        }
        let owner = self.owner(true, &field.selection_set);
        self.owners.push(owner);
    }

    fn leave_field(&mut self, _cx: &mut ValidationContext<'_>, _field: &Node<ast::Field>) {
        self.owners.pop();
    }

    fn enter_inline_fragment(
        &mut self,
        cx: &mut ValidationContext<'_>,
        inline: &Node<ast::InlineFragment>,
    ) {
        if let Some(ty) = cx.output_type().cloned() {
            for (index, field) in self.fields.iter().enumerate() {
                if !has_field(cx.schema, &ty, field)
                    || is_requested(&inline.selection_set, field)
                    || self.requested_above(index)
                {
                    continue;
                }
                let condition = inline
                    .type_condition
                    .as_ref()
                    .unwrap_or_else(|| named_type(&ty));
                cx.report(
                    format!("'{field}' field required on '... on {condition}'"),
                    offset_of(inline),
                );
            }
        }
        let owner = self.owner(false, &inline.selection_set);
        self.owners.push(owner);
    }

    fn leave_inline_fragment(
        &mut self,
        _cx: &mut ValidationContext<'_>,
        _inline: &Node<ast::InlineFragment>,
    ) {
        self.owners.pop();
    }
}

#[derive(Default)]
pub(crate) struct TypeNamesShouldBeCapitalized;

impl DocumentVisitor for TypeNamesShouldBeCapitalized {
    fn enter_named_type(&mut self, cx: &mut ValidationContext<'_>, name: &Name) {
        let Some(first) = name.chars().next() else {
            return;
        };
        if first.to_lowercase().eq(std::iter::once(first)) {
            cx.report(
                "All type names should start with a capital letter",
                name_offset(name),
            );
        }
    }
}

#[derive(Default)]
pub(crate) struct NoDeprecatedFields;

fn deprecated_message(kind: &str, owner: &str, member: &str, reason: &str) -> String {
    if reason.is_empty() {
        format!("The {kind} {owner}.{member} is deprecated.")
    } else {
        format!("The {kind} {owner}.{member} is deprecated. {reason}")
    }
}

impl DocumentVisitor for NoDeprecatedFields {
    fn enter_field(&mut self, cx: &mut ValidationContext<'_>, field: &Node<ast::Field>) {
        let (Some(def), Some(parent)) = (cx.field_def(), cx.parent_type()) else {
            return;
        };
        let Some(reason) = deprecation_reason(&def.directives) else {
            return;
        };
        let message = deprecated_message("field", parent, &def.name, &reason);
        cx.report(message, offset_of(field));
    }

    fn enter_value(&mut self, cx: &mut ValidationContext<'_>, value: &Node<ast::Value>) {
        if !matches!(&**value, ast::Value::Enum(_)) {
            return;
        }
        let (Some(def), Some(ty)) = (cx.enum_value_def(), cx.input_type()) else {
            return;
        };
        let Some(reason) = deprecation_reason(&def.directives) else {
            return;
        };
        let message = deprecated_message("enum value", named_type(ty), &def.value, &reason);
        cx.report(message, offset_of(value));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::RequiredFieldsRule;
    use crate::validation::test_support::{messages, offsets};
    use crate::validation::{builtin_rule, custom_rule, ValidationRule};

    fn required_id() -> Vec<Arc<dyn ValidationRule>> {
        vec![Arc::new(RequiredFieldsRule::new(vec!["id".to_string()]))]
    }

    fn custom(name: &str) -> Vec<Arc<dyn ValidationRule>> {
        vec![custom_rule(name, &[]).unwrap()]
    }

    #[test]
    fn anonymous_operations_are_reported() {
        assert_eq!(
            messages(&custom("OperationsMustHaveNames"), "{ number }"),
            vec!["All operations must be named"]
        );
        assert!(messages(&custom("OperationsMustHaveNames"), "query Number { number }").is_empty());
    }

    #[test]
    fn required_fields_pass() {
        for query in [
            "query { allFilms { films { title } } }",
            "query { stories { id comments { text } } }",
            "query { greetings { id, hello, foo } }",
            "query { greetings { hello ... on Greetings { id } } }",
        ] {
            assert!(messages(&required_id(), query).is_empty(), "{query}");
        }
    }

    #[test]
    fn required_fields_fail() {
        assert_eq!(
            messages(&required_id(), "query { stories { comments { text } } }"),
            vec!["'id' field required on 'stories'"]
        );
        assert_eq!(
            messages(&required_id(), "query { greetings { hello ... on Greetings { foo } } }"),
            vec![
                "'id' field required on 'greetings'",
                "'id' field required on '... on Greetings'",
            ]
        );
        assert_eq!(
            messages(
                &required_id(),
                "query { greetings { hello ...G } } fragment G on Greetings { id }"
            ),
            vec!["'id' field required on 'greetings'"]
        );
    }

    #[test]
    fn required_fields_on_fragments() {
        assert_eq!(
            messages(&required_id(), "fragment G on Greetings { hello }"),
            vec!["'id' field required on 'fragment G on Greetings'"]
        );
    }

    #[test]
    fn lowercase_type_names() {
        let rules = custom("typeNamesShouldBeCapitalized");
        assert_eq!(
            messages(&rules, "fragment F on greetings { hello }"),
            vec!["All type names should start with a capital letter"]
        );
        assert_eq!(offsets(&rules, "fragment F on greetings { hello }"), vec![Some(14)]);
        assert!(messages(&rules, "fragment F on Greetings { hello }").is_empty());
    }

    #[test]
    fn deprecated_fields_and_enum_values() {
        let rules = custom("noDeprecatedFields");
        assert_eq!(
            messages(&rules, "query { greetings { hi } }"),
            vec!["The field Greetings.hi is deprecated. Please use the more formal greeting 'hello'"]
        );
        assert_eq!(
            messages(&rules, "query { greetings { image(size: SMALL) { size } } }"),
            vec!["The enum value ImageSize.SMALL is deprecated. No longer supported"]
        );
        assert!(messages(&rules, "query { greetings { hello } }").is_empty());
    }

    #[test]
    fn custom_rules_do_not_shadow_builtins() {
        assert!(builtin_rule("OperationsMustHaveNames").is_none());
    }
}
