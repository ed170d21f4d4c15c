use std::collections::HashMap;

use apollo_compiler::ast::{self, Type};
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::{Name, Node};

use super::{name_offset, offset_of, print_value};
use crate::validation::suggestions::{did_you_mean, quoted_or_list, suggestion_list};
use crate::validation::type_info::{is_non_null, named_type, nullable, print_type};
use crate::validation::{DocumentVisitor, ValidationContext};

#[derive(Default)]
pub(crate) struct ValuesOfCorrectType;

impl ValuesOfCorrectType {
    /// Checks a leaf (or misplaced) value against the expected input type.
    fn check_leaf(cx: &mut ValidationContext<'_>, value: &Node<ast::Value>) {
        let Some(expected) = cx.input_type().cloned() else {
            return;
        };
        let printed = print_value(value);
        let bad_value = format!(
            "Expected type {}, found {printed}.",
            print_type(&expected)
        );

        let schema = cx.schema;
        let message = match schema.types.get(named_type(&expected)) {
            Some(ExtendedType::Enum(enum_type)) => {
                if let ast::Value::Enum(name) = &**value {
                    if enum_type.values.contains_key(name) {
                        return;
                    }
                }
                let suggestions =
                    suggestion_list(&printed, enum_type.values.keys().map(Name::as_str));
                if suggestions.is_empty() {
                    bad_value
                } else {
                    format!(
                        "{bad_value} Did you mean the enum value {}?",
                        quoted_or_list(&suggestions)
                    )
                }
            }
            Some(ExtendedType::Scalar(scalar)) => {
                if scalar_accepts(scalar.name.as_str(), value) {
                    return;
                }
                bad_value
            }
            Some(_) => bad_value,
            None => return,
        };
        cx.report(message, offset_of(value));
    }
}

fn scalar_accepts(scalar: &str, value: &ast::Value) -> bool {
    match scalar {
        "Int" => matches!(value, ast::Value::Int(int) if int.as_str().parse::<i32>().is_ok()),
        "Float" => matches!(value, ast::Value::Int(_) | ast::Value::Float(_)),
        "String" => matches!(value, ast::Value::String(_)),
        "Boolean" => matches!(value, ast::Value::Boolean(_)),
        "ID" => matches!(value, ast::Value::String(_) | ast::Value::Int(_)),
        _ => true,
    }
}

impl DocumentVisitor for ValuesOfCorrectType {
    fn enter_value(&mut self, cx: &mut ValidationContext<'_>, value: &Node<ast::Value>) {
        match &**value {
            ast::Value::Variable(_) => {}
            ast::Value::Null => {
                if let Some(expected) = cx.input_type().filter(|ty| is_non_null(ty)) {
                    let message = format!("Expected type {}, found null.", print_type(expected));
                    cx.report(message, offset_of(value));
                }
            }
            ast::Value::List(_) => {
                let is_list = cx
                    .input_type()
                    .map(nullable)
                    .is_some_and(|ty| matches!(ty, Type::List(_)));
                if !is_list {
                    Self::check_leaf(cx, value);
                }
            }
            ast::Value::Object(fields) => {
                let Some(expected) = cx.input_type().map(named_type).cloned() else {
                    return;
                };
                let schema = cx.schema;
                let Some(ExtendedType::InputObject(object)) = schema.types.get(&expected) else {
                    Self::check_leaf(cx, value);
                    return;
                };
                let missing: Vec<String> = object
                    .fields
                    .iter()
                    .filter(|(_, def)| is_non_null(&def.node.ty) && def.node.default_value.is_none())
                    .filter(|(name, _)| !fields.iter().any(|(provided, _)| provided == *name))
                    .map(|(name, def)| {
                        format!(
                            "Field {expected}.{name} of required type {} was not provided.",
                            print_type(&def.node.ty)
                        )
                    })
                    .collect();
                for message in missing {
                    cx.report(message, offset_of(value));
                }
            }
            _ => Self::check_leaf(cx, value),
        }
    }

    fn enter_object_field(
        &mut self,
        cx: &mut ValidationContext<'_>,
        name: &Name,
        _value: &Node<ast::Value>,
    ) {
        if cx.input_type().is_some() {
            return;
        }
        let Some(parent) = cx.parent_input_type().map(named_type).cloned() else {
            return;
        };
        let schema = cx.schema;
        let Some(ExtendedType::InputObject(object)) = schema.types.get(&parent) else {
            return;
        };
        let suggestions = suggestion_list(name, object.fields.keys().map(Name::as_str));
        let message = format!(
            "Field \"{name}\" is not defined by type {parent}.{}",
            did_you_mean(&suggestions)
        );
        cx.report(message, name_offset(name));
    }
}

#[derive(Default)]
pub(crate) struct UniqueInputFieldNames;

impl DocumentVisitor for UniqueInputFieldNames {
    fn enter_value(&mut self, cx: &mut ValidationContext<'_>, value: &Node<ast::Value>) {
        let ast::Value::Object(fields) = &**value else {
            return;
        };
        let mut seen: HashMap<&Name, Option<usize>> = HashMap::new();
        for (name, _) in fields {
            match seen.get(name) {
                Some(first) => {
                    let first = *first;
                    cx.report(
                        format!("There can be only one input field named \"{name}\"."),
                        first,
                    );
                }
                None => {
                    seen.insert(name, name_offset(name));
                }
            }
        }
    }
}
