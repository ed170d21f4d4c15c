use std::collections::HashSet;

use apollo_compiler::ast::{self, Type};
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::{Name, Node};

use super::{offset_of, print_value};
use crate::validation::suggestions::{quoted_or_list, suggestion_list};
use crate::validation::type_info::{
    field_definition, field_names, is_abstract, is_leaf, named_type, possible_types, print_type,
};
use crate::validation::{DocumentVisitor, ValidationContext};

#[derive(Default)]
pub(crate) struct ScalarLeafs;

impl DocumentVisitor for ScalarLeafs {
    fn enter_field(&mut self, cx: &mut ValidationContext<'_>, field: &Node<ast::Field>) {
        let Some(ty) = cx.output_type().cloned() else {
            return;
        };
        let printed = print_type(&ty);
        if is_leaf(cx.schema, named_type(&ty)) {
            if !field.selection_set.is_empty() {
                let offset = cx.selection_set_offset(&field.selection_set);
                cx.report(
                    format!(
                        "Field \"{}\" must not have a selection since type \"{printed}\" has no subfields.",
                        field.name
                    ),
                    offset,
                );
            }
        } else if field.selection_set.is_empty() {
            cx.report(
                format!(
                    "Field \"{name}\" of type \"{printed}\" must have a selection of subfields. Did you mean \"{name} {{ ... }}\"?",
                    name = field.name
                ),
                offset_of(field),
            );
        }
    }
}

#[derive(Default)]
pub(crate) struct FieldsOnCorrectType;

impl FieldsOnCorrectType {
    /// Interfaces and object types of an abstract parent that do define
    /// `field`, interfaces used most often first.
    fn suggested_types(cx: &ValidationContext<'_>, parent: &str, field: &str) -> Vec<String> {
        if !is_abstract(cx.schema, parent) {
            return Vec::new();
        }
        let mut objects = Vec::new();
        let mut interfaces: Vec<(String, usize)> = Vec::new();
        for possible in possible_types(cx.schema, parent) {
            let Some(ExtendedType::Object(object)) = cx.schema.types.get(possible) else {
                continue;
            };
            if !object.fields.contains_key(field) {
                continue;
            }
            objects.push(possible.to_string());
            for interface in &object.implements_interfaces {
                let defines_field = matches!(
                    cx.schema.types.get(&interface.name),
                    Some(ExtendedType::Interface(def)) if def.fields.contains_key(field)
                );
                if !defines_field {
                    continue;
                }
                match interfaces.iter_mut().find(|(name, _)| name == interface.name.as_str()) {
                    Some((_, count)) => *count += 1,
                    None => interfaces.push((interface.name.to_string(), 1)),
                }
            }
        }
        interfaces.sort_by(|a, b| b.1.cmp(&a.1));
        interfaces
            .into_iter()
            .map(|(name, _)| name)
            .chain(objects)
            .collect()
    }
}

impl DocumentVisitor for FieldsOnCorrectType {
    fn enter_field(&mut self, cx: &mut ValidationContext<'_>, field: &Node<ast::Field>) {
        let Some(parent) = cx.parent_type().cloned() else {
            return;
        };
        if cx.field_def().is_some() {
            return;
        }

        let mut message = format!(
            "Cannot query field \"{}\" on type \"{parent}\".",
            field.name
        );
        let types = Self::suggested_types(cx, &parent, &field.name);
        if types.is_empty() {
            let fields = suggestion_list(&field.name, field_names(cx.schema, &parent));
            if !fields.is_empty() {
                message.push_str(&format!(" Did you mean {}?", quoted_or_list(&fields)));
            }
        } else {
            message.push_str(&format!(
                " Did you mean to use an inline fragment on {}?",
                quoted_or_list(&types)
            ));
        }
        cx.report(message, offset_of(field));
    }
}

/// A field reached from a selection set, with the type it is selected on.
struct Collected {
    field: Node<ast::Field>,
    parent: Option<Name>,
}

impl Collected {
    fn response_name(&self) -> &Name {
        self.field.alias.as_ref().unwrap_or(&self.field.name)
    }
}

/// Fields selected under one response name must be mergeable: same field,
/// same arguments, compatible types. Sub-selections are not compared.
#[derive(Default)]
pub(crate) struct OverlappingFieldsCanBeMerged;

impl OverlappingFieldsCanBeMerged {
    fn collect_direct(
        selections: &[ast::Selection],
        parent: Option<&Name>,
        fields: &mut Vec<Collected>,
        spreads: &mut Vec<Name>,
    ) {
        for selection in selections {
            match selection {
                ast::Selection::Field(field) => fields.push(Collected {
                    field: field.clone(),
                    parent: parent.cloned(),
                }),
                ast::Selection::InlineFragment(inline) => {
                    let parent = inline.type_condition.as_ref().or(parent);
                    Self::collect_direct(&inline.selection_set, parent, fields, spreads);
                }
                ast::Selection::FragmentSpread(spread) => {
                    if !spreads.contains(&spread.fragment_name) {
                        spreads.push(spread.fragment_name.clone());
                    }
                }
            }
        }
    }

    /// Fields of a named fragment, following nested spreads once.
    fn collect_fragment(
        cx: &ValidationContext<'_>,
        name: &Name,
        seen: &mut HashSet<Name>,
    ) -> Vec<Collected> {
        let mut fields = Vec::new();
        let mut pending = vec![name.clone()];
        while let Some(name) = pending.pop() {
            if !seen.insert(name.clone()) {
                continue;
            }
            let Some(fragment) = cx.fragment(&name) else {
                continue;
            };
            let mut nested = Vec::new();
            Self::collect_direct(
                &fragment.selection_set,
                Some(&fragment.type_condition),
                &mut fields,
                &mut nested,
            );
            pending.extend(nested.into_iter().rev());
        }
        fields
    }

    fn conflict(cx: &ValidationContext<'_>, a: &Collected, b: &Collected) -> Option<String> {
        let exclusive = match (&a.parent, &b.parent) {
            (Some(pa), Some(pb)) => {
                pa != pb
                    && matches!(cx.schema.types.get(pa), Some(ExtendedType::Object(_)))
                    && matches!(cx.schema.types.get(pb), Some(ExtendedType::Object(_)))
            }
            _ => false,
        };

        if !exclusive {
            if a.field.name != b.field.name {
                return Some(format!(
                    "{} and {} are different fields",
                    a.field.name, b.field.name
                ));
            }
            if !same_arguments(&a.field.arguments, &b.field.arguments) {
                return Some("they have differing arguments".to_string());
            }
        }

        let def_a = a
            .parent
            .as_ref()
            .and_then(|parent| field_definition(cx.schema, parent, &a.field.name))?;
        let def_b = b
            .parent
            .as_ref()
            .and_then(|parent| field_definition(cx.schema, parent, &b.field.name))?;
        types_conflict(cx, &def_a.ty, &def_b.ty).then(|| {
            format!(
                "they return conflicting types {} and {}",
                print_type(&def_a.ty),
                print_type(&def_b.ty)
            )
        })
    }

    fn compare(
        cx: &ValidationContext<'_>,
        a: &Collected,
        b: &Collected,
        found: &mut Vec<(String, Option<usize>)>,
    ) {
        if a.response_name() != b.response_name() {
            return;
        }
        if let Some(reason) = Self::conflict(cx, a, b) {
            found.push((
                format!(
                    "Fields \"{}\" conflict because {reason}. Use different aliases on the fields to fetch both if this was intentional.",
                    a.response_name()
                ),
                offset_of(&a.field),
            ));
        }
    }
}

impl OverlappingFieldsCanBeMerged {
    fn find_conflicts(
        cx: &ValidationContext<'_>,
        selections: &[ast::Selection],
    ) -> Vec<(String, Option<usize>)> {
        let mut direct = Vec::new();
        let mut spreads = Vec::new();
        Self::collect_direct(selections, cx.parent_type(), &mut direct, &mut spreads);

        let fragments: Vec<Vec<Collected>> = spreads
            .iter()
            .map(|name| Self::collect_fragment(cx, name, &mut HashSet::new()))
            .collect();

        let mut found = Vec::new();
        for (i, a) in direct.iter().enumerate() {
            for b in &direct[i + 1..] {
                Self::compare(cx, a, b, &mut found);
            }
        }
        for fragment in &fragments {
            for a in &direct {
                for b in fragment {
                    Self::compare(cx, a, b, &mut found);
                }
            }
        }
        for (i, first) in fragments.iter().enumerate() {
            for second in &fragments[i + 1..] {
                for a in first {
                    for b in second {
                        Self::compare(cx, a, b, &mut found);
                    }
                }
            }
        }
        found
    }
}

impl DocumentVisitor for OverlappingFieldsCanBeMerged {
    fn enter_selection_set(&mut self, cx: &mut ValidationContext<'_>, selections: &[ast::Selection]) {
        for (message, offset) in Self::find_conflicts(cx, selections) {
            cx.report(message, offset);
        }
    }
}

fn same_arguments(a: &[Node<ast::Argument>], b: &[Node<ast::Argument>]) -> bool {
    a.len() == b.len()
        && a.iter().all(|arg| {
            b.iter().any(|other| {
                other.name == arg.name && print_value(&other.value) == print_value(&arg.value)
            })
        })
}

fn types_conflict(cx: &ValidationContext<'_>, a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::List(a), Type::List(b)) | (Type::NonNullList(a), Type::NonNullList(b)) => {
            types_conflict(cx, a, b)
        }
        (Type::Named(a), Type::Named(b)) | (Type::NonNullNamed(a), Type::NonNullNamed(b)) => {
            (is_leaf(cx.schema, a) || is_leaf(cx.schema, b)) && a != b
        }
        _ => true,
    }
}
