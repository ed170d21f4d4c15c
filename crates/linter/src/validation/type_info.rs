//! Type information tracked while walking a document, plus schema queries
//! shared by the validators.

use apollo_compiler::ast::{self, Type};
use apollo_compiler::schema::{
    DirectiveDefinition, EnumValueDefinition, ExtendedType, FieldDefinition, InputValueDefinition,
};
use apollo_compiler::{name, Name, Node, Schema};

/// Stacks mirroring the walker's position in the document.
#[derive(Debug, Default)]
pub(crate) struct TypeInfo {
    types: Vec<Option<Type>>,
    parent_types: Vec<Option<Name>>,
    input_types: Vec<Option<Type>>,
    input_defaults: Vec<bool>,
    field_defs: Vec<Option<Node<FieldDefinition>>>,
    directive: Option<Node<DirectiveDefinition>>,
    argument: Option<Node<InputValueDefinition>>,
    enum_value: Option<Node<EnumValueDefinition>>,
}

impl TypeInfo {
    pub fn output_type(&self) -> Option<&Type> {
        self.types.last().and_then(Option::as_ref)
    }

    pub fn parent_type(&self) -> Option<&Name> {
        self.parent_types.last().and_then(Option::as_ref)
    }

    pub fn input_type(&self) -> Option<&Type> {
        self.input_types.last().and_then(Option::as_ref)
    }

    pub fn parent_input_type(&self) -> Option<&Type> {
        let len = self.input_types.len();
        if len < 2 {
            return None;
        }
        self.input_types[len - 2].as_ref()
    }

    /// Whether the current input position has a default value of its own.
    pub fn has_default(&self) -> bool {
        self.input_defaults.last().copied().unwrap_or(false)
    }

    pub fn field_def(&self) -> Option<&Node<FieldDefinition>> {
        self.field_defs.last().and_then(Option::as_ref)
    }

    pub fn directive(&self) -> Option<&Node<DirectiveDefinition>> {
        self.directive.as_ref()
    }

    pub fn argument(&self) -> Option<&Node<InputValueDefinition>> {
        self.argument.as_ref()
    }

    pub fn enum_value(&self) -> Option<&Node<EnumValueDefinition>> {
        self.enum_value.as_ref()
    }

    pub fn enter_operation(&mut self, schema: &Schema, operation_type: ast::OperationType) {
        let root = schema
            .root_operation(operation_type)
            .filter(|name| matches!(schema.types.get(*name), Some(ExtendedType::Object(_))))
            .map(|name| Type::Named(name.clone()));
        self.types.push(root);
    }

    pub fn leave_operation(&mut self) {
        self.types.pop();
    }

    pub fn enter_selection_set(&mut self, schema: &Schema) {
        let parent = self
            .output_type()
            .map(named_type)
            .filter(|name| is_composite(schema, name))
            .cloned();
        self.parent_types.push(parent);
    }

    pub fn leave_selection_set(&mut self) {
        self.parent_types.pop();
    }

    pub fn enter_field(&mut self, schema: &Schema, field: &ast::Field) {
        let def = self
            .parent_type()
            .and_then(|parent| field_definition(schema, parent, &field.name));
        self.types.push(def.as_ref().map(|def| def.ty.clone()));
        self.field_defs.push(def);
    }

    pub fn leave_field(&mut self) {
        self.types.pop();
        self.field_defs.pop();
    }

    pub fn enter_directive(&mut self, schema: &Schema, directive: &ast::Directive) {
        self.directive = schema.directive_definitions.get(&directive.name).cloned();
    }

    pub fn leave_directive(&mut self) {
        self.directive = None;
    }

    pub fn enter_argument(&mut self, argument: &ast::Argument) {
        let def = if let Some(directive) = &self.directive {
            directive
                .arguments
                .iter()
                .find(|arg| arg.name == argument.name)
                .cloned()
        } else {
            self.field_def().and_then(|field| {
                field
                    .arguments
                    .iter()
                    .find(|arg| arg.name == argument.name)
                    .cloned()
            })
        };
        self.input_types.push(def.as_ref().map(|def| (*def.ty).clone()));
        self.input_defaults
            .push(def.as_ref().is_some_and(|def| def.default_value.is_some()));
        self.argument = def;
    }

    pub fn leave_argument(&mut self) {
        self.argument = None;
        self.input_types.pop();
        self.input_defaults.pop();
    }

    /// Fragment definitions and inline fragments. Without a type condition
    /// the fragment keeps the enclosing type.
    pub fn enter_fragment(&mut self, schema: &Schema, type_condition: Option<&Name>) {
        let ty = match type_condition {
            Some(name) => is_output(schema, name).then(|| Type::Named(name.clone())),
            None => self.output_type().map(|ty| Type::Named(named_type(ty).clone())),
        };
        self.types.push(ty);
    }

    pub fn leave_fragment(&mut self) {
        self.types.pop();
    }

    pub fn enter_variable_definition(&mut self, schema: &Schema, ty: &Type) {
        let input = is_input(schema, named_type(ty)).then(|| ty.clone());
        self.input_types.push(input);
        self.input_defaults.push(false);
    }

    pub fn leave_variable_definition(&mut self) {
        self.input_types.pop();
        self.input_defaults.pop();
    }

    pub fn enter_list_items(&mut self) {
        let item = self.input_type().and_then(|ty| match ty {
            Type::List(inner) | Type::NonNullList(inner) => Some((**inner).clone()),
            Type::Named(_) | Type::NonNullNamed(_) => None,
        });
        self.input_types.push(item);
        self.input_defaults.push(false);
    }

    pub fn leave_list_items(&mut self) {
        self.input_types.pop();
        self.input_defaults.pop();
    }

    pub fn enter_object_field(&mut self, schema: &Schema, name: &Name) {
        let def = self
            .input_type()
            .map(named_type)
            .and_then(|ty| match schema.types.get(ty) {
                Some(ExtendedType::InputObject(object)) => object.fields.get(name),
                _ => None,
            });
        self.input_types.push(def.map(|def| (*def.node.ty).clone()));
        self.input_defaults
            .push(def.is_some_and(|def| def.node.default_value.is_some()));
    }

    pub fn leave_object_field(&mut self) {
        self.input_types.pop();
        self.input_defaults.pop();
    }

    pub fn enter_enum_value(&mut self, schema: &Schema, value: &Name) {
        self.enum_value = self
            .input_type()
            .map(named_type)
            .and_then(|ty| match schema.types.get(ty) {
                Some(ExtendedType::Enum(enum_type)) => {
                    enum_type.values.get(value).map(|def| def.node.clone())
                }
                _ => None,
            });
    }

    pub fn leave_enum_value(&mut self) {
        self.enum_value = None;
    }
}

/// Innermost named type of a possibly wrapped type.
pub(crate) fn named_type(ty: &Type) -> &Name {
    match ty {
        Type::Named(name) | Type::NonNullNamed(name) => name,
        Type::List(inner) | Type::NonNullList(inner) => named_type(inner),
    }
}

pub(crate) const fn is_non_null(ty: &Type) -> bool {
    matches!(ty, Type::NonNullNamed(_) | Type::NonNullList(_))
}

pub(crate) fn nullable(ty: &Type) -> Type {
    match ty {
        Type::NonNullNamed(name) => Type::Named(name.clone()),
        Type::NonNullList(inner) => Type::List(inner.clone()),
        other => other.clone(),
    }
}

/// Prints a type reference the way it is written: `[Int!]!`.
pub(crate) fn print_type(ty: &Type) -> String {
    match ty {
        Type::Named(name) => name.to_string(),
        Type::NonNullNamed(name) => format!("{name}!"),
        Type::List(inner) => format!("[{}]", print_type(inner)),
        Type::NonNullList(inner) => format!("[{}]!", print_type(inner)),
    }
}

pub(crate) fn is_composite(schema: &Schema, name: &str) -> bool {
    matches!(
        schema.types.get(name),
        Some(ExtendedType::Object(_) | ExtendedType::Interface(_) | ExtendedType::Union(_))
    )
}

pub(crate) fn is_abstract(schema: &Schema, name: &str) -> bool {
    matches!(
        schema.types.get(name),
        Some(ExtendedType::Interface(_) | ExtendedType::Union(_))
    )
}

pub(crate) fn is_leaf(schema: &Schema, name: &str) -> bool {
    matches!(
        schema.types.get(name),
        Some(ExtendedType::Scalar(_) | ExtendedType::Enum(_))
    )
}

pub(crate) fn is_input(schema: &Schema, name: &str) -> bool {
    matches!(
        schema.types.get(name),
        Some(ExtendedType::Scalar(_) | ExtendedType::Enum(_) | ExtendedType::InputObject(_))
    )
}

pub(crate) fn is_output(schema: &Schema, name: &str) -> bool {
    schema
        .types
        .get(name)
        .is_some_and(|ty| !matches!(ty, ExtendedType::InputObject(_)))
}

/// Object types a value of type `name` can have at runtime.
pub(crate) fn possible_types<'s>(schema: &'s Schema, name: &str) -> Vec<&'s Name> {
    match schema.types.get(name) {
        Some(ExtendedType::Object(_)) => schema
            .types
            .get_key_value(name)
            .map(|(key, _)| vec![key])
            .unwrap_or_default(),
        Some(ExtendedType::Union(union_type)) => union_type
            .members
            .iter()
            .map(|member| &member.name)
            .collect(),
        Some(ExtendedType::Interface(_)) => schema
            .types
            .iter()
            .filter_map(|(type_name, ty)| match ty {
                ExtendedType::Object(object)
                    if object
                        .implements_interfaces
                        .iter()
                        .any(|interface| interface.name.as_str() == name) =>
                {
                    Some(type_name)
                }
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Whether some object type can be both `a` and `b`.
pub(crate) fn types_overlap(schema: &Schema, a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    let a_possible = possible_types(schema, a);
    match (is_abstract(schema, a), is_abstract(schema, b)) {
        (true, true) => {
            let b_possible = possible_types(schema, b);
            a_possible.iter().any(|ty| b_possible.contains(ty))
        }
        (true, false) => a_possible.iter().any(|ty| ty.as_str() == b),
        (false, true) => possible_types(schema, b)
            .iter()
            .any(|ty| ty.as_str() == a),
        (false, false) => false,
    }
}

/// Field definitions of an object or interface type.
pub(crate) fn field_names<'s>(schema: &'s Schema, type_name: &str) -> Vec<&'s str> {
    match schema.types.get(type_name) {
        Some(ExtendedType::Object(object)) => object.fields.keys().map(Name::as_str).collect(),
        Some(ExtendedType::Interface(interface)) => {
            interface.fields.keys().map(Name::as_str).collect()
        }
        _ => Vec::new(),
    }
}

/// Looks up `field` on `parent`, including the introspection meta-fields.
pub(crate) fn field_definition(
    schema: &Schema,
    parent: &str,
    field: &str,
) -> Option<Node<FieldDefinition>> {
    let is_query_root = || {
        schema
            .root_operation(ast::OperationType::Query)
            .is_some_and(|root| root.as_str() == parent)
    };
    match field {
        "__typename" => {
            return Some(meta_field(
                name!("__typename"),
                Type::NonNullNamed(name!("String")),
                Vec::new(),
            ))
        }
        "__schema" if is_query_root() => {
            return Some(meta_field(
                name!("__schema"),
                Type::NonNullNamed(name!("__Schema")),
                Vec::new(),
            ))
        }
        "__type" if is_query_root() => {
            let argument = InputValueDefinition {
                description: None,
                name: name!("name"),
                ty: Node::new(Type::NonNullNamed(name!("String"))),
                default_value: None,
                directives: ast::DirectiveList::default(),
            };
            return Some(meta_field(
                name!("__type"),
                Type::Named(name!("__Type")),
                vec![Node::new(argument)],
            ));
        }
        _ => {}
    }

    match schema.types.get(parent)? {
        ExtendedType::Object(object) => object.fields.get(field).map(|def| def.node.clone()),
        ExtendedType::Interface(interface) => {
            interface.fields.get(field).map(|def| def.node.clone())
        }
        _ => None,
    }
}

fn meta_field(
    name: Name,
    ty: Type,
    arguments: Vec<Node<InputValueDefinition>>,
) -> Node<FieldDefinition> {
    Node::new(FieldDefinition {
        description: None,
        name,
        arguments,
        ty,
        directives: ast::DirectiveList::default(),
    })
}

/// Reason given by a `@deprecated` directive, if the element is deprecated.
pub(crate) fn deprecation_reason(directives: &ast::DirectiveList) -> Option<String> {
    let deprecated = directives.get("deprecated")?;
    let reason = deprecated
        .arguments
        .iter()
        .find(|arg| arg.name.as_str() == "reason")
        .and_then(|arg| match &*arg.value {
            ast::Value::String(reason) => Some(reason.to_string()),
            _ => None,
        });
    Some(reason.unwrap_or_else(|| "No longer supported".to_string()))
}

/// Whether a value of type `sub` may be used where `sup` is expected.
pub(crate) fn is_subtype(schema: &Schema, sub: &Type, sup: &Type) -> bool {
    if sub == sup {
        return true;
    }
    match (sub, sup) {
        (Type::NonNullNamed(_) | Type::NonNullList(_), Type::NonNullNamed(_) | Type::NonNullList(_)) => {
            is_subtype(schema, &nullable(sub), &nullable(sup))
        }
        (_, Type::NonNullNamed(_) | Type::NonNullList(_)) => false,
        (Type::NonNullNamed(_) | Type::NonNullList(_), _) => {
            is_subtype(schema, &nullable(sub), sup)
        }
        (Type::List(sub_item), Type::List(sup_item)) => is_subtype(schema, sub_item, sup_item),
        (_, Type::List(_)) | (Type::List(_), _) => false,
        (Type::Named(sub_name), Type::Named(sup_name)) => {
            is_abstract(schema, sup_name)
                && possible_types(schema, sup_name).contains(&sub_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::test_support::schema;

    fn parse_type(text: &str) -> Type {
        let wrapped = format!("query($v: {text}) {{ number }}");
        let document = ast::Document::parse(wrapped, "type.graphql").unwrap();
        match &document.definitions[0] {
            ast::Definition::OperationDefinition(op) => (*op.variables[0].ty).clone(),
            _ => unreachable!(),
        }
    }

    #[test]
    fn prints_wrapped_types() {
        assert_eq!(print_type(&parse_type("[Int!]!")), "[Int!]!");
        assert_eq!(print_type(&parse_type("String")), "String");
        assert_eq!(named_type(&parse_type("[[Film]]")).as_str(), "Film");
    }

    #[test]
    fn non_null_is_a_subtype_of_nullable() {
        let schema = schema();
        assert!(is_subtype(&schema, &parse_type("Int!"), &parse_type("Int")));
        assert!(!is_subtype(&schema, &parse_type("Int"), &parse_type("Int!")));
        assert!(is_subtype(&schema, &parse_type("[Int!]!"), &parse_type("[Int]")));
        assert!(!is_subtype(&schema, &parse_type("String!"), &parse_type("Int!")));
    }

    #[test]
    fn union_overlaps_with_members() {
        let schema = schema();
        assert!(types_overlap(&schema, "SomeUnion", "SomeUnionMember"));
        assert!(!types_overlap(&schema, "Film", "Greetings"));
    }

    #[test]
    fn finds_meta_fields() {
        let schema = schema();
        assert!(field_definition(&schema, "Film", "__typename").is_some());
        assert!(field_definition(&schema, "Query", "__schema").is_some());
        assert!(field_definition(&schema, "Film", "__schema").is_none());
        assert!(field_definition(&schema, "Film", "missing").is_none());
    }

    #[test]
    fn reads_deprecation_reason() {
        let schema = schema();
        let hi = field_definition(&schema, "Greetings", "hi").unwrap();
        assert_eq!(
            deprecation_reason(&hi.directives).as_deref(),
            Some("Please use the more formal greeting 'hello'")
        );
        let hello = field_definition(&schema, "Greetings", "hello").unwrap();
        assert_eq!(deprecation_reason(&hello.directives), None);
    }
}
