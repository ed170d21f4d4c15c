use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use apollo_compiler::ast::{self, Type};
use apollo_compiler::schema::{
    DirectiveDefinition, EnumValueDefinition, FieldDefinition, InputValueDefinition,
};
use apollo_compiler::{Name, Node, Schema};

use super::type_info::TypeInfo;
use super::walker;
use super::{DocumentVisitor, ValidationError};

/// A `$variable` reference together with the type expected where it appears.
#[derive(Debug, Clone)]
pub struct VariableUsage {
    pub name: Name,
    pub expected: Option<Type>,
    /// Whether the position supplies its own default value.
    pub has_default: bool,
    pub offset: Option<usize>,
}

/// State shared by all validators during one walk.
pub struct ValidationContext<'a> {
    pub schema: &'a Schema,
    pub document: &'a ast::Document,
    source: &'a str,
    fragments: HashMap<&'a str, &'a Node<ast::FragmentDefinition>>,
    pub(crate) type_info: TypeInfo,
    errors: Vec<ValidationError>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(schema: &'a Schema, document: &'a ast::Document, source: &'a str) -> Self {
        let mut fragments = HashMap::new();
        for definition in &document.definitions {
            if let ast::Definition::FragmentDefinition(fragment) = definition {
                fragments.entry(fragment.name.as_str()).or_insert(fragment);
            }
        }
        Self {
            schema,
            document,
            source,
            fragments,
            type_info: TypeInfo::default(),
            errors: Vec::new(),
        }
    }

    pub fn report(&mut self, message: impl Into<String>, offset: Option<usize>) {
        self.errors.push(ValidationError {
            message: message.into(),
            offset,
        });
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub(crate) fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    pub fn fragment(&self, name: &str) -> Option<&'a Node<ast::FragmentDefinition>> {
        self.fragments.get(name).copied()
    }

    pub fn parent_type(&self) -> Option<&Name> {
        self.type_info.parent_type()
    }

    pub fn output_type(&self) -> Option<&Type> {
        self.type_info.output_type()
    }

    pub fn input_type(&self) -> Option<&Type> {
        self.type_info.input_type()
    }

    pub fn parent_input_type(&self) -> Option<&Type> {
        self.type_info.parent_input_type()
    }

    pub fn field_def(&self) -> Option<&Node<FieldDefinition>> {
        self.type_info.field_def()
    }

    pub fn directive_def(&self) -> Option<&Node<DirectiveDefinition>> {
        self.type_info.directive()
    }

    pub fn argument_def(&self) -> Option<&Node<InputValueDefinition>> {
        self.type_info.argument()
    }

    pub fn enum_value_def(&self) -> Option<&Node<EnumValueDefinition>> {
        self.type_info.enum_value()
    }

    /// Offset of the `{` opening a selection set, found by scanning back
    /// from its first selection.
    pub fn selection_set_offset(&self, selections: &[ast::Selection]) -> Option<usize> {
        let first = selection_offset(selections.first()?)?;
        self.source
            .get(..first)
            .and_then(|before| before.rfind('{'))
    }

    /// Fragment spreads directly inside `selections`, looking through
    /// inline fragments but not into other fragments.
    pub fn fragment_spreads<'s>(
        selections: &'s [ast::Selection],
    ) -> Vec<&'s Node<ast::FragmentSpread>> {
        let mut spreads = Vec::new();
        let mut stack = vec![selections];
        while let Some(set) = stack.pop() {
            for selection in set {
                match selection {
                    ast::Selection::Field(field) => stack.push(&field.selection_set),
                    ast::Selection::FragmentSpread(spread) => spreads.push(spread),
                    ast::Selection::InlineFragment(inline) => stack.push(&inline.selection_set),
                }
            }
        }
        spreads
    }

    /// Every fragment reachable from `selections`, in discovery order.
    pub fn recursively_referenced_fragments<'s>(
        &self,
        selections: &'s [ast::Selection],
    ) -> Vec<&'s Node<ast::FragmentDefinition>>
    where
        'a: 's,
    {
        let mut found = Vec::new();
        let mut seen = HashSet::new();
        let mut pending = vec![selections];
        while let Some(set) = pending.pop() {
            for spread in Self::fragment_spreads(set) {
                if !seen.insert(spread.fragment_name.as_str()) {
                    continue;
                }
                if let Some(fragment) = self.fragment(spread.fragment_name.as_str()) {
                    found.push(fragment);
                    pending.push(&fragment.selection_set);
                }
            }
        }
        found
    }

    /// Variable usages of an operation, including those inside every
    /// fragment it references.
    pub fn recursive_variable_usages(
        &self,
        operation: &Node<ast::OperationDefinition>,
    ) -> Vec<VariableUsage> {
        let usages = Rc::new(RefCell::new(Vec::new()));
        let mut inner = ValidationContext::new(self.schema, self.document, self.source);
        let mut visitors: Vec<Box<dyn DocumentVisitor>> = vec![Box::new(UsageCollector {
            usages: Rc::clone(&usages),
            in_definition: false,
        })];

        walker::walk_operation(&mut inner, &mut visitors, operation);
        for fragment in self.recursively_referenced_fragments(&operation.selection_set) {
            walker::walk_fragment_definition(&mut inner, &mut visitors, fragment);
        }

        drop(visitors);
        Rc::try_unwrap(usages)
            .map(RefCell::into_inner)
            .unwrap_or_default()
    }
}

struct UsageCollector {
    usages: Rc<RefCell<Vec<VariableUsage>>>,
    in_definition: bool,
}

impl DocumentVisitor for UsageCollector {
    fn enter_variable_definition(
        &mut self,
        _cx: &mut ValidationContext<'_>,
        _variable: &Node<ast::VariableDefinition>,
    ) {
        self.in_definition = true;
    }

    fn leave_variable_definition(
        &mut self,
        _cx: &mut ValidationContext<'_>,
        _variable: &Node<ast::VariableDefinition>,
    ) {
        self.in_definition = false;
    }

    fn enter_value(&mut self, cx: &mut ValidationContext<'_>, value: &Node<ast::Value>) {
        if self.in_definition {
            return;
        }
        if let ast::Value::Variable(name) = &**value {
            self.usages.borrow_mut().push(VariableUsage {
                name: name.clone(),
                expected: cx.input_type().cloned(),
                has_default: cx.type_info.has_default(),
                offset: value.location().map(|span| span.offset()),
            });
        }
    }
}

pub(crate) fn selection_offset(selection: &ast::Selection) -> Option<usize> {
    match selection {
        ast::Selection::Field(field) => field.location(),
        ast::Selection::FragmentSpread(spread) => spread.location(),
        ast::Selection::InlineFragment(inline) => inline.location(),
    }
    .map(|span| span.offset())
}
