//! Schema validation of executable documents.
//!
//! Every validator is a [`ValidationRule`] that hands out a fresh
//! [`DocumentVisitor`] per document. One walk drives all visitors together,
//! so errors come out in document order and, within one node, in rule order.

mod context;
mod registry;
pub(crate) mod rules;
mod suggestions;
mod type_info;
mod walker;

use std::fmt;
use std::sync::Arc;

use apollo_compiler::ast;
use apollo_compiler::{Name, Node, Schema};

pub use context::{ValidationContext, VariableUsage};
pub use registry::{builtin_rule, custom_rule, lookup_rule, SPECIFIED_RULES};
pub use suggestions::{quoted_or_list, suggestion_list};

/// One structural problem in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
    /// Byte offset into the validated document text.
    pub offset: Option<usize>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A named validator.
pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Visitor holding the per-document state of this rule.
    fn visitor(&self) -> Box<dyn DocumentVisitor>;
}

impl fmt::Debug for dyn ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a directive is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveSite {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
}

impl DirectiveSite {
    #[must_use]
    pub const fn for_operation(operation_type: ast::OperationType) -> Self {
        match operation_type {
            ast::OperationType::Query => Self::Query,
            ast::OperationType::Mutation => Self::Mutation,
            ast::OperationType::Subscription => Self::Subscription,
        }
    }

    #[must_use]
    pub const fn location(self) -> ast::DirectiveLocation {
        match self {
            Self::Query => ast::DirectiveLocation::Query,
            Self::Mutation => ast::DirectiveLocation::Mutation,
            Self::Subscription => ast::DirectiveLocation::Subscription,
            Self::Field => ast::DirectiveLocation::Field,
            Self::FragmentDefinition => ast::DirectiveLocation::FragmentDefinition,
            Self::FragmentSpread => ast::DirectiveLocation::FragmentSpread,
            Self::InlineFragment => ast::DirectiveLocation::InlineFragment,
            Self::VariableDefinition => ast::DirectiveLocation::VariableDefinition,
        }
    }

    /// Name as written in directive definitions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "QUERY",
            Self::Mutation => "MUTATION",
            Self::Subscription => "SUBSCRIPTION",
            Self::Field => "FIELD",
            Self::FragmentDefinition => "FRAGMENT_DEFINITION",
            Self::FragmentSpread => "FRAGMENT_SPREAD",
            Self::InlineFragment => "INLINE_FRAGMENT",
            Self::VariableDefinition => "VARIABLE_DEFINITION",
        }
    }
}

/// Enter/leave hooks called by the document walker.
///
/// Type information in the context is already updated for the node when an
/// `enter_*` hook runs and still in place when the matching `leave_*` runs.
#[allow(unused_variables)]
pub trait DocumentVisitor {
    fn enter_document(&mut self, cx: &mut ValidationContext<'_>, document: &ast::Document) {}
    fn leave_document(&mut self, cx: &mut ValidationContext<'_>, document: &ast::Document) {}

    fn enter_operation(
        &mut self,
        cx: &mut ValidationContext<'_>,
        operation: &Node<ast::OperationDefinition>,
    ) {
    }
    fn leave_operation(
        &mut self,
        cx: &mut ValidationContext<'_>,
        operation: &Node<ast::OperationDefinition>,
    ) {
    }

    fn enter_fragment_definition(
        &mut self,
        cx: &mut ValidationContext<'_>,
        fragment: &Node<ast::FragmentDefinition>,
    ) {
    }
    fn leave_fragment_definition(
        &mut self,
        cx: &mut ValidationContext<'_>,
        fragment: &Node<ast::FragmentDefinition>,
    ) {
    }

    fn enter_selection_set(&mut self, cx: &mut ValidationContext<'_>, selections: &[ast::Selection]) {}
    fn leave_selection_set(&mut self, cx: &mut ValidationContext<'_>, selections: &[ast::Selection]) {}

    fn enter_field(&mut self, cx: &mut ValidationContext<'_>, field: &Node<ast::Field>) {}
    fn leave_field(&mut self, cx: &mut ValidationContext<'_>, field: &Node<ast::Field>) {}

    fn enter_fragment_spread(
        &mut self,
        cx: &mut ValidationContext<'_>,
        spread: &Node<ast::FragmentSpread>,
    ) {
    }

    fn enter_inline_fragment(
        &mut self,
        cx: &mut ValidationContext<'_>,
        inline: &Node<ast::InlineFragment>,
    ) {
    }
    fn leave_inline_fragment(
        &mut self,
        cx: &mut ValidationContext<'_>,
        inline: &Node<ast::InlineFragment>,
    ) {
    }

    fn enter_directive(
        &mut self,
        cx: &mut ValidationContext<'_>,
        directive: &Node<ast::Directive>,
        site: DirectiveSite,
    ) {
    }
    fn leave_directive(
        &mut self,
        cx: &mut ValidationContext<'_>,
        directive: &Node<ast::Directive>,
        site: DirectiveSite,
    ) {
    }

    fn enter_argument(&mut self, cx: &mut ValidationContext<'_>, argument: &Node<ast::Argument>) {}
    fn leave_argument(&mut self, cx: &mut ValidationContext<'_>, argument: &Node<ast::Argument>) {}

    fn enter_variable_definition(
        &mut self,
        cx: &mut ValidationContext<'_>,
        variable: &Node<ast::VariableDefinition>,
    ) {
    }
    fn leave_variable_definition(
        &mut self,
        cx: &mut ValidationContext<'_>,
        variable: &Node<ast::VariableDefinition>,
    ) {
    }

    /// Called for every value, including variable references and list items.
    fn enter_value(&mut self, cx: &mut ValidationContext<'_>, value: &Node<ast::Value>) {}

    fn enter_object_field(
        &mut self,
        cx: &mut ValidationContext<'_>,
        name: &Name,
        value: &Node<ast::Value>,
    ) {
    }

    /// Type references: fragment type conditions and variable types.
    fn enter_named_type(&mut self, cx: &mut ValidationContext<'_>, name: &Name) {}
}

/// Runs `rules` over `document` and returns every error in emission order.
#[must_use]
pub fn validate(
    schema: &Schema,
    document: &ast::Document,
    source: &str,
    rules: &[Arc<dyn ValidationRule>],
) -> Vec<ValidationError> {
    let mut cx = ValidationContext::new(schema, document, source);
    let mut visitors: Vec<Box<dyn DocumentVisitor>> =
        rules.iter().map(|rule| rule.visitor()).collect();
    walker::walk_document(&mut cx, &mut visitors);

    let errors = cx.into_errors();
    tracing::trace!(rules = rules.len(), errors = errors.len(), "Validated document");
    errors
}
