//! Syntax-level description of tagged templates.

use graphql_tag_types::OffsetRange;

/// The callee expression in front of a template literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagExpr {
    /// `gql`
    Ident(String),
    /// `Relay.QL`, only when both sides are plain identifiers
    Member { object: String, property: String },
    /// Calls, computed members, deeper chains and anything else
    Other,
}

/// A `tag` + template literal expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedTemplate {
    pub tag: TagExpr,
    /// Span of the whole tagged expression, tag included.
    pub span: OffsetRange,
    pub template: Template,
}

/// A template literal: `quasis.len() == expressions.len() + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Span from the opening backtick to the closing backtick (inclusive).
    pub span: OffsetRange,
    pub quasis: Vec<Quasi>,
    pub expressions: Vec<Interpolation>,
}

impl Template {
    /// Span of the text between the backticks.
    #[must_use]
    pub const fn content_span(&self) -> OffsetRange {
        OffsetRange::new(self.span.start + 1, self.span.end.saturating_sub(1))
    }
}

/// One static chunk of a template literal, as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quasi {
    /// Raw text (escape sequences are not processed).
    pub text: String,
    pub span: OffsetRange,
}

/// One `${ ... }` interpolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolation {
    pub expr: StaticExpr,
    /// Span of `${ ... }` including the delimiters.
    pub outer: OffsetRange,
    /// Width of the expression's source text in characters.
    pub name_length: usize,
}

/// The parts of an expression that can be evaluated without running code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticExpr {
    /// A string literal; `span` covers the contents between the quotes.
    Str { value: String, span: OffsetRange },
    Ident { name: String, span: OffsetRange },
    /// An untagged template literal.
    Template(Template),
    Other { span: OffsetRange },
}

impl StaticExpr {
    /// Source span of the expression itself.
    #[must_use]
    pub fn span(&self) -> OffsetRange {
        match self {
            // include the quotes
            Self::Str { span, .. } => OffsetRange::new(span.start - 1, span.end + 1),
            Self::Ident { span, .. } | Self::Other { span } => *span,
            Self::Template(template) => template.span,
        }
    }
}
