use graphql_tag_types::{DiagnosticSeverity, OffsetRange, SourceLocation};

/// Kind of syntax node a diagnostic is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The whole `tag\`...\`` expression
    TaggedTemplate,
    /// One interpolated expression inside the template
    Expression,
}

impl NodeKind {
    /// Node type name as the host syntax tree calls it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaggedTemplate => "TaggedTemplateExpression",
            Self::Expression => "Expression",
        }
    }
}

/// The node a diagnostic is reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub kind: NodeKind,
    /// Byte span of the node in the linted file
    pub span: OffsetRange,
}

impl NodeRef {
    #[must_use]
    pub const fn tagged_template(span: OffsetRange) -> Self {
        Self {
            kind: NodeKind::TaggedTemplate,
            span,
        }
    }

    #[must_use]
    pub const fn expression(span: OffsetRange) -> Self {
        Self {
            kind: NodeKind::Expression,
            span,
        }
    }
}

/// What the document pipeline found wrong with one template.
///
/// A report carries no rule or severity yet; the rule dispatch adds those
/// when it turns the report into a [`Diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub message: String,
    pub node: NodeRef,
    /// 1-based location in the linted file
    pub location: SourceLocation,
}

impl Report {
    #[must_use]
    pub fn new(message: impl Into<String>, node: NodeRef, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            node,
            location,
        }
    }
}

/// A problem found by one of the rules, ready to be displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Rule identifier including the namespace (e.g. `"graphql/template-strings"`)
    pub rule: String,
    pub severity: DiagnosticSeverity,
    pub message: String,
    /// 1-based location in the linted file
    pub location: SourceLocation,
    pub node: NodeRef,
}

impl Diagnostic {
    #[must_use]
    pub fn from_report(rule: impl Into<String>, severity: DiagnosticSeverity, report: Report) -> Self {
        Self {
            rule: rule.into(),
            severity,
            message: report.message,
            location: report.location,
            node: report.node,
        }
    }
}
