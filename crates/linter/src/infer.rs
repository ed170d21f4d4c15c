//! Static evaluation of template literals built from string constants.

use graphql_tag_extract::{unescape_js, ExtractedFile, OffsetRange, StaticExpr, Template};
use graphql_tag_types::{SourceLocation, SourceSpan};

use crate::location::{transform_location, SourceMapEntry};

const MAX_DEPTH: usize = 32;

/// A template whose interpolations could all be resolved to strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredLiteral {
    pub text: String,
    pub source_maps: Vec<SourceMapEntry>,
}

struct State {
    text: String,
    cursor: SourceLocation,
    source_maps: Vec<SourceMapEntry>,
}

/// Try to compute the full text of `template` without running any code.
///
/// String literals contribute their value, identifiers resolve through the
/// file's single initialized declaration, and untagged templates recurse.
/// Anything else makes the whole inference fail.
#[must_use]
pub fn infer_template(file: &ExtractedFile, template: &Template) -> Option<InferredLiteral> {
    let mut state = State {
        text: String::new(),
        cursor: SourceLocation::new(1, 1),
        source_maps: Vec::new(),
    };
    infer_template_into(file, template, &mut state, 0)?;
    Some(InferredLiteral {
        text: state.text,
        source_maps: state.source_maps,
    })
}

fn infer_template_into(
    file: &ExtractedFile,
    template: &Template,
    state: &mut State,
    depth: usize,
) -> Option<()> {
    for (index, quasi) in template.quasis.iter().enumerate() {
        append(file, state, quasi.span, &unescape_js(&quasi.text));
        if let Some(interpolation) = template.expressions.get(index) {
            infer_expr(file, &interpolation.expr, state, depth)?;
        }
    }
    Some(())
}

fn infer_expr(file: &ExtractedFile, expr: &StaticExpr, state: &mut State, depth: usize) -> Option<()> {
    if depth >= MAX_DEPTH {
        tracing::debug!("literal inference hit the depth limit");
        return None;
    }
    match expr {
        StaticExpr::Str { value, span } => {
            append(file, state, *span, value);
            Some(())
        }
        StaticExpr::Ident { name, .. } => {
            let init = file.bindings.resolve(name)?;
            infer_expr(file, init, state, depth + 1)
        }
        StaticExpr::Template(template) => infer_template_into(file, template, state, depth + 1),
        StaticExpr::Other { .. } => None,
    }
}

fn append(file: &ExtractedFile, state: &mut State, span: OffsetRange, value: &str) {
    let source = SourceSpan::new(file.location(span.start), file.location(span.end));
    let new_cursor = transform_location(
        end_of_appended(source.start, value),
        source.start,
        state.cursor,
    );
    state.source_maps.push(SourceMapEntry {
        source,
        dest: SourceSpan::new(state.cursor, new_cursor),
    });
    state.text.push_str(value);
    state.cursor = new_cursor;
}

/// Location just past `text` when it is written starting at `start`.
fn end_of_appended(start: SourceLocation, text: &str) -> SourceLocation {
    let mut lines = text.split('\n');
    let first = lines.next().unwrap_or_default();
    match lines.last() {
        None => SourceLocation::new(start.line, start.column + first.chars().count()),
        Some(last) => SourceLocation::new(
            start.line + text.matches('\n').count(),
            last.chars().count() + 1,
        ),
    }
}
