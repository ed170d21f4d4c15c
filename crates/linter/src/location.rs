//! Coordinate transforms between the reconstructed document and the file.

use graphql_tag_types::{SourceLocation, SourceSpan};

/// Provenance of a piece of inferred document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMapEntry {
    /// Where the text came from in the file.
    pub source: SourceSpan,
    /// Where it landed in the document.
    pub dest: SourceSpan,
}

/// Move `loc` from the space of `reference` into the space of `target`.
///
/// Lines shift by the reference delta. Columns only shift when `loc` is on
/// the reference line; other lines keep their column.
#[must_use]
pub fn transform_location(
    loc: SourceLocation,
    reference: SourceLocation,
    target: SourceLocation,
) -> SourceLocation {
    let line = (target.line + loc.line).saturating_sub(reference.line);
    let column = if loc.line == reference.line {
        (target.column + loc.column).saturating_sub(reference.column)
    } else {
        loc.column
    };
    SourceLocation::new(line, column)
}

/// Inclusive start, exclusive end.
#[must_use]
pub fn is_location_in_span(span: SourceSpan, point: SourceLocation) -> bool {
    point.line >= span.start.line
        && point.line <= span.end.line
        && (point.line != span.start.line || point.column >= span.start.column)
        && (point.line != span.end.line || point.column < span.end.column)
}

/// Map a document location to the file using recorded source maps.
///
/// Starts from `node_start` and refines with the last entry whose `dest`
/// contains `doc_location`.
#[must_use]
pub fn source_location_from_doc_location(
    node_start: SourceLocation,
    doc_location: SourceLocation,
    source_maps: &[SourceMapEntry],
) -> SourceLocation {
    source_maps
        .iter()
        .rev()
        .find(|entry| is_location_in_span(entry.dest, doc_location))
        .map_or(node_start, |entry| {
            transform_location(doc_location, entry.dest.start, entry.source.start)
        })
}
