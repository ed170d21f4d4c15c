//! Per-template document pipeline: reconstruct, parse, validate and report
//! the first problem at its location in the file.

use apollo_compiler::ast;
use graphql_tag_extract::{cook_js, CookedText, ExtractedFile, TaggedTemplate, Template};
use graphql_tag_types::{LineIndex, SourceLocation};

use crate::cache::ResolvedConfig;
use crate::client_fields::strip_client_fields;
use crate::diagnostics::{NodeRef, Report};
use crate::dialect::Dialect;
use crate::infer::{infer_template, InferredLiteral};
use crate::location::source_location_from_doc_location;
use crate::processor::INTERNAL_TAG;
use crate::reconstruct::{reconstruct, InterpolationWidth, Reconstruction};
use crate::validation::{validate, ValidationError};

const DOCUMENT_NAME: &str = "template.graphql";

/// Check one tagged template against `config`.
///
/// At most one report comes out: the first syntax error, or else the first
/// validation error.
#[must_use]
pub fn handle_template(
    file: &ExtractedFile,
    tagged: &TaggedTemplate,
    config: &ResolvedConfig,
) -> Option<Report> {
    let template = &tagged.template;
    let node = NodeRef::tagged_template(tagged.span);
    tracing::trace!(span = %tagged.span, tag = %config.tag_name, "Checking template");

    if config.infer_literals && !template.expressions.is_empty() {
        if let Some(inferred) = infer_template(file, template) {
            tracing::trace!(span = %tagged.span, "Using inferred literal");
            return check_inferred(file, template, &inferred, config, node);
        }
    }

    let chunks: Vec<CookedText> = template
        .quasis
        .iter()
        .map(|quasi| cook_js(&quasi.text))
        .collect();
    let chunk_refs: Vec<&str> = chunks.iter().map(|chunk| chunk.text.as_str()).collect();
    let widths: Vec<InterpolationWidth> = template
        .expressions
        .iter()
        .map(|interpolation| InterpolationWidth {
            name_length: interpolation.name_length,
            outer_len: interpolation.outer.len(),
        })
        .collect();

    let mut rebuilt = match reconstruct(&chunk_refs, &widths, config.dialect) {
        Ok(rebuilt) => rebuilt,
        Err(invalid) => {
            let span = template.expressions.get(invalid.index)?.expr.span();
            return Some(Report::new(
                invalid.error.to_string(),
                NodeRef::expression(span),
                file.location(span.start),
            ));
        }
    };
    if config.dialect.is_some_and(Dialect::allows_anonymous_fragments) {
        rebuilt.name_anonymous_fragment();
    }

    let internal = config.tag_name == INTERNAL_TAG;
    let mapper = TemplateLocations::new(file, template, &chunks, internal);
    let error = check_document(&rebuilt.text, config)?;
    let location = error
        .offset
        .map_or(mapper.start(), |offset| mapper.locate(rebuilt.source_offset(offset)));
    Some(Report::new(error.message, node, location))
}

/// Maps offsets in the cooked template text to file locations.
///
/// The cooked text is the cooked chunks joined by the raw `${ ... }` spans,
/// which is the text offsets from [`Reconstruction::source_offset`] refer to.
struct TemplateLocations<'a> {
    file: &'a ExtractedFile,
    template: &'a Template,
    chunks: &'a [CookedText],
    /// For the file-mode wrapper the template text is the linted file, so
    /// locations are computed over the cooked text itself.
    cooked: Option<(String, LineIndex)>,
}

impl<'a> TemplateLocations<'a> {
    fn new(
        file: &'a ExtractedFile,
        template: &'a Template,
        chunks: &'a [CookedText],
        internal: bool,
    ) -> Self {
        let cooked = internal.then(|| {
            let text: String = chunks.iter().map(|chunk| chunk.text.as_str()).collect();
            let index = LineIndex::new(&text);
            (text, index)
        });
        Self {
            file,
            template,
            chunks,
            cooked,
        }
    }

    fn start(&self) -> SourceLocation {
        match &self.cooked {
            Some(_) => SourceLocation::new(1, 1),
            None => self.file.location(self.template.span.start),
        }
    }

    fn locate(&self, template_offset: usize) -> SourceLocation {
        match &self.cooked {
            Some((text, index)) => index.location(text, template_offset),
            None => self.file.location(self.raw_offset(template_offset)),
        }
    }

    /// File offset of a cooked template offset.
    fn raw_offset(&self, template_offset: usize) -> usize {
        let mut remaining = template_offset;
        let chunks = self.chunks.iter().zip(&self.template.quasis);
        for (index, (chunk, quasi)) in chunks.enumerate() {
            let Some(interpolation) = self.template.expressions.get(index) else {
                return quasi.span.start + chunk.raw_offset(remaining);
            };
            if remaining < chunk.text.len() {
                return quasi.span.start + chunk.raw_offset(remaining);
            }
            remaining -= chunk.text.len();
            if remaining < interpolation.outer.len() {
                return interpolation.outer.start + remaining;
            }
            remaining -= interpolation.outer.len();
        }
        self.template.content_span().end
    }
}

fn check_inferred(
    file: &ExtractedFile,
    template: &Template,
    inferred: &InferredLiteral,
    config: &ResolvedConfig,
    node: NodeRef,
) -> Option<Report> {
    let mut rebuilt = Reconstruction::verbatim(inferred.text.as_str());
    if config.dialect.is_some_and(Dialect::allows_anonymous_fragments) {
        rebuilt.name_anonymous_fragment();
    }

    let error = check_document(&rebuilt.text, config)?;
    let node_start = file.location(template.span.start);
    let location = error.offset.map_or(node_start, |offset| {
        let index = LineIndex::new(&inferred.text);
        let doc_location = index.location(&inferred.text, rebuilt.source_offset(offset));
        source_location_from_doc_location(node_start, doc_location, &inferred.source_maps)
    });
    Some(Report::new(error.message, node, location))
}

/// Parse `text` and validate it; returns the first problem.
fn check_document(text: &str, config: &ResolvedConfig) -> Option<ValidationError> {
    let mut document = match parse_document(text) {
        Ok(document) => document,
        Err(error) => return Some(error),
    };

    let schema = config.schema.as_ref()?;
    if config.dialect == Some(Dialect::Apollo) && !strip_client_fields(&mut document) {
        tracing::trace!("Only client fields left, skipping validation");
        return None;
    }

    let errors = validate(schema, &document, text, &config.validators);
    if errors.len() > 1 {
        tracing::trace!(dropped = errors.len() - 1, "Reporting first validation error only");
    }
    errors.into_iter().next()
}

/// Parse a reconstructed document, reporting the first syntax error the way
/// graphql-js words it.
fn parse_document(text: &str) -> Result<ast::Document, ValidationError> {
    let tree = apollo_parser::Parser::new(text).parse();
    if let Some(error) = tree.errors().next() {
        let at_eof = error.data() == "EOF" || error.index() >= text.len();
        let message = if at_eof {
            "Syntax Error: Unexpected <EOF>".to_string()
        } else {
            format!("Syntax Error: {}", error.message())
        };
        return Err(ValidationError {
            message,
            offset: Some(error.index().min(text.len())),
        });
    }

    let document = match ast::Document::parse(text, DOCUMENT_NAME) {
        Ok(document) => document,
        Err(with_errors) => with_errors.partial,
    };
    if document.definitions.is_empty() {
        return Err(ValidationError {
            message: "Syntax Error: Unexpected <EOF>".to_string(),
            offset: Some(text.len()),
        });
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use graphql_tag_extract::{extract_from_source, Language};
    use graphql_tag_test_utils::TEST_SCHEMA;

    use super::*;
    use crate::diagnostics::NodeKind;
    use crate::schema::schema_from_sdl;
    use crate::validation::{builtin_rule, SPECIFIED_RULES};

    fn config(dialect: Option<Dialect>) -> ResolvedConfig {
        let excluded = Dialect::excluded_validators(dialect);
        ResolvedConfig {
            schema: Some(schema_from_sdl(TEST_SCHEMA, "schema.graphql").unwrap()),
            dialect,
            tag_name: Dialect::default_tag(dialect).to_string(),
            validators: SPECIFIED_RULES
                .into_iter()
                .filter(|name| !excluded.contains(name))
                .map(|name| builtin_rule(name).unwrap())
                .collect(),
            infer_literals: false,
        }
    }

    fn check(source: &str, config: &ResolvedConfig) -> Option<Report> {
        let file = extract_from_source(source, Language::JavaScript).unwrap();
        handle_template(&file, &file.templates[0], config)
    }

    #[test]
    fn valid_template() {
        assert_eq!(check("const x = gql`{ number }`", &config(None)), None);
    }

    #[test]
    fn unknown_field_on_first_line() {
        let report = check("const x = gql`{ missing }`", &config(None)).unwrap();
        assert_eq!(report.message, "Cannot query field \"missing\" on type \"Query\".");
        assert_eq!(report.location, SourceLocation::new(1, 17));
        assert_eq!(report.node.kind, NodeKind::TaggedTemplate);
    }

    #[test]
    fn multi_line_location() {
        let report = check(
            "const x = gql`\n  query {\n    nonExistentQuery\n  }\n`",
            &config(None),
        )
        .unwrap();
        assert_eq!(report.location, SourceLocation::new(3, 5));
    }

    #[test]
    fn empty_template_is_a_syntax_error() {
        let report = check("const x = gql``", &config(None)).unwrap();
        assert_eq!(report.message, "Syntax Error: Unexpected <EOF>");
    }

    #[test]
    fn host_escapes_are_cooked_before_parsing() {
        let escaped_backtick =
            r#"const x = gql`mutation { createComment(input: { text: "a\`b" }) { story { id } } }`"#;
        assert_eq!(check(escaped_backtick, &config(None)), None);

        let escaped_dollar =
            r#"const x = gql`mutation { createComment(input: { text: "\${x}" }) { story { id } } }`"#;
        assert_eq!(check(escaped_dollar, &config(None)), None);
    }

    #[test]
    fn locations_after_escapes_point_at_raw_source() {
        let source = r#"const x = gql`mutation {
  createComment(input: { text: "\u0041\`" }) { story { id missing } }
}`"#;
        let report = check(source, &config(None)).unwrap();
        assert_eq!(report.message, "Cannot query field \"missing\" on type \"Story\".");
        let line = source.lines().nth(1).unwrap();
        let column = line.find("missing").unwrap() + 1;
        assert_eq!(report.location, SourceLocation::new(2, column));
    }

    #[test]
    fn interpolation_inside_braces() {
        let report = check("const x = gql`{ ${x} }`", &config(None)).unwrap();
        assert_eq!(
            report.message,
            "Invalid interpolation - fragment interpolation must occur outside of the brackets."
        );
        assert_eq!(report.node.kind, NodeKind::Expression);
        assert_eq!(report.location, SourceLocation::new(1, 19));
    }

    #[test]
    fn interpolation_outside_braces_is_elided() {
        assert_eq!(check("const x = gql`{ number } ${x}`", &config(None)), None);
    }

    #[test]
    fn relay_variable_placeholder() {
        let config = config(Some(Dialect::Relay));
        let report = check(
            "const x = Relay.QL`fragment on Query { sum(a: ${a}, b: 2) }`",
            &config,
        );
        assert_eq!(report, None);
    }

    #[test]
    fn relay_anonymous_fragment_location() {
        let config = config(Some(Dialect::Relay));
        let report = check(
            "const x = Relay.QL`fragment on Greetings { hellox }`",
            &config,
        )
        .unwrap();
        assert_eq!(
            report.message,
            "Cannot query field \"hellox\" on type \"Greetings\". Did you mean \"hello\"?"
        );
        assert_eq!(report.location, SourceLocation::new(1, 44));
    }

    #[test]
    fn no_schema_still_parses() {
        let config = ResolvedConfig {
            schema: None,
            ..config(None)
        };
        assert_eq!(check("const x = gql`{ missing }`", &config), None);
        assert!(check("const x = gql`{ missing `", &config).is_some());
    }

    #[test]
    fn apollo_client_fields_are_ignored() {
        let config = config(Some(Dialect::Apollo));
        assert_eq!(
            check("const x = gql`{ number isLoggedIn @client }`", &config),
            None
        );
    }

    #[test]
    fn only_the_first_error_is_reported() {
        let mut config = config(None);
        config.validators = vec![
            builtin_rule("FieldsOnCorrectType").unwrap(),
            builtin_rule("ScalarLeafs").unwrap(),
        ];
        let report = check("const x = gql`{ allFilms missing }`", &config).unwrap();
        assert_eq!(
            report.message,
            "Field \"allFilms\" of type \"AllFilmsObj\" must have a selection of subfields. Did you mean \"allFilms { ... }\"?"
        );
    }

    #[test]
    fn inferred_literals_map_into_constants() {
        let config = ResolvedConfig {
            infer_literals: true,
            ..config(None)
        };
        let report = check(
            "const F = 'missing';\nconst x = gql`{ ${F} }`",
            &config,
        )
        .unwrap();
        assert_eq!(report.message, "Cannot query field \"missing\" on type \"Query\".");
        assert_eq!(report.location, SourceLocation::new(1, 12));
    }
}
