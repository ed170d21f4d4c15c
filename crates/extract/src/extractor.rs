use graphql_tag_types::{Language, LineIndex, OffsetRange};
use swc_common::{sync::Lrc, FileName, SourceMap, Spanned};
use swc_core::ecma::ast::{EsVersion, Expr, Lit, MemberProp, Module, Pat, Script, TaggedTpl, Tpl, VarDeclarator};
use swc_core::ecma::parser::{parse_file_as_module, parse_file_as_script, EsSyntax, Syntax, TsSyntax};
use swc_core::ecma::visit::{Visit, VisitWith};

use crate::escape::unescape_js;
use crate::file::{Bindings, ExtractedFile};
use crate::template::{Interpolation, Quasi, StaticExpr, TagExpr, TaggedTemplate, Template};
use crate::{ExtractError, Result};

/// Parse a JavaScript or TypeScript source file and collect every tagged
/// template literal together with the file's variable bindings.
///
/// The file is parsed as an ES module first and as a script when that
/// fails.
///
/// # Errors
///
/// Returns [`ExtractError::Parse`] when the source is not valid for
/// `language`, and [`ExtractError::UnsupportedLanguage`] for GraphQL input.
pub fn extract_from_source(source: &str, language: Language) -> Result<ExtractedFile> {
    let syntax = syntax_for(language)?;
    let line_index = LineIndex::new(source);

    let cm: Lrc<SourceMap> = Lrc::default();
    let fm = cm.new_source_file(Lrc::new(FileName::Anon), source.to_string());
    let base = fm.start_pos.0;

    let mut collector = Collector {
        source,
        base,
        templates: Vec::new(),
        bindings: Bindings::default(),
    };

    let mut recovered = Vec::new();
    match parse_file_as_module(&fm, syntax, EsVersion::EsNext, None, &mut recovered) {
        Ok(module) => visit_module(&module, &mut collector),
        Err(module_err) => {
            tracing::debug!(error = ?module_err.kind(), "module parse failed, retrying as script");
            recovered.clear();
            match parse_file_as_script(&fm, syntax, EsVersion::EsNext, None, &mut recovered) {
                Ok(script) => visit_script(&script, &mut collector),
                Err(_) => {
                    let offset = (module_err.span().lo.0.saturating_sub(base)) as usize;
                    return Err(ExtractError::Parse {
                        message: module_err.kind().msg().to_string(),
                        location: line_index.location(source, offset),
                    });
                }
            }
        }
    }

    if !recovered.is_empty() {
        tracing::debug!(count = recovered.len(), "parser recovered from errors");
    }

    tracing::trace!(
        templates = collector.templates.len(),
        bindings = collector.bindings.len(),
        "extracted source file"
    );

    Ok(ExtractedFile {
        source: source.to_string(),
        line_index,
        templates: collector.templates,
        bindings: collector.bindings,
    })
}

fn syntax_for(language: Language) -> Result<Syntax> {
    let syntax = match language {
        Language::JavaScript => Syntax::Es(EsSyntax {
            jsx: true,
            decorators: true,
            decorators_before_export: true,
            ..Default::default()
        }),
        Language::TypeScript | Language::Tsx => Syntax::Typescript(TsSyntax {
            tsx: language == Language::Tsx,
            decorators: true,
            ..Default::default()
        }),
        Language::GraphQL => return Err(ExtractError::UnsupportedLanguage(language)),
    };
    Ok(syntax)
}

fn visit_module(module: &Module, collector: &mut Collector<'_>) {
    module.visit_with(collector);
}

fn visit_script(script: &Script, collector: &mut Collector<'_>) {
    script.visit_with(collector);
}

struct Collector<'a> {
    source: &'a str,
    base: u32,
    templates: Vec<TaggedTemplate>,
    bindings: Bindings,
}

impl Collector<'_> {
    fn range(&self, span: swc_common::Span) -> OffsetRange {
        OffsetRange::new(
            span.lo.0.saturating_sub(self.base) as usize,
            span.hi.0.saturating_sub(self.base) as usize,
        )
    }

    fn template(&self, tpl: &Tpl) -> Template {
        let span = self.range(tpl.span);
        let content_end = span.end.saturating_sub(1);
        let mut cursor = span.start + 1;
        let mut quasis = Vec::with_capacity(tpl.quasis.len());
        let mut expressions = Vec::with_capacity(tpl.exprs.len());

        for (index, expr) in tpl.exprs.iter().enumerate() {
            let expr_range = self.range(expr.span());
            let opener = self.interpolation_start(tpl, index, cursor, expr_range);
            let closer = self.interpolation_end(tpl, index, expr_range);

            quasis.push(self.quasi(OffsetRange::new(cursor, opener)));
            expressions.push(Interpolation {
                expr: self.static_expr(expr),
                outer: OffsetRange::new(opener, closer + 1),
                name_length: expr_range
                    .slice(self.source)
                    .map_or(expr_range.len(), |text| text.chars().count()),
            });
            cursor = closer + 1;
        }
        quasis.push(self.quasi(OffsetRange::new(cursor, content_end.max(cursor))));

        Template {
            span,
            quasis,
            expressions,
        }
    }

    /// Offset of the `${` opening interpolation `index`.
    ///
    /// Taken from the raw length of the preceding quasi, so delimiters inside
    /// comments in the expression cannot shift it.
    fn interpolation_start(
        &self,
        tpl: &Tpl,
        index: usize,
        cursor: usize,
        expr: OffsetRange,
    ) -> usize {
        let opens_at = |at: &usize| {
            self.source
                .get(*at..)
                .is_some_and(|rest| rest.starts_with("${"))
        };
        if let Some(at) = tpl
            .quasis
            .get(index)
            .map(|quasi| cursor + quasi.raw.len())
            .filter(opens_at)
        {
            return at;
        }
        self.source
            .get(cursor..expr.start)
            .and_then(|between| between.rfind("${"))
            .map_or(expr.start.saturating_sub(2), |i| cursor + i)
    }

    /// Offset of the `}` closing interpolation `index`, found from where the
    /// following quasi begins.
    fn interpolation_end(&self, tpl: &Tpl, index: usize, expr: OffsetRange) -> usize {
        if let Some(next) = tpl.quasis.get(index + 1).map(|quasi| self.range(quasi.span).start) {
            let is_brace = |at: usize| self.source.get(at..=at) == Some("}");
            if next > expr.end && is_brace(next - 1) {
                return next - 1;
            }
            if next >= expr.end && is_brace(next) {
                return next;
            }
        }
        self.source
            .get(expr.end..)
            .and_then(|rest| rest.find('}'))
            .map_or(expr.end, |i| expr.end + i)
    }

    fn quasi(&self, span: OffsetRange) -> Quasi {
        Quasi {
            text: span.slice(self.source).unwrap_or_default().to_string(),
            span,
        }
    }

    fn static_expr(&self, expr: &Expr) -> StaticExpr {
        match expr {
            Expr::Lit(Lit::Str(lit)) => {
                let outer = self.range(lit.span);
                let span = OffsetRange::new(outer.start + 1, outer.end.saturating_sub(1));
                StaticExpr::Str {
                    value: unescape_js(span.slice(self.source).unwrap_or_default()),
                    span,
                }
            }
            Expr::Ident(ident) => StaticExpr::Ident {
                name: ident.sym.to_string(),
                span: self.range(ident.span),
            },
            Expr::Tpl(tpl) => StaticExpr::Template(self.template(tpl)),
            Expr::Paren(paren) => self.static_expr(&paren.expr),
            other => StaticExpr::Other {
                span: self.range(other.span()),
            },
        }
    }
}

fn tag_expr(expr: &Expr) -> TagExpr {
    match expr {
        Expr::Ident(ident) => TagExpr::Ident(ident.sym.to_string()),
        Expr::Member(member) => match (member.obj.as_ref(), &member.prop) {
            (Expr::Ident(object), MemberProp::Ident(property)) => TagExpr::Member {
                object: object.sym.to_string(),
                property: property.sym.to_string(),
            },
            _ => TagExpr::Other,
        },
        _ => TagExpr::Other,
    }
}

impl Visit for Collector<'_> {
    fn visit_tagged_tpl(&mut self, node: &TaggedTpl) {
        let template = TaggedTemplate {
            tag: tag_expr(&node.tag),
            span: self.range(node.span),
            template: self.template(&node.tpl),
        };
        self.templates.push(template);
        node.visit_children_with(self);
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        if let Pat::Ident(binding) = &node.name {
            let init = node.init.as_deref().map(|init| self.static_expr(init));
            self.bindings.declare(binding.id.sym.to_string(), init);
        }
        node.visit_children_with(self);
    }
}
