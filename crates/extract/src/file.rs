use std::collections::HashMap;

use graphql_tag_types::{LineIndex, SourceLocation};

use crate::template::{StaticExpr, TaggedTemplate};

/// Variable declarations in a file, by binding name.
///
/// Every declarator is recorded, so a name declared more than once has
/// several entries and never resolves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    declarators: HashMap<String, Vec<Option<StaticExpr>>>,
}

impl Bindings {
    pub(crate) fn declare(&mut self, name: String, init: Option<StaticExpr>) {
        self.declarators.entry(name).or_default().push(init);
    }

    /// The initializer of `name` when it is declared exactly once and
    /// initialized.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&StaticExpr> {
        match self.declarators.get(name)?.as_slice() {
            [Some(init)] => Some(init),
            _ => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.declarators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarators.is_empty()
    }
}

/// Everything extracted from one JavaScript or TypeScript source file.
#[derive(Debug, Clone)]
pub struct ExtractedFile {
    pub source: String,
    pub line_index: LineIndex,
    /// Tagged templates in source order, nested ones after their parent.
    pub templates: Vec<TaggedTemplate>,
    pub bindings: Bindings,
}

impl ExtractedFile {
    /// 1-based location of a byte offset in the source.
    #[must_use]
    pub fn location(&self, offset: usize) -> SourceLocation {
        self.line_index.location(&self.source, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_tag_types::OffsetRange;

    fn ident(name: &str) -> StaticExpr {
        StaticExpr::Ident {
            name: name.to_string(),
            span: OffsetRange::new(0, name.len()),
        }
    }

    #[test]
    fn resolves_single_initialized_declaration() {
        let mut bindings = Bindings::default();
        bindings.declare("a".into(), Some(ident("b")));
        assert_eq!(bindings.resolve("a"), Some(&ident("b")));
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn redeclared_or_uninitialized_names_do_not_resolve() {
        let mut bindings = Bindings::default();
        bindings.declare("a".into(), Some(ident("b")));
        bindings.declare("a".into(), Some(ident("c")));
        bindings.declare("d".into(), None);
        assert_eq!(bindings.resolve("a"), None);
        assert_eq!(bindings.resolve("d"), None);
        assert_eq!(bindings.resolve("missing"), None);
    }
}
