//! File-related types: [`Language`].

use std::path::Path;

/// Source language of a file (determines how it is linted).
///
/// JavaScript and TypeScript sources are parsed and searched for tagged
/// templates. Standalone GraphQL files are wrapped by the file-mode
/// preprocessor first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Raw GraphQL files (.graphql, .gql)
    GraphQL,
    /// TypeScript (.ts, .mts, .cts)
    TypeScript,
    /// TypeScript with JSX (.tsx)
    Tsx,
    /// JavaScript (.js, .jsx, .mjs, .cjs)
    JavaScript,
}

impl Language {
    /// Detect language from a file path based on its extension.
    ///
    /// Returns `None` if the extension is not one the linter understands.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;

        match extension {
            "graphql" | "gql" => Some(Self::GraphQL),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            _ => None,
        }
    }

    /// Check if this language is part of the JavaScript family.
    #[must_use]
    pub const fn is_js_family(&self) -> bool {
        !matches!(self, Self::GraphQL)
    }

    /// Check if this language is TypeScript (with or without JSX).
    #[must_use]
    pub const fn is_typescript(&self) -> bool {
        matches!(self, Self::TypeScript | Self::Tsx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_language_from_path() {
        assert_eq!(
            Language::from_path(&PathBuf::from("schema.graphql")),
            Some(Language::GraphQL)
        );
        assert_eq!(
            Language::from_path(&PathBuf::from("query.gql")),
            Some(Language::GraphQL)
        );
        assert_eq!(
            Language::from_path(&PathBuf::from("component.ts")),
            Some(Language::TypeScript)
        );
        assert_eq!(
            Language::from_path(&PathBuf::from("component.tsx")),
            Some(Language::Tsx)
        );
        assert_eq!(
            Language::from_path(&PathBuf::from("script.js")),
            Some(Language::JavaScript)
        );
        assert_eq!(
            Language::from_path(&PathBuf::from("script.mjs")),
            Some(Language::JavaScript)
        );
        assert_eq!(Language::from_path(&PathBuf::from("README.md")), None);
        assert_eq!(Language::from_path(&PathBuf::from("Makefile")), None);
    }

    #[test]
    fn test_is_js_family() {
        assert!(Language::TypeScript.is_js_family());
        assert!(Language::Tsx.is_js_family());
        assert!(Language::JavaScript.is_js_family());
        assert!(!Language::GraphQL.is_js_family());
    }

    #[test]
    fn test_is_typescript() {
        assert!(Language::TypeScript.is_typescript());
        assert!(Language::Tsx.is_typescript());
        assert!(!Language::JavaScript.is_typescript());
    }
}
