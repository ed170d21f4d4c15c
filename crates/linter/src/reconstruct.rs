//! Turning a template literal into a parseable GraphQL document.
//!
//! Every `${...}` is replaced by a placeholder whose width is a pure function
//! of the expression width, the dialect and the text just before it. The
//! choice of placeholder is a heuristic over the preceding text, not a
//! grammar: a trailing `:` means a variable and a trailing `...` means a
//! fragment spread. Each substitution is recorded as a [`Splice`] so that
//! offsets in the document can be mapped back to the template text.

use std::sync::LazyLock;

use regex::Regex;

use crate::dialect::Dialect;

/// Character used to pad placeholders to the width of the interpolation.
pub const FILLER: char = 'x';

static VARIABLE_POSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*$").expect("valid regex"));
static SPREAD_POSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\.\.\s*$").expect("valid regex"));
static ANONYMOUS_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"fragment\s+on").expect("valid regex"));

const FRAGMENT_KEYWORD: &str = "fragment";
const SYNTHETIC_FRAGMENT_NAME: &str = " _";

/// Why an interpolation cannot be turned into a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InterpolationError {
    #[error("Invalid interpolation - fragment interpolation must occur outside of the brackets.")]
    InsideBrackets,
    #[error("Invalid interpolation - not a valid fragment or variable.")]
    NotFragmentOrVariable,
}

/// An [`InterpolationError`] together with the index of the offending
/// expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidInterpolation {
    pub index: usize,
    pub error: InterpolationError,
}

/// Width information for one `${...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpolationWidth {
    /// Width of the expression source in characters.
    pub name_length: usize,
    /// Byte length of `${ ... }` in the template text.
    pub outer_len: usize,
}

/// Text substituted for the interpolation after `preceding`.
pub fn placeholder(
    name_length: usize,
    dialect: Option<Dialect>,
    preceding: &str,
) -> Result<String, InterpolationError> {
    let filler = |n: usize| FILLER.to_string().repeat(n);
    match dialect {
        Some(Dialect::Relay) if VARIABLE_POSITION.is_match(preceding) => {
            Ok(format!("${}", filler(name_length + 2)))
        }
        Some(Dialect::Lokka) if SPREAD_POSITION.is_match(preceding) => {
            Ok(filler(name_length + 3))
        }
        Some(Dialect::Relay) => Ok(format!("...{}", filler(name_length))),
        None | Some(Dialect::Apollo) => Ok(String::new()),
        Some(_) => Err(InterpolationError::NotFragmentOrVariable),
    }
}

/// One placeholder substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Splice {
    pub doc_offset: usize,
    pub doc_len: usize,
    pub source_offset: usize,
    pub source_len: usize,
}

/// A reconstructed document and the bookkeeping needed to map offsets in
/// it back to the template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstruction {
    pub text: String,
    pub splices: Vec<Splice>,
    fixup_at: Option<usize>,
}

impl Reconstruction {
    /// A document taken verbatim from the template text.
    #[must_use]
    pub fn verbatim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            splices: Vec::new(),
            fixup_at: None,
        }
    }

    /// Give an anonymous `fragment on T` a synthetic name.
    ///
    /// The first occurrence of `fragment` becomes `fragment _`. Returns
    /// whether the text was changed.
    pub fn name_anonymous_fragment(&mut self) -> bool {
        if self.fixup_at.is_some() || !ANONYMOUS_FRAGMENT.is_match(&self.text) {
            return false;
        }
        let Some(start) = self.text.find(FRAGMENT_KEYWORD) else {
            return false;
        };
        let at = start + FRAGMENT_KEYWORD.len();
        self.text.insert_str(at, SYNTHETIC_FRAGMENT_NAME);
        self.fixup_at = Some(at);
        true
    }

    /// Map a byte offset in the document to a byte offset in the template
    /// text.
    #[must_use]
    pub fn source_offset(&self, doc_offset: usize) -> usize {
        let mut offset = doc_offset;
        if let Some(at) = self.fixup_at {
            let width = SYNTHETIC_FRAGMENT_NAME.len();
            if offset >= at + width {
                offset -= width;
            } else if offset > at {
                offset = at;
            }
        }

        let mut last = None;
        for splice in &self.splices {
            if offset < splice.doc_offset {
                break;
            }
            if offset < splice.doc_offset + splice.doc_len {
                return splice.source_offset + (offset - splice.doc_offset).min(splice.source_len);
            }
            last = Some(splice);
        }

        match last {
            Some(splice) => {
                splice.source_offset + splice.source_len + (offset - splice.doc_offset - splice.doc_len)
            }
            None => offset,
        }
    }
}

/// Join the static chunks of a template, substituting a placeholder for
/// every interpolation.
///
/// Without a dialect, or with `apollo`, the chunk before an interpolation
/// must have balanced braces.
pub fn reconstruct(
    chunks: &[&str],
    interpolations: &[InterpolationWidth],
    dialect: Option<Dialect>,
) -> Result<Reconstruction, InvalidInterpolation> {
    let mut text = String::new();
    let mut splices = Vec::with_capacity(interpolations.len());
    let mut source_offset = 0;
    let checks_braces = matches!(dialect, None | Some(Dialect::Apollo));

    for (index, chunk) in chunks.iter().enumerate() {
        text.push_str(chunk);
        source_offset += chunk.len();

        let Some(width) = interpolations.get(index) else {
            break;
        };

        if checks_braces && chunk.matches('{').count() != chunk.matches('}').count() {
            return Err(InvalidInterpolation {
                index,
                error: InterpolationError::InsideBrackets,
            });
        }

        let replacement = placeholder(width.name_length, dialect, chunk)
            .map_err(|error| InvalidInterpolation { index, error })?;

        splices.push(Splice {
            doc_offset: text.len(),
            doc_len: replacement.len(),
            source_offset,
            source_len: width.outer_len,
        });
        text.push_str(&replacement);
        source_offset += width.outer_len;
    }

    Ok(Reconstruction {
        text,
        splices,
        fixup_at: None,
    })
}
