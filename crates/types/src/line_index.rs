//! Byte offset to line/column conversion.

use crate::SourceLocation;

/// Line start table for a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the start of each line
    line_starts: Vec<usize>,
}

impl LineIndex {
    #[must_use]
    pub fn new(text: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { line_starts }
    }

    /// Convert a byte offset to a line/column position (0-based, column in bytes)
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i.saturating_sub(1));

        let col = offset - self.line_starts[line];
        (line, col)
    }

    /// Convert a byte offset into `text` to a 1-based [`SourceLocation`]
    /// whose column counts characters.
    ///
    /// Offsets past the end of `text` are clamped to its end.
    #[must_use]
    pub fn location(&self, text: &str, offset: usize) -> SourceLocation {
        let offset = offset.min(text.len());
        let (line, _) = self.line_col(offset);
        let start = self.line_starts[line];
        let column = text
            .get(start..offset)
            .map_or(offset - start, |prefix| prefix.chars().count());
        SourceLocation::new(line + 1, column + 1)
    }

    /// Get the byte offset of the start of a line
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Get the number of lines
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index_new() {
        let text = "line 1\nline 2\nline 3";
        let index = LineIndex::new(text);

        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_start(0), Some(0));
        assert_eq!(index.line_start(1), Some(7));
        assert_eq!(index.line_start(2), Some(14));
    }

    #[test]
    fn test_line_index_line_col() {
        let text = "line 1\nline 2\nline 3";
        let index = LineIndex::new(text);

        assert_eq!(index.line_col(0), (0, 0));
        assert_eq!(index.line_col(5), (0, 5));
        assert_eq!(index.line_col(7), (1, 0));
        assert_eq!(index.line_col(10), (1, 3));
        assert_eq!(index.line_col(14), (2, 0));
    }

    #[test]
    fn test_location_is_one_based() {
        let text = "ab\ncd";
        let index = LineIndex::new(text);

        assert_eq!(index.location(text, 0), SourceLocation::new(1, 1));
        assert_eq!(index.location(text, 4), SourceLocation::new(2, 2));
    }

    #[test]
    fn test_location_counts_characters() {
        let text = "é = gql`{ a }`";
        let index = LineIndex::new(text);

        // 'é' is two bytes but one column
        assert_eq!(index.location(text, 2), SourceLocation::new(1, 2));
    }

    #[test]
    fn test_location_clamps_past_end() {
        let text = "abc";
        let index = LineIndex::new(text);
        assert_eq!(index.location(text, 10), SourceLocation::new(1, 4));
    }

    #[test]
    fn test_line_index_empty() {
        let index = LineIndex::new("");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_col(0), (0, 0));
    }
}
