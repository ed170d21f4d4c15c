//! JavaScript string escape handling.

/// A cooked chunk together with the raw offset of every cooked byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookedText {
    pub text: String,
    /// One entry per byte of `text`, plus one for the end.
    raw_offsets: Vec<usize>,
}

impl CookedText {
    /// Byte offset in the raw text that produced cooked byte `offset`.
    /// Offsets past the end clamp to the raw length.
    #[must_use]
    pub fn raw_offset(&self, offset: usize) -> usize {
        self.raw_offsets
            .get(offset)
            .or_else(|| self.raw_offsets.last())
            .copied()
            .unwrap_or(offset)
    }

    fn push(&mut self, c: char, raw_start: usize) {
        self.text.push(c);
        self.raw_offsets
            .extend(std::iter::repeat_n(raw_start, c.len_utf8()));
    }

    fn push_code_point(&mut self, hex: &str, prefix: &str, raw_start: usize) {
        match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
            Some(c) => self.push(c, raw_start),
            None => prefix
                .chars()
                .chain(hex.chars())
                .for_each(|c| self.push(c, raw_start)),
        }
    }
}

/// Cook the escape sequences of a JavaScript string or template chunk.
///
/// Unknown escapes keep the escaped character (`\q` becomes `q`), and line
/// continuations are removed. Malformed numeric escapes are kept verbatim.
#[must_use]
pub fn unescape_js(raw: &str) -> String {
    cook_js(raw).text
}

/// Like [`unescape_js`], keeping the mapping back to raw offsets.
#[must_use]
pub fn cook_js(raw: &str) -> CookedText {
    let mut out = CookedText {
        text: String::with_capacity(raw.len()),
        raw_offsets: Vec::with_capacity(raw.len() + 1),
    };
    let mut chars = raw.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c != '\\' {
            out.push(c, start);
            continue;
        }
        let Some((_, escaped)) = chars.next() else {
            out.push('\\', start);
            break;
        };
        match escaped {
            'n' => out.push('\n', start),
            't' => out.push('\t', start),
            'r' => out.push('\r', start),
            'b' => out.push('\u{8}', start),
            'f' => out.push('\u{c}', start),
            'v' => out.push('\u{b}', start),
            '0' => out.push('\0', start),
            '\r' => {
                if chars.peek().is_some_and(|&(_, c)| c == '\n') {
                    chars.next();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            'x' => {
                let hex: String = chars.by_ref().take(2).map(|(_, c)| c).collect();
                out.push_code_point(&hex, "\\x", start);
            }
            'u' if chars.peek().is_some_and(|&(_, c)| c == '{') => {
                chars.next();
                let hex: String = chars
                    .by_ref()
                    .map(|(_, c)| c)
                    .take_while(|c| *c != '}')
                    .collect();
                out.push_code_point(&hex, "\\u{", start);
            }
            'u' => {
                let hex: String = chars.by_ref().take(4).map(|(_, c)| c).collect();
                out.push_code_point(&hex, "\\u", start);
            }
            other => out.push(other, start),
        }
    }

    out.raw_offsets.push(raw.len());
    out
}
