//! Brace-balanced body extraction.

use super::lexer::CodeView;

/// Location of a `{ ... }` block: byte offsets of the opening and the
/// matching closing brace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodySpan {
    pub open: usize,
    pub close: usize,
}

impl BodySpan {
    /// Content between the braces, trimmed.
    pub fn content<'a>(&self, text: &'a str) -> &'a str {
        text[self.open + 1..self.close].trim()
    }
}

impl CodeView<'_> {
    /// Find the brace closing the block opened at `open`.
    ///
    /// Braces inside comments and literals are ignored. Returns `None` when
    /// `open` is not a code `{` or the block is never closed.
    pub fn find_body(&self, open: usize) -> Option<BodySpan> {
        let code = self.code().as_bytes();
        if code.get(open) != Some(&b'{') {
            return None;
        }

        let mut depth = 0usize;
        for (i, &b) in code.iter().enumerate().skip(open) {
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(BodySpan { open, close: i });
                    }
                }
                _ => {}
            }
        }
        None
    }
}
