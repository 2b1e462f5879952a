//! Lexical classification of source text.
//!
//! Splits text into code, line comments, block comments and string
//! literals. Later stages never look at raw text for structure; they work
//! on a [`CodeView`], where everything that is not code is blanked out
//! while byte offsets and line breaks are preserved.

/// Kind of a classified region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Code,
    LineComment,
    BlockComment,
    StringLiteral,
}

/// A classified region of the input, `start..end` in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub kind: SpanKind,
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn as_str<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, SpanKind::LineComment | SpanKind::BlockComment)
    }
}

/// Classify `text` into ordered, disjoint spans covering all of it.
///
/// Unterminated block comments and string literals extend to the end of
/// the input.
pub fn classify(text: &str) -> Vec<TextSpan> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut spans = Vec::new();
    let mut code_start = 0;
    let mut i = 0;

    while i < len {
        let (kind, end) = match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = text[i..].find('\n').map(|p| i + p).unwrap_or(len);
                (SpanKind::LineComment, end)
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = text[i + 2..]
                    .find("*/")
                    .map(|p| i + 2 + p + 2)
                    .unwrap_or(len);
                (SpanKind::BlockComment, end)
            }
            b'"' => (SpanKind::StringLiteral, string_end(bytes, i)),
            b'\'' => match char_literal_end(text, i) {
                Some(end) => (SpanKind::StringLiteral, end),
                None => {
                    i += 1;
                    continue;
                }
            },
            _ => {
                i += 1;
                continue;
            }
        };

        if code_start < i {
            spans.push(TextSpan {
                kind: SpanKind::Code,
                start: code_start,
                end: i,
            });
        }
        spans.push(TextSpan {
            kind,
            start: i,
            end,
        });
        i = end;
        code_start = end;
    }

    if code_start < len {
        spans.push(TextSpan {
            kind: SpanKind::Code,
            start: code_start,
            end: len,
        });
    }

    spans
}

/// End of a double-quoted literal starting at `start`, honoring `\` escapes.
fn string_end(bytes: &[u8], start: usize) -> usize {
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'"' => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

/// End of a character literal (`'x'`, `'\n'`, `'A'`) starting at `start`.
///
/// A quote that does not open a well-formed literal is plain code.
fn char_literal_end(text: &str, start: usize) -> Option<usize> {
    let rest = &text[start + 1..];
    let mut chars = rest.char_indices();
    let (_, first) = chars.next()?;

    if first == '\\' {
        let (_, escaped) = chars.next()?;
        let after = 1 + escaped.len_utf8();
        let close = after + rest[after..].find('\'')?;
        // Escapes are short; anything longer is not a literal.
        if close > 7 {
            return None;
        }
        return Some(start + 1 + close + 1);
    }

    if first == '\'' || first == '\n' {
        return None;
    }
    let close = first.len_utf8();
    if rest[close..].starts_with('\'') {
        Some(start + 1 + close + 1)
    } else {
        None
    }
}

/// Source text paired with a blanked copy containing only code.
///
/// Both strings have identical byte length and identical line breaks, so
/// an offset found in the masked copy is valid in the original.
#[derive(Debug, Clone)]
pub struct CodeView<'a> {
    original: &'a str,
    masked: String,
    line_starts: Vec<usize>,
}

impl<'a> CodeView<'a> {
    pub fn new(original: &'a str) -> Self {
        let spans = classify(original);
        let masked = mask(original, &spans);
        let line_starts = std::iter::once(0)
            .chain(original.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            original,
            masked,
            line_starts,
        }
    }

    pub fn original(&self) -> &'a str {
        self.original
    }

    /// The text with comments and literals replaced by spaces.
    pub fn code(&self) -> &str {
        &self.masked
    }

    /// 1-indexed line containing byte `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }
}

/// Blank every non-code byte, keeping line breaks.
fn mask(text: &str, spans: &[TextSpan]) -> String {
    let mut out = String::with_capacity(text.len());
    for span in spans {
        let slice = span.as_str(text);
        if span.kind == SpanKind::Code {
            out.push_str(slice);
            continue;
        }
        for ch in slice.chars() {
            match ch {
                '\n' | '\r' => out.push(ch),
                _ => out.extend(std::iter::repeat(' ').take(ch.len_utf8())),
            }
        }
    }
    out
}

/// Code-only copy of `text` (see [`CodeView::code`]).
pub fn code_only(text: &str) -> String {
    mask(text, &classify(text))
}

/// Remove all comments from `text`, keeping string literals intact.
///
/// Lines that held nothing but a comment are dropped; trailing whitespace
/// left behind by a removed comment is trimmed. Returns the stripped text
/// and the number of comments removed.
pub fn strip_comments(text: &str) -> (String, usize) {
    let spans = classify(text);
    let mut removed = 0;
    let mut stripped = String::with_capacity(text.len());

    for span in &spans {
        if span.is_comment() {
            removed += 1;
            // Keep the line structure of multi-line block comments.
            stripped.extend(span.as_str(text).chars().filter(|c| *c == '\n'));
        } else {
            stripped.push_str(span.as_str(text));
        }
    }

    let kept: Vec<&str> = text
        .split('\n')
        .zip(stripped.split('\n'))
        .filter(|(orig, line)| !line.trim().is_empty() || orig.trim().is_empty())
        .map(|(_, line)| line.trim_end())
        .collect();

    (kept.join("\n"), removed)
}
