//! Helpers for type expressions such as `Map<String, List<Foo>>[]`.

/// Split on `sep` at bracket depth zero.
///
/// `<...>`, `[...]` and `(...)` nest; a separator inside any of them does
/// not split. Empty trailing input yields no extra part.
pub fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;

    for (i, ch) in s.char_indices() {
        match ch {
            '<' | '[' | '(' => depth += 1,
            '>' | ']' | ')' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    if start < s.len() {
        parts.push(&s[start..]);
    }
    parts
}

/// Remove every balanced `open ... close` group, including nested ones.
pub fn strip_groups(s: &str, open: char, close: char) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for ch in s.chars() {
        if ch == open {
            depth += 1;
        } else if ch == close && depth > 0 {
            depth -= 1;
        } else if depth == 0 {
            out.push(ch);
        }
    }
    out
}

/// Leading base type of a type expression.
///
/// Array brackets, generic arguments and varargs dots are dropped:
/// `List<Foo>` gives `List`, `Shape[]` gives `Shape`, `Point...` gives
/// `Point`.
pub fn base_type(type_expr: &str) -> Option<&str> {
    type_expr
        .split(|c: char| matches!(c, '[' | ']' | '<' | '>' | ',') || c.is_whitespace())
        .find(|token| !token.is_empty())
        .map(|token| token.trim_end_matches('.'))
        .filter(|token| !token.is_empty())
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
