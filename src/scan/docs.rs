//! Binding of documentation blocks to the declaration that follows them.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::Documentation;

lazy_static! {
    static ref PARAM_TAG_RE: Regex = Regex::new(r"^@param\s+(\S+)\s+(.+)$").unwrap();
    static ref RETURN_TAG_RE: Regex = Regex::new(r"^@returns?\b\s*(.*)$").unwrap();
    static ref INLINE_TAG_RE: Regex =
        Regex::new(r"\{@(?:code|link|linkplain|literal|value)\s+([^}]*)\}").unwrap();
}

const BLOCK_OPEN: &str = "/*";
const DOC_OPEN: &str = "/**";
const DOC_CLOSE: &str = "*/";

/// How far back the binder looks for a documentation block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocWindow {
    /// Maximum number of preceding lines examined.
    pub max_lines: usize,
    /// More consecutive blank lines than this end the window.
    pub max_blank_lines: usize,
}

impl Default for DocWindow {
    fn default() -> Self {
        Self {
            max_lines: 10,
            max_blank_lines: 2,
        }
    }
}

/// Bind the documentation block preceding the line that contains `offset`.
///
/// Returns an empty [`Documentation`] when no block is close enough.
pub fn bind_documentation(text: &str, offset: usize, window: &DocWindow) -> Documentation {
    let Some(retained) = retained_window(text, offset, window) else {
        return Documentation::default();
    };

    let Some(close) = retained.rfind(DOC_CLOSE) else {
        return Documentation::default();
    };
    // The nearest block must itself be a documentation block.
    let Some(open) = retained[..close].rfind(BLOCK_OPEN) else {
        return Documentation::default();
    };
    if !retained[open..].starts_with(DOC_OPEN) || open + DOC_OPEN.len() > close {
        return Documentation::default();
    }

    let content = &retained[open + DOC_OPEN.len()..close];
    if content.contains(DOC_CLOSE) {
        return Documentation::default();
    }
    parse_block(content)
}

/// Lines immediately above the signature line, cut at the previous
/// statement boundary or at a run of blank lines.
fn retained_window(text: &str, offset: usize, window: &DocWindow) -> Option<String> {
    let before = &text[..offset.min(text.len())];
    // Everything after the last line break belongs to the signature line.
    let (before, _) = before.rsplit_once('\n')?;

    let mut kept = Vec::new();
    let mut blank_run = 0;
    for line in before.split('\n').rev().take(window.max_lines) {
        let stripped = line.trim();

        if is_statement_boundary(stripped) {
            break;
        }

        if stripped.is_empty() {
            blank_run += 1;
            if blank_run > window.max_blank_lines {
                break;
            }
        } else {
            blank_run = 0;
        }

        kept.push(line);
    }

    kept.reverse();
    Some(kept.join("\n"))
}

/// A code line ending in `}` or `;` closes the previous statement.
/// Comment lines never do.
fn is_statement_boundary(stripped: &str) -> bool {
    let is_comment = stripped.starts_with('*')
        || stripped.starts_with("/*")
        || stripped.starts_with("//");
    !is_comment && (stripped.ends_with('}') || stripped.ends_with(';'))
}

/// Parse the text between `/**` and `*/`.
fn parse_block(content: &str) -> Documentation {
    let mut doc = Documentation::default();
    let mut description = Vec::new();

    for raw in content.lines() {
        let line = raw.trim_start();
        let line = line.strip_prefix('*').unwrap_or(line).trim();
        if line.is_empty() {
            continue;
        }
        let line = INLINE_TAG_RE.replace_all(line, "$1");

        if line.starts_with("@param") {
            if let Some(caps) = PARAM_TAG_RE.captures(&line) {
                doc.params
                    .insert(caps[1].to_string(), caps[2].trim().to_string());
            }
        } else if line.starts_with("@return") {
            if let Some(caps) = RETURN_TAG_RE.captures(&line) {
                doc.returns = caps[1].trim().to_string();
            }
        } else if !line.starts_with('@') {
            description.push(line.into_owned());
        }
    }

    doc.description = description.join(" ").trim().to_string();
    doc
}
