//! Method and constructor signature scanning.

use lazy_static::lazy_static;
use regex::Regex;

use super::body::BodySpan;
use super::builtins::{CONTROL_KEYWORDS, MODIFIER_KEYWORDS, STATEMENT_KEYWORDS, VISIBILITY_KEYWORDS};
use super::lexer::CodeView;
use super::typeexpr::{collapse_whitespace, split_top_level};
use crate::model::{Parameter, Visibility};

/// Annotations allowed on the signature line itself.
const ANNOTATIONS: &str = r"(?:@\w+(?:\([^)\n]*\))?[ \t]+)*";
/// Parameter list with one level of nested parentheses (annotation args).
const PARAMS: &str = r"\(((?:[^()]|\([^()]*\))*)\)";
const THROWS: &str = r"\s*(?:throws\s+[\w\s,.<>]+?)?\s*\{";

lazy_static! {
    static ref METHOD_RE: Regex = Regex::new(&format!(
        r"(?m)^[ \t]*{ANNOTATIONS}(?:(public|protected|private)[ \t]+)?((?:(?:static|final|synchronized|abstract|default|native|strictfp)[ \t]+)*)([\w<>\[\],.? \t]+?)[ \t]+(\w+)\s*{PARAMS}{THROWS}"
    ))
    .unwrap();

    static ref PARAM_ANNOTATION_RE: Regex = Regex::new(r"^@[\w.]+(?:\([^)]*\))?\s*").unwrap();
}

/// A signature with a usable body, before documentation and tagging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMember {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    /// `None` for constructors.
    pub return_type: Option<String>,
    pub parameters: Vec<Parameter>,
    /// Byte offset of the start of the signature line.
    pub offset: usize,
    pub line: usize,
    pub body: BodySpan,
}

/// Find all methods of the type named `type_name`.
///
/// Matches whose name equals `type_name` are left to [`scan_constructors`].
/// Signatures without a closed body are dropped.
pub fn scan_methods(view: &CodeView, type_name: &str) -> Vec<RawMember> {
    let mut members = Vec::new();

    for caps in METHOD_RE.captures_iter(view.code()) {
        let (Some(whole), Some(ret), Some(name)) = (caps.get(0), caps.get(3), caps.get(4)) else {
            continue;
        };
        let name = name.as_str();
        let return_type = collapse_whitespace(ret.as_str());

        if name == type_name || !is_plausible_method(name, &return_type) {
            continue;
        }

        let Some(body) = view.find_body(whole.end() - 1) else {
            tracing::debug!(method = name, "dropping signature without a closed body");
            continue;
        };

        let modifiers = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        members.push(RawMember {
            name: name.to_string(),
            visibility: Visibility::from_modifier(caps.get(1).map(|m| m.as_str())),
            is_static: modifiers.split_whitespace().any(|m| m == "static"),
            return_type: Some(return_type),
            parameters: caps.get(5).map(|m| parse_parameters(m.as_str())).unwrap_or_default(),
            offset: whole.start(),
            line: signature_line(view, whole.start()),
            body,
        });
    }

    members
}

/// Find all constructors of the type named `type_name`.
pub fn scan_constructors(view: &CodeView, type_name: &str) -> Vec<RawMember> {
    let pattern = format!(
        r"(?m)^[ \t]*{ANNOTATIONS}(?:(public|protected|private)[ \t]+)?{}\s*{PARAMS}{THROWS}",
        regex::escape(type_name)
    );
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!(type_name, error = %e, "cannot build constructor pattern");
            return Vec::new();
        }
    };

    re.captures_iter(view.code())
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let body = view.find_body(whole.end() - 1)?;
            Some(RawMember {
                name: type_name.to_string(),
                visibility: Visibility::from_modifier(caps.get(1).map(|m| m.as_str())),
                is_static: false,
                return_type: None,
                parameters: caps.get(2).map(|m| parse_parameters(m.as_str())).unwrap_or_default(),
                offset: whole.start(),
                line: signature_line(view, whole.start()),
                body,
            })
        })
        .collect()
}

/// Reject captures that are statements or mis-parsed headers rather than
/// method signatures.
fn is_plausible_method(name: &str, return_type: &str) -> bool {
    if CONTROL_KEYWORDS.contains(name) {
        return false;
    }
    if return_type.is_empty() || return_type == name {
        return false;
    }
    if VISIBILITY_KEYWORDS.contains(return_type) || MODIFIER_KEYWORDS.contains(return_type) {
        return false;
    }
    if return_type.contains(|c| matches!(c, '{' | '}' | ';' | '*' | '/')) {
        return false;
    }
    let first_word = return_type.split_whitespace().next().unwrap_or("");
    !STATEMENT_KEYWORDS.contains(first_word)
}

/// Line of the first non-blank character at or after `offset`.
fn signature_line(view: &CodeView, offset: usize) -> usize {
    let rest = &view.code()[offset..];
    view.line_of(offset + rest.len() - rest.trim_start().len())
}

/// Split a raw parameter list into `(type, name)` pairs.
///
/// Commas inside generic or array brackets do not split. Each parameter is
/// divided at its last space, so multi-token types survive. Annotations
/// and `final` are dropped.
pub fn parse_parameters(raw: &str) -> Vec<Parameter> {
    split_top_level(raw, ',')
        .into_iter()
        .filter_map(|part| {
            let mut param = collapse_whitespace(part);
            loop {
                let stripped = PARAM_ANNOTATION_RE.replace(&param, "").into_owned();
                let stripped = stripped.strip_prefix("final ").unwrap_or(&stripped).to_string();
                if stripped == param {
                    break;
                }
                param = stripped;
            }

            let (type_name, name) = param.rsplit_once(' ')?;
            let type_name = type_name.trim();
            if type_name.is_empty() || name.is_empty() {
                return None;
            }
            Some(Parameter {
                type_name: type_name.to_string(),
                name: name.to_string(),
            })
        })
        .collect()
}
