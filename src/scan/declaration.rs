//! Type declaration, package and import scanning.

use lazy_static::lazy_static;
use regex::Regex;

use super::lexer::CodeView;
use super::typeexpr::{base_type, collapse_whitespace, split_top_level, strip_groups};
use crate::model::{Import, TypeKind, DEFAULT_PACKAGE};

lazy_static! {
    /// Line-anchored declaration header. Annotations and modifiers may
    /// precede the keyword on the same line.
    static ref DECLARATION_RE: Regex = Regex::new(
        r"(?m)^[ \t]*(?:@\w+(?:\([^)\n]*\))?[ \t]+)*(?:(?:public|protected|private|abstract|static|final|sealed|non-sealed|strictfp)[ \t]+)*(class|interface|enum|record)[ \t]+(\w+)"
    ).unwrap();

    static ref PACKAGE_RE: Regex = Regex::new(r"(?m)^[ \t]*package\s+([\w.]+)\s*;").unwrap();

    static ref IMPORT_RE: Regex =
        Regex::new(r"(?m)^[ \t]*import\s+(static\s+)?([\w.]+(?:\.\*)?)\s*;").unwrap();

    static ref EXTENDS_RE: Regex =
        Regex::new(r"(?s)\bextends\s+(.+?)(?:\bimplements\b|\bpermits\b|$)").unwrap();

    static ref IMPLEMENTS_RE: Regex =
        Regex::new(r"(?s)\bimplements\s+(.+?)(?:\bpermits\b|$)").unwrap();
}

/// Header of the primary type declaration in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationHeader {
    pub kind: TypeKind,
    pub name: String,
    pub supertype: Option<String>,
    pub capabilities: Vec<String>,
    /// Byte offset of the start of the declaration line.
    pub offset: usize,
    pub line: usize,
    /// Offset of the `{` opening the declaration body, if any.
    pub open_brace: Option<usize>,
}

/// Find the first type declaration in the file.
///
/// Only the first match is returned; further top-level or nested types are
/// not modeled separately.
pub fn scan_declaration(view: &CodeView) -> Option<DeclarationHeader> {
    let code = view.code();
    let caps = DECLARATION_RE.captures(code)?;
    let whole = caps.get(0)?;
    let kind = TypeKind::parse(caps.get(1)?.as_str())?;
    let name = caps.get(2)?.as_str().to_string();

    let tail_end = code[whole.end()..]
        .find(|c| c == '{' || c == ';')
        .map(|p| whole.end() + p);
    let open_brace = tail_end.filter(|&p| code.as_bytes()[p] == b'{');
    let tail = &code[whole.end()..tail_end.unwrap_or(code.len())];
    let (supertype, capabilities) = parse_inheritance(kind, tail);

    let offset = whole.start();
    Some(DeclarationHeader {
        kind,
        name,
        supertype,
        capabilities,
        offset,
        line: view.line_of(offset + leading_whitespace(&code[offset..])),
        open_brace,
    })
}

/// Split the text between a type name and its body into supertype and
/// implemented capabilities.
fn parse_inheritance(kind: TypeKind, tail: &str) -> (Option<String>, Vec<String>) {
    let tail = strip_groups(&strip_groups(tail, '<', '>'), '(', ')');

    let mut extended = EXTENDS_RE
        .captures(&tail)
        .and_then(|c| c.get(1))
        .map(|m| type_list(m.as_str()))
        .unwrap_or_default();
    let mut capabilities = IMPLEMENTS_RE
        .captures(&tail)
        .and_then(|c| c.get(1))
        .map(|m| type_list(m.as_str()))
        .unwrap_or_default();

    let supertype = if extended.is_empty() {
        None
    } else {
        Some(extended.remove(0))
    };
    // Interfaces may extend several interfaces; the rest are capabilities.
    if kind == TypeKind::Interface {
        capabilities.extend(extended);
    }

    (supertype, capabilities)
}

fn type_list(s: &str) -> Vec<String> {
    split_top_level(s, ',')
        .into_iter()
        .filter_map(|part| base_type(part.trim()).map(str::to_string))
        .collect()
}

fn leading_whitespace(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

/// Declared package, or `"default"` when there is none.
pub fn extract_package(view: &CodeView) -> String {
    PACKAGE_RE
        .captures(view.code())
        .and_then(|c| c.get(1))
        .map(|m| collapse_whitespace(m.as_str()))
        .unwrap_or_else(|| DEFAULT_PACKAGE.to_string())
}

/// All import statements in source order.
pub fn extract_imports(view: &CodeView) -> Vec<Import> {
    IMPORT_RE
        .captures_iter(view.code())
        .filter_map(|c| {
            Some(Import {
                path: c.get(2)?.as_str().to_string(),
                is_static: c.get(1).is_some(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(text: &str) -> Option<DeclarationHeader> {
        scan_declaration(&CodeView::new(text))
    }

    #[test]
    fn test_class_with_inheritance() {
        let text = "package cad.core;\n\nimport java.util.List;\n\n/** A line. */\npublic final class Line extends Entity implements Drawable, Comparable<Line> {\n}\n";
        let h = header(text).unwrap();
        assert_eq!(h.kind, TypeKind::Class);
        assert_eq!(h.name, "Line");
        assert_eq!(h.supertype.as_deref(), Some("Entity"));
        assert_eq!(h.capabilities, vec!["Drawable", "Comparable"]);
        assert_eq!(h.line, 6);
        assert_eq!(h.open_brace, text.find('{'));
    }

    #[test]
    fn test_generic_class_and_multiline_header() {
        let text = "public abstract class Box<T extends Shape>\n        extends Container<T>\n        implements Iterable<T> {\n}";
        let h = header(text).unwrap();
        assert_eq!(h.name, "Box");
        assert_eq!(h.supertype.as_deref(), Some("Container"));
        assert_eq!(h.capabilities, vec!["Iterable"]);
    }

    #[test]
    fn test_interface_extends_many() {
        let h = header("public interface Shape extends Drawable, Serializable {}").unwrap();
        assert_eq!(h.kind, TypeKind::Interface);
        assert_eq!(h.supertype.as_deref(), Some("Drawable"));
        assert_eq!(h.capabilities, vec!["Serializable"]);
    }

    #[test]
    fn test_record_components_skipped() {
        let h = header("public record Point(double x, double y) implements Shape {}").unwrap();
        assert_eq!(h.kind, TypeKind::Record);
        assert_eq!(h.name, "Point");
        assert_eq!(h.supertype, None);
        assert_eq!(h.capabilities, vec!["Shape"]);
    }

    #[test]
    fn test_first_declaration_only() {
        let h = header("class First {}\nclass Second extends First {}").unwrap();
        assert_eq!(h.name, "First");
        assert_eq!(h.supertype, None);
    }

    #[test]
    fn test_keywords_in_comments_and_strings_ignored() {
        let text = "// class Fake {}\nString s = \"class Nope\";\n@Deprecated enum Mode { A, B }";
        let h = header(text).unwrap();
        assert_eq!(h.kind, TypeKind::Enum);
        assert_eq!(h.name, "Mode");
        assert_eq!(h.line, 3);
    }

    #[test]
    fn test_no_declaration() {
        assert_eq!(header("package a;\nimport b.C;\n"), None);
    }

    #[test]
    fn test_package_and_imports() {
        let text = "package cad.gui;\nimport cad.core.Sketch;\nimport cad.geometry.*;\nimport static java.lang.Math.max;\n// import fake.Thing;\nclass A {}";
        let view = CodeView::new(text);
        assert_eq!(extract_package(&view), "cad.gui");

        let imports = extract_imports(&view);
        let paths: Vec<_> = imports.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["cad.core.Sketch", "cad.geometry.*", "java.lang.Math.max"]);
        assert!(imports[2].is_static);
        assert!(!imports[0].is_static);
    }

    #[test]
    fn test_default_package() {
        assert_eq!(extract_package(&CodeView::new("class A {}")), DEFAULT_PACKAGE);
    }
}
