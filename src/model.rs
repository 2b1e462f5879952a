//! Core types for the structural model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Package name used for files without a `package` statement.
pub const DEFAULT_PACKAGE: &str = "default";

/// Return-type marker carried by constructors.
pub const CONSTRUCTOR_MARKER: &str = "constructor";

/// One input file: a path and its full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// An `import` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Dotted path as written, including a trailing `.*` for wildcards.
    pub path: String,
    pub is_static: bool,
}

impl Import {
    pub fn is_wildcard(&self) -> bool {
        self.path.ends_with(".*")
    }

    /// Package brought into scope by a wildcard import.
    pub fn wildcard_package(&self) -> Option<&str> {
        self.path.strip_suffix(".*")
    }

    /// Whether this is a single-type import of `simple_name`.
    pub fn names(&self, simple_name: &str) -> bool {
        !self.is_wildcard()
            && self
                .path
                .rsplit_once('.')
                .map(|(_, last)| last == simple_name)
                .unwrap_or(false)
    }
}

/// Kind of type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Record => "record",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "class" => Some(TypeKind::Class),
            "interface" => Some(TypeKind::Interface),
            "enum" => Some(TypeKind::Enum),
            "record" => Some(TypeKind::Record),
            _ => None,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    #[serde(rename = "public")]
    Public,
    #[serde(rename = "protected")]
    Protected,
    #[serde(rename = "private")]
    Private,
    #[serde(rename = "package-private")]
    PackagePrivate,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
            Visibility::PackagePrivate => "package-private",
        }
    }

    /// Parse an explicit modifier; a missing modifier means package-private.
    pub fn from_modifier(modifier: Option<&str>) -> Self {
        match modifier {
            Some("public") => Visibility::Public,
            Some("protected") => Visibility::Protected,
            Some("private") => Visibility::Private,
            _ => Visibility::PackagePrivate,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A `(type, name)` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub type_name: String,
    pub name: String,
}

/// Documentation block bound to a declaration or member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Documentation {
    pub description: String,
    pub params: BTreeMap<String, String>,
    pub returns: String,
}

impl Documentation {
    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.params.is_empty() && self.returns.is_empty()
    }

    pub fn param(&self, name: &str) -> &str {
        self.params.get(name).map(String::as_str).unwrap_or("")
    }
}

/// A method or constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSignature {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    /// `CONSTRUCTOR_MARKER` for constructors.
    pub return_type: String,
    pub parameters: Vec<Parameter>,
    /// 1-indexed source line.
    pub line: usize,
    pub documentation: Documentation,
    /// Body content with the outer braces stripped.
    pub body: String,
    /// Inferred by the semantic tagger.
    pub description: String,
    pub connections: Vec<String>,
}

impl MemberSignature {
    pub fn is_constructor(&self) -> bool {
        self.return_type == CONSTRUCTOR_MARKER
    }

    /// Human-readable signature, e.g. `public static int add(int a, int b)`.
    pub fn signature(&self) -> String {
        let params = self
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.type_name, p.name))
            .collect::<Vec<_>>()
            .join(", ");

        if self.is_constructor() {
            return format!("{} {}({})", self.visibility, self.name, params);
        }

        let mut parts = vec![self.visibility.as_str()];
        if self.is_static {
            parts.push("static");
        }
        parts.push(&self.return_type);
        parts.push(&self.name);
        format!("{}({})", parts.join(" "), params)
    }

    /// Type expressions this member refers to (return type and parameter types).
    pub fn referenced_types(&self) -> impl Iterator<Item = &str> {
        let ret = (!self.is_constructor()).then_some(self.return_type.as_str());
        ret.into_iter()
            .chain(self.parameters.iter().map(|p| p.type_name.as_str()))
    }
}

/// One class, interface, enum or record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    pub name: String,
    pub kind: TypeKind,
    pub package: String,
    /// Path of the owning source file.
    pub file: String,
    pub line: usize,
    pub supertype: Option<String>,
    pub capabilities: Vec<String>,
    pub imports: Vec<Import>,
    pub documentation: Documentation,
    pub constructors: Vec<MemberSignature>,
    pub methods: Vec<MemberSignature>,
}

impl TypeDeclaration {
    /// Fully-qualified name: package plus simple name.
    pub fn fqn(&self) -> String {
        qualify(&self.package, &self.name)
    }

    pub fn members(&self) -> impl Iterator<Item = &MemberSignature> {
        self.constructors.iter().chain(self.methods.iter())
    }
}

/// Join a package and a simple name.
pub fn qualify(package: &str, name: &str) -> String {
    format!("{}.{}", package, name)
}

/// Kind of usage edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Extends,
    Uses,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Extends => write!(f, "extends"),
            EdgeKind::Uses => write!(f, "uses"),
        }
    }
}

/// Directed relationship between two declarations, keyed by FQN.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UsageEdge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, return_type: &str, is_static: bool) -> MemberSignature {
        MemberSignature {
            name: name.to_string(),
            visibility: Visibility::Public,
            is_static,
            return_type: return_type.to_string(),
            parameters: vec![
                Parameter {
                    type_name: "int".to_string(),
                    name: "a".to_string(),
                },
                Parameter {
                    type_name: "List<String>".to_string(),
                    name: "names".to_string(),
                },
            ],
            line: 1,
            documentation: Documentation::default(),
            body: String::new(),
            description: String::new(),
            connections: Vec::new(),
        }
    }

    #[test]
    fn test_signature_strings() {
        assert_eq!(
            member("add", "int", true).signature(),
            "public static int add(int a, List<String> names)"
        );
        assert_eq!(
            member("Point", CONSTRUCTOR_MARKER, false).signature(),
            "public Point(int a, List<String> names)"
        );
    }

    #[test]
    fn test_referenced_types_skip_constructor_marker() {
        let ctor = member("Point", CONSTRUCTOR_MARKER, false);
        let refs: Vec<_> = ctor.referenced_types().collect();
        assert_eq!(refs, vec!["int", "List<String>"]);

        let method = member("add", "Shape", false);
        let refs: Vec<_> = method.referenced_types().collect();
        assert_eq!(refs, vec!["Shape", "int", "List<String>"]);
    }

    #[test]
    fn test_import_matching() {
        let single = Import {
            path: "cad.core.Sketch".to_string(),
            is_static: false,
        };
        assert!(single.names("Sketch"));
        assert!(!single.names("Ketch"));
        assert!(!single.is_wildcard());

        let wildcard = Import {
            path: "cad.core.*".to_string(),
            is_static: false,
        };
        assert!(wildcard.is_wildcard());
        assert_eq!(wildcard.wildcard_package(), Some("cad.core"));
        assert!(!wildcard.names("*"));
    }

    #[test]
    fn test_visibility_default() {
        assert_eq!(Visibility::from_modifier(None), Visibility::PackagePrivate);
        assert_eq!(Visibility::from_modifier(Some("private")), Visibility::Private);
        assert_eq!(Visibility::PackagePrivate.to_string(), "package-private");
    }
}
