//! Fixed name tables: keywords, primitives and built-in library types.

use phf::phf_set;
use std::collections::HashSet;

/// Keywords that look like a method name to the signature pattern.
pub static CONTROL_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "if", "else", "for", "while", "switch", "case", "try", "catch",
    "finally", "do", "synchronized", "return", "new", "throw",
};

/// Words that can never start a return type.
pub static STATEMENT_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "return", "new", "throw", "else", "case", "assert", "yield",
};

pub static VISIBILITY_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "public", "protected", "private",
};

pub static MODIFIER_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "static", "final", "abstract", "synchronized", "default", "native",
    "strictfp", "transient", "volatile",
};

pub static PRIMITIVE_TYPES: phf::Set<&'static str> = phf_set! {
    "void", "boolean", "byte", "char", "short", "int", "long", "float",
    "double", "var",
};

/// Library types that never count as collaborators or usage targets.
pub static BUILTIN_TYPES: phf::Set<&'static str> = phf_set! {
    "String", "Math", "System", "List", "ArrayList", "Float", "Integer",
    "Object", "Exception", "Override", "Deprecated", "Double", "Long",
    "Short", "Byte", "Boolean", "Character", "Number", "Void", "Map",
    "HashMap", "LinkedHashMap", "TreeMap", "Set", "HashSet", "LinkedHashSet",
    "TreeSet", "Collection", "Collections", "Arrays", "Objects", "Optional",
    "Iterator", "Iterable", "LinkedList", "Deque", "ArrayDeque", "Queue",
    "StringBuilder", "StringBuffer", "CharSequence", "Thread", "Runnable",
    "Class", "Enum", "Record", "Comparable", "Comparator", "Throwable",
    "Error", "RuntimeException", "IllegalArgumentException",
    "IllegalStateException", "NullPointerException",
    "UnsupportedOperationException", "IndexOutOfBoundsException",
    "IOException", "InterruptedException", "SuppressWarnings",
    "FunctionalInterface", "SafeVarargs", "Stream", "Collectors",
};

/// Built-in name filter, extendable from configuration.
#[derive(Debug, Clone, Default)]
pub struct TypeFilter {
    extra: HashSet<String>,
}

impl TypeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extra: extra.into_iter().map(Into::into).collect(),
        }
    }

    /// Primitive, built-in library type, or a configured extra name.
    pub fn is_builtin(&self, name: &str) -> bool {
        PRIMITIVE_TYPES.contains(name)
            || BUILTIN_TYPES.contains(name)
            || self.extra.contains(name)
    }
}
