//! Heuristic behavior tagging of member bodies.
//!
//! An ordered table of rules is applied to each body. Every rule that
//! matches contributes a sentence to the description; rules never exclude
//! each other. When nothing matches, the member name decides the wording.
//! Tagging never fails: the worst case is the generic fallback with no
//! collaborators.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

use super::builtins::TypeFilter;
use crate::model::CONSTRUCTOR_MARKER;

lazy_static! {
    static ref CONSOLE_RE: Regex =
        Regex::new(r"\bSystem\s*\.\s*(?:out|err)\s*\.\s*print(?:ln|f)?\s*\(").unwrap();
    static ref DISPATCH_RE: Regex =
        Regex::new(r"\b(?:\w*[Cc]ommand[Mm]anager|cmdMgr)\s*\.\s*execute\s*\(").unwrap();
    static ref RETURN_RE: Regex = Regex::new(r"\breturn\b").unwrap();
    static ref COMPUTATION_RE: Regex = Regex::new(r"calculated|\bMath\s*\.").unwrap();
    static ref FIELD_ASSIGN_RE: Regex =
        Regex::new(r"\bthis\s*\.\s*\w+\s*(?:[-+*/%&|^]|<<|>>>?)?=(?:[^=]|$)").unwrap();
    static ref CAPITALIZED_RE: Regex = Regex::new(r"\b([A-Z]\w+)\b").unwrap();
}

/// What the tagger looks at for one member.
#[derive(Debug, Clone, Copy)]
pub struct TagInput<'a> {
    pub name: &'a str,
    /// Code-only body text (comments and literals blanked).
    pub body: &'a str,
    /// Return type, or [`CONSTRUCTOR_MARKER`].
    pub return_type: &'a str,
}

impl TagInput<'_> {
    fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }

    fn returns_value(&self) -> bool {
        self.return_type != "void"
            && self.return_type != CONSTRUCTOR_MARKER
            && RETURN_RE.is_match(self.body)
    }
}

/// One predicate → effect pair.
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&TagInput) -> bool,
    pub fragment: &'static str,
    pub collaborator: Option<&'static str>,
}

/// Rules in application order.
pub static RULES: &[Rule] = &[
    Rule {
        name: "logs_status",
        applies: |t| CONSOLE_RE.is_match(t.body),
        fragment: "Logs status to console.",
        collaborator: None,
    },
    Rule {
        name: "dispatches_command",
        applies: |t| DISPATCH_RE.is_match(t.body),
        fragment: "Dispatches a command for execution.",
        collaborator: Some("CommandManager"),
    },
    Rule {
        name: "notifies_listeners",
        applies: |t| t.name_contains("notify") || t.name_contains("fire"),
        fragment: "Notifies registered listeners.",
        collaborator: None,
    },
    Rule {
        name: "computes_result",
        applies: |t| t.returns_value() && COMPUTATION_RE.is_match(t.body),
        fragment: "Computes and returns the result.",
        collaborator: None,
    },
    Rule {
        name: "returns_value",
        applies: |t| t.returns_value() && !COMPUTATION_RE.is_match(t.body),
        fragment: "Returns the requested value.",
        collaborator: None,
    },
    Rule {
        name: "updates_state",
        applies: |t| FIELD_ASSIGN_RE.is_match(t.body),
        fragment: "Updates internal state properties.",
        collaborator: None,
    },
    Rule {
        name: "adds_to_collection",
        applies: |t| t.name_contains("add") && t.body.to_lowercase().contains("list"),
        fragment: "Adds item to internal collection.",
        collaborator: None,
    },
    Rule {
        name: "removes_from_collection",
        applies: |t| t.name_contains("remove"),
        fragment: "Removes item from collection.",
        collaborator: None,
    },
];

/// Tagger output for one member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tagging {
    pub description: String,
    /// Sorted, deduplicated collaborator names.
    pub connections: Vec<String>,
    /// Names of the rules that fired, in order.
    pub matched: Vec<&'static str>,
}

/// Applies [`RULES`] and collects collaborator references.
#[derive(Debug, Clone, Default)]
pub struct SemanticTagger {
    filter: TypeFilter,
}

impl SemanticTagger {
    pub fn new(filter: TypeFilter) -> Self {
        Self { filter }
    }

    pub fn tag(&self, input: &TagInput) -> Tagging {
        let mut fragments = Vec::new();
        let mut matched = Vec::new();
        let mut connections = BTreeSet::new();

        for rule in RULES {
            if (rule.applies)(input) {
                fragments.push(rule.fragment.to_string());
                matched.push(rule.name);
                if let Some(collaborator) = rule.collaborator {
                    connections.insert(collaborator.to_string());
                }
            }
        }

        if fragments.is_empty() {
            fragments.push(fallback_description(input.name));
        }

        for caps in CAPITALIZED_RE.captures_iter(input.body) {
            let token = &caps[1];
            if token != input.name && !self.filter.is_builtin(token) {
                connections.insert(token.to_string());
            }
        }

        Tagging {
            description: fragments.join(" "),
            connections: connections.into_iter().collect(),
            matched,
        }
    }
}

/// Name-prefix wording used when no rule fires.
pub fn fallback_description(name: &str) -> String {
    if let Some(rest) = camel_suffix(name, "get") {
        format!("Retrieves {}.", rest)
    } else if let Some(rest) = camel_suffix(name, "set") {
        format!("Sets {}.", rest)
    } else if let Some(rest) = camel_suffix(name, "is") {
        format!("Checks if {}.", rest)
    } else {
        "Executes custom logic.".to_string()
    }
}

/// `getName` with prefix `get` gives `Name`; `getter` gives nothing.
fn camel_suffix<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = name.strip_prefix(prefix)?;
    rest.chars()
        .next()
        .filter(|c| c.is_uppercase() || c == &'_')
        .map(|_| rest)
}
