//! Cross-file reference resolution.
//!
//! Resolution runs in two passes over the whole model:
//!
//! 1. **Collect**: every declaration is registered by FQN, and a simple
//!    name → FQN lookup is built. On a simple-name collision the later
//!    declaration wins.
//! 2. **Resolve**: supertypes, implemented capabilities, return types and
//!    parameter types are resolved against, in order, the same package,
//!    single-type imports, wildcard imports and the global lookup. Anything
//!    that does not resolve to a known declaration is dropped.
//!
//! Pass 2 reads shared state only; edges are computed per declaration and
//! merged afterwards, so it can run in parallel.

use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::model::{qualify, EdgeKind, Import, TypeDeclaration, UsageEdge};
use crate::scan::{base_type, TypeFilter};

/// Resolution behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// A single-type import of a type outside the model ends resolution
    /// for that simple name instead of falling back to the global lookup.
    pub explicit_imports_shadow: bool,
    pub parallel: bool,
}

/// Pass-1 state: known declarations and the simple-name lookup.
pub struct CrossReferenceResolver<'a> {
    known: HashSet<String>,
    by_simple_name: HashMap<&'a str, String>,
    filter: &'a TypeFilter,
    options: ResolveOptions,
}

impl<'a> CrossReferenceResolver<'a> {
    /// Pass 1: register every declaration, in order.
    pub fn collect(
        declarations: &'a [TypeDeclaration],
        filter: &'a TypeFilter,
        options: ResolveOptions,
    ) -> Self {
        let mut known = HashSet::new();
        let mut by_simple_name = HashMap::new();
        for decl in declarations {
            let fqn = decl.fqn();
            known.insert(fqn.clone());
            by_simple_name.insert(decl.name.as_str(), fqn);
        }
        Self {
            known,
            by_simple_name,
            filter,
            options,
        }
    }

    /// Resolve a type expression as seen from `context`.
    pub fn resolve(&self, type_expr: &str, context: &TypeDeclaration) -> Option<String> {
        let name = base_type(type_expr)?;
        if self.filter.is_builtin(name) {
            return None;
        }

        // Already qualified.
        if name.contains('.') {
            return self.known.get(name).cloned();
        }

        let same_package = qualify(&context.package, name);
        if self.known.contains(&same_package) {
            return Some(same_package);
        }

        let imports = || context.imports.iter().filter(|i| !i.is_static);

        let mut shadowed = false;
        for import in imports().filter(|i| i.names(name)) {
            if self.known.contains(&import.path) {
                return Some(import.path.clone());
            }
            shadowed = true;
        }

        for package in imports().filter_map(Import::wildcard_package) {
            let candidate = qualify(package, name);
            if self.known.contains(&candidate) {
                return Some(candidate);
            }
        }

        if shadowed && self.options.explicit_imports_shadow {
            return None;
        }
        self.by_simple_name.get(name).cloned()
    }

    /// Edges originating from one declaration, without self edges.
    pub fn edges_for(&self, decl: &TypeDeclaration) -> BTreeSet<UsageEdge> {
        let source = decl.fqn();
        let mut edges = BTreeSet::new();

        let supertypes = decl.supertype.iter().chain(decl.capabilities.iter());
        for supertype in supertypes {
            if let Some(target) = self.resolve(supertype, decl) {
                push_edge(&mut edges, &source, target, EdgeKind::Extends);
            }
        }

        for member in decl.members() {
            for type_expr in member.referenced_types() {
                if let Some(target) = self.resolve(type_expr, decl) {
                    push_edge(&mut edges, &source, target, EdgeKind::Uses);
                }
            }
        }

        edges
    }

    /// Pass 2: resolve every declaration and merge the edges.
    pub fn resolve_all(&self, declarations: &[TypeDeclaration]) -> BTreeSet<UsageEdge> {
        let batches: Vec<BTreeSet<UsageEdge>> = if self.options.parallel {
            declarations.par_iter().map(|d| self.edges_for(d)).collect()
        } else {
            declarations.iter().map(|d| self.edges_for(d)).collect()
        };
        batches.into_iter().flatten().collect()
    }
}

fn push_edge(edges: &mut BTreeSet<UsageEdge>, source: &str, target: String, kind: EdgeKind) {
    if target != source {
        edges.insert(UsageEdge {
            source: source.to_string(),
            target,
            kind,
        });
    }
}

/// Adjacency sets derived from the resolved edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageGraph {
    pub uses: BTreeMap<String, BTreeSet<String>>,
    pub used_by: BTreeMap<String, BTreeSet<String>>,
    pub extended_by: BTreeMap<String, BTreeSet<String>>,
    pub edges: BTreeSet<UsageEdge>,
}

impl UsageGraph {
    /// Record each edge on both endpoints.
    pub fn from_edges(edges: BTreeSet<UsageEdge>) -> Self {
        let mut graph = UsageGraph::default();
        for edge in &edges {
            graph
                .uses
                .entry(edge.source.clone())
                .or_default()
                .insert(edge.target.clone());
            graph
                .used_by
                .entry(edge.target.clone())
                .or_default()
                .insert(edge.source.clone());
            if edge.kind == EdgeKind::Extends {
                graph
                    .extended_by
                    .entry(edge.target.clone())
                    .or_default()
                    .insert(edge.source.clone());
            }
        }
        graph.edges = edges;
        graph
    }

    pub fn uses_of(&self, fqn: &str) -> Vec<String> {
        set_to_vec(self.uses.get(fqn))
    }

    pub fn used_by_of(&self, fqn: &str) -> Vec<String> {
        set_to_vec(self.used_by.get(fqn))
    }

    pub fn extended_by_of(&self, fqn: &str) -> Vec<String> {
        set_to_vec(self.extended_by.get(fqn))
    }
}

fn set_to_vec(set: Option<&BTreeSet<String>>) -> Vec<String> {
    set.map(|s| s.iter().cloned().collect()).unwrap_or_default()
}

/// Run both passes over `declarations`.
pub fn build_graph(
    declarations: &[TypeDeclaration],
    filter: &TypeFilter,
    options: ResolveOptions,
) -> UsageGraph {
    let resolver = CrossReferenceResolver::collect(declarations, filter, options);
    UsageGraph::from_edges(resolver.resolve_all(declarations))
}
