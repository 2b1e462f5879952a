//! Exportable model: one record per declaration, keyed by FQN.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::{MemberSignature, TypeDeclaration, TypeKind, Visibility};
use crate::resolve::UsageGraph;
use crate::scan::summarize;

/// Marker appended to truncated body excerpts.
pub const TRUNCATION_MARKER: &str = "...";

/// Assembler switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Export a body excerpt per member.
    pub snippets: bool,
    /// Excerpt cap in characters.
    pub snippet_length: usize,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            snippets: false,
            snippet_length: 200,
        }
    }
}

/// The whole model, serialized as a map from FQN to record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Model {
    pub types: BTreeMap<String, TypeRecord>,
}

impl Model {
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, fqn: &str) -> Option<&TypeRecord> {
        self.types.get(fqn)
    }

    pub fn stats(&self) -> ModelStats {
        let mut stats = ModelStats {
            types: self.types.len(),
            ..Default::default()
        };
        for record in self.types.values() {
            stats.constructors += record.constructors.len();
            stats.methods += record.methods.len();
            stats.edges += record.uses.len();
            stats.documented_members += record
                .members()
                .filter(|m| m.is_documented())
                .count();
        }
        stats
    }
}

/// Totals shown in the terminal summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStats {
    pub types: usize,
    pub constructors: usize,
    pub methods: usize,
    pub documented_members: usize,
    /// Distinct source → target pairs.
    pub edges: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRecord {
    pub package: String,
    pub class_name: String,
    pub kind: TypeKind,
    pub file: String,
    pub line: usize,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub imports: Vec<String>,
    pub summary: String,
    pub documentation: String,
    pub constructors: Vec<MemberRecord>,
    pub methods: Vec<MemberRecord>,
    pub uses: Vec<String>,
    pub used_by: Vec<String>,
    pub extended_by: Vec<String>,
}

impl TypeRecord {
    pub fn members(&self) -> impl Iterator<Item = &MemberRecord> {
        self.constructors.iter().chain(self.methods.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub name: String,
    pub line: usize,
    pub visibility: Visibility,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub return_type: String,
    pub parameters: Vec<ParameterRecord>,
    pub signature: String,
    pub description: String,
    pub documentation: String,
    pub returns: String,
    pub connections: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
}

impl MemberRecord {
    pub fn is_documented(&self) -> bool {
        !self.documentation.is_empty()
            || !self.returns.is_empty()
            || self.parameters.iter().any(|p| !p.description.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterRecord {
    #[serde(rename = "type")]
    pub type_name: String,
    pub name: String,
    pub description: String,
}

/// Merge declarations and graph adjacency into the exportable model.
///
/// Declarations must already be deduplicated by FQN.
pub fn assemble(
    declarations: &[TypeDeclaration],
    graph: &UsageGraph,
    options: &AssembleOptions,
) -> Model {
    let types = declarations
        .iter()
        .map(|decl| {
            let fqn = decl.fqn();
            let record = TypeRecord {
                package: decl.package.clone(),
                class_name: decl.name.clone(),
                kind: decl.kind,
                file: decl.file.clone(),
                line: decl.line,
                extends: decl.supertype.clone(),
                implements: decl.capabilities.clone(),
                imports: decl.imports.iter().map(|i| i.path.clone()).collect(),
                summary: summarize(decl),
                documentation: decl.documentation.description.clone(),
                constructors: member_records(&decl.constructors, options),
                methods: member_records(&decl.methods, options),
                uses: graph.uses_of(&fqn),
                used_by: graph.used_by_of(&fqn),
                extended_by: graph.extended_by_of(&fqn),
            };
            (fqn, record)
        })
        .collect();
    Model { types }
}

fn member_records(members: &[MemberSignature], options: &AssembleOptions) -> Vec<MemberRecord> {
    members.iter().map(|m| member_record(m, options)).collect()
}

fn member_record(member: &MemberSignature, options: &AssembleOptions) -> MemberRecord {
    let doc = &member.documentation;
    MemberRecord {
        name: member.name.clone(),
        line: member.line,
        visibility: member.visibility,
        is_static: member.is_static,
        return_type: member.return_type.clone(),
        parameters: member
            .parameters
            .iter()
            .map(|p| ParameterRecord {
                type_name: p.type_name.clone(),
                name: p.name.clone(),
                description: doc.param(&p.name).to_string(),
            })
            .collect(),
        signature: member.signature(),
        description: member.description.clone(),
        documentation: doc.description.clone(),
        returns: doc.returns.clone(),
        connections: member.connections.clone(),
        code_snippet: options
            .snippets
            .then(|| truncate_snippet(&member.body, options.snippet_length)),
    }
}

/// First `limit` characters of `body`, with [`TRUNCATION_MARKER`] appended
/// when anything was cut.
pub fn truncate_snippet(body: &str, limit: usize) -> String {
    match body.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", &body[..cut], TRUNCATION_MARKER),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Documentation, EdgeKind, Import, Parameter, UsageEdge};
    use std::collections::BTreeSet;

    fn shape_decl() -> TypeDeclaration {
        let mut documentation = Documentation::default();
        documentation.params.insert("k".to_string(), "scale factor".to_string());
        documentation.returns = "scaled copy".to_string();

        TypeDeclaration {
            name: "Circle".to_string(),
            kind: TypeKind::Class,
            package: "geo".to_string(),
            file: "geo/Circle.java".to_string(),
            line: 3,
            supertype: Some("Shape".to_string()),
            capabilities: vec!["Drawable".to_string()],
            imports: vec![Import {
                path: "java.util.List".to_string(),
                is_static: false,
            }],
            documentation: Documentation::default(),
            constructors: Vec::new(),
            methods: vec![MemberSignature {
                name: "scale".to_string(),
                visibility: Visibility::Public,
                is_static: false,
                return_type: "Circle".to_string(),
                parameters: vec![Parameter {
                    type_name: "double".to_string(),
                    name: "k".to_string(),
                }],
                line: 10,
                documentation,
                body: "return new Circle(r * k);".to_string(),
                description: "Returns the requested value.".to_string(),
                connections: Vec::new(),
            }],
        }
    }

    fn graph() -> UsageGraph {
        let edges: BTreeSet<_> = [UsageEdge {
            source: "geo.Circle".to_string(),
            target: "geo.Shape".to_string(),
            kind: EdgeKind::Extends,
        }]
        .into_iter()
        .collect();
        UsageGraph::from_edges(edges)
    }

    #[test]
    fn test_assemble_record() {
        let model = assemble(&[shape_decl()], &graph(), &AssembleOptions::default());
        let record = model.get("geo.Circle").unwrap();
        assert_eq!(record.summary, "A component that extends Shape.");
        assert_eq!(record.uses, vec!["geo.Shape"]);
        assert!(record.used_by.is_empty());

        let scale = &record.methods[0];
        assert_eq!(scale.signature, "public Circle scale(double k)");
        assert_eq!(scale.parameters[0].description, "scale factor");
        assert_eq!(scale.returns, "scaled copy");
        assert!(scale.code_snippet.is_none());
    }

    #[test]
    fn test_json_field_names() {
        let model = assemble(&[shape_decl()], &graph(), &AssembleOptions::default());
        let json = serde_json::to_value(&model).unwrap();
        let record = &json["geo.Circle"];
        assert_eq!(record["className"], "Circle");
        assert_eq!(record["kind"], "class");
        assert_eq!(record["extends"], "Shape");
        assert_eq!(record["implements"][0], "Drawable");
        assert!(record["usedBy"].as_array().unwrap().is_empty());
        assert!(record["extendedBy"].is_array());

        let method = &record["methods"][0];
        assert_eq!(method["returnType"], "Circle");
        assert_eq!(method["static"], false);
        assert_eq!(method["visibility"], "public");
        assert_eq!(method["parameters"][0]["type"], "double");
        assert!(method.get("codeSnippet").is_none());
    }

    #[test]
    fn test_snippets() {
        let options = AssembleOptions {
            snippets: true,
            snippet_length: 10,
        };
        let model = assemble(&[shape_decl()], &graph(), &options);
        let snippet = model.get("geo.Circle").unwrap().methods[0]
            .code_snippet
            .clone()
            .unwrap();
        assert_eq!(snippet, "return new...");
    }

    #[test]
    fn test_truncate_snippet() {
        assert_eq!(truncate_snippet("short", 200), "short");
        assert_eq!(truncate_snippet("abcdef", 6), "abcdef");
        assert_eq!(truncate_snippet("abcdefg", 6), "abcdef...");
        // Cut on a char boundary, never inside a multi-byte character.
        assert_eq!(truncate_snippet("ééé", 2), "éé...");
    }

    #[test]
    fn test_stats() {
        let model = assemble(&[shape_decl()], &graph(), &AssembleOptions::default());
        let stats = model.stats();
        assert_eq!(stats.types, 1);
        assert_eq!(stats.methods, 1);
        assert_eq!(stats.constructors, 0);
        assert_eq!(stats.edges, 1);
        assert_eq!(stats.documented_members, 1);
    }
}
