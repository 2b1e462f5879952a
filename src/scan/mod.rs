//! Per-file structural scanning.
//!
//! Each source file is scanned on its own, with no shared mutable state:
//!
//! ```text
//! text ──▶ lexer (CodeView) ──▶ declaration ──▶ signature ──▶ docs ──▶ tagger
//!                                   │               │
//!                                   └── body ◀──────┘
//! ```
//!
//! The result is one [`TypeDeclaration`] per file, or nothing when the file
//! declares no type.

mod body;
mod builtins;
mod declaration;
mod docs;
mod lexer;
mod signature;
mod tagger;
mod typeexpr;

pub use body::BodySpan;
pub use builtins::{TypeFilter, BUILTIN_TYPES, PRIMITIVE_TYPES};
pub use declaration::{extract_imports, extract_package, scan_declaration, DeclarationHeader};
pub use docs::{bind_documentation, DocWindow};
pub use lexer::{classify, code_only, strip_comments, CodeView, SpanKind, TextSpan};
pub use signature::{parse_parameters, scan_constructors, scan_methods, RawMember};
pub use tagger::{fallback_description, Rule, SemanticTagger, TagInput, Tagging, RULES};
pub use typeexpr::{base_type, split_top_level};

use crate::error::ScanError;
use crate::model::{
    Documentation, MemberSignature, SourceFile, TypeDeclaration, CONSTRUCTOR_MARKER,
};

/// Settings shared by every file scan.
#[derive(Debug, Clone, Default)]
pub struct ScanContext {
    pub doc_window: DocWindow,
    pub tagger: SemanticTagger,
}

/// Scan one file into its primary type declaration.
///
/// Returns `Ok(None)` when the file declares no type and an error when the
/// declaration body is missing or never closed.
pub fn scan_source(file: &SourceFile, ctx: &ScanContext) -> Result<Option<TypeDeclaration>, ScanError> {
    let view = CodeView::new(&file.text);
    let Some(header) = scan_declaration(&view) else {
        tracing::debug!(path = %file.path, "no type declaration");
        return Ok(None);
    };

    let open = header
        .open_brace
        .ok_or(ScanError::MissingBody { line: header.line })?;
    if view.find_body(open).is_none() {
        return Err(ScanError::UnterminatedBody {
            line: view.line_of(open),
        });
    }

    let constructors = scan_constructors(&view, &header.name)
        .into_iter()
        .map(|raw| build_member(&view, raw, ctx))
        .collect();
    let methods = scan_methods(&view, &header.name)
        .into_iter()
        .map(|raw| build_member(&view, raw, ctx))
        .collect();

    let declaration = TypeDeclaration {
        documentation: bind_documentation(&file.text, header.offset, &ctx.doc_window),
        name: header.name,
        kind: header.kind,
        package: extract_package(&view),
        file: file.path.clone(),
        line: header.line,
        supertype: header.supertype,
        capabilities: header.capabilities,
        imports: extract_imports(&view),
        constructors,
        methods,
    };

    tracing::debug!(
        path = %file.path,
        fqn = %declaration.fqn(),
        constructors = declaration.constructors.len(),
        methods = declaration.methods.len(),
        "scanned declaration"
    );
    Ok(Some(declaration))
}

/// Attach documentation and tagger output to a raw signature.
fn build_member(view: &CodeView, raw: RawMember, ctx: &ScanContext) -> MemberSignature {
    let text = view.original();
    let documentation: Documentation = bind_documentation(text, raw.offset, &ctx.doc_window);
    let return_type = raw
        .return_type
        .unwrap_or_else(|| CONSTRUCTOR_MARKER.to_string());

    let tagging = ctx.tagger.tag(&TagInput {
        name: &raw.name,
        body: raw.body.content(view.code()),
        return_type: &return_type,
    });
    let description = if return_type == CONSTRUCTOR_MARKER {
        format!("Initializes {}. {}", raw.name, tagging.description)
    } else {
        tagging.description
    };

    MemberSignature {
        body: raw.body.content(text).to_string(),
        name: raw.name,
        visibility: raw.visibility,
        is_static: raw.is_static,
        return_type,
        parameters: raw.parameters,
        line: raw.line,
        documentation,
        description,
        connections: tagging.connections,
    }
}

/// Summary sentence for a declaration: its documentation when present,
/// otherwise a sentence derived from its inheritance.
pub fn summarize(declaration: &TypeDeclaration) -> String {
    if !declaration.documentation.description.is_empty() {
        return declaration.documentation.description.clone();
    }
    if let Some(supertype) = &declaration.supertype {
        return format!("A component that extends {}.", supertype);
    }
    if let Some(capability) = declaration.capabilities.first() {
        return format!("A component that implements {}.", capability);
    }
    format!("Core component {}.", declaration.name)
}
