//! classmap - structural source analyzer.
//!
//! classmap scans a tree of object-oriented sources (Java) and builds a
//! model of the codebase: type declarations, their documentation, member
//! signatures, heuristically inferred member behavior, and a bidirectional
//! usage graph between types.
//!
//! # Architecture
//!
//! - `scan`: per-file scanning on comment- and string-masked text
//! - `resolve`: two-pass cross-file type resolution and the usage graph
//! - `assemble`: exportable per-type records
//! - `analyzer`: batch orchestration with non-fatal per-file warnings
//! - `source`: directory traversal and decoding
//! - `config`: YAML configuration
//! - `report`: output formatting (JSON, pretty)
//!
//! ```no_run
//! use classmap::{Analyzer, SourceFile};
//!
//! let files = vec![SourceFile::new("p/A.java", "package p;\nclass A {\n}\n")];
//! let analysis = Analyzer::default().analyze(&files);
//! assert!(analysis.model.get("p.A").is_some());
//! ```

pub mod analyzer;
pub mod assemble;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod resolve;
pub mod scan;
pub mod source;

pub use analyzer::{Analysis, Analyzer};
pub use assemble::{assemble, MemberRecord, Model, ModelStats, TypeRecord};
pub use config::Config;
pub use error::{ScanError, ScanWarning};
pub use model::{
    EdgeKind, MemberSignature, SourceFile, TypeDeclaration, TypeKind, UsageEdge, Visibility,
};
pub use resolve::{build_graph, CrossReferenceResolver, UsageGraph};
pub use source::{LoadedSources, SourceLoader};
