//! Batch orchestration: scan every file, resolve, assemble.

use rayon::prelude::*;
use std::collections::HashMap;

use crate::assemble::{assemble, AssembleOptions, Model};
use crate::config::Config;
use crate::error::{ScanError, ScanWarning};
use crate::model::{SourceFile, TypeDeclaration};
use crate::resolve::{build_graph, ResolveOptions};
use crate::scan::{scan_source, ScanContext, SemanticTagger, TypeFilter};

/// Result of one batch.
#[derive(Debug, Default)]
pub struct Analysis {
    pub model: Model,
    /// Files that were skipped or replaced, in input order.
    pub warnings: Vec<ScanWarning>,
    pub files_scanned: usize,
}

/// Runs the full pipeline over an ordered set of source files.
pub struct Analyzer {
    scan: ScanContext,
    filter: TypeFilter,
    resolve: ResolveOptions,
    assemble: AssembleOptions,
    parallel: bool,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Analyzer {
    pub fn from_config(config: &Config) -> Self {
        let filter = config.type_filter();
        Self {
            scan: ScanContext {
                doc_window: config.doc_window(),
                tagger: SemanticTagger::new(filter.clone()),
            },
            filter,
            resolve: config.resolve_options(),
            assemble: config.assemble_options(),
            parallel: config.parallel,
        }
    }

    /// Enable or disable parallel scanning and resolution.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self.resolve.parallel = parallel;
        self
    }

    /// Analyze `files` in order. Never fails: per-file problems become
    /// warnings and an empty input gives an empty model.
    pub fn analyze(&self, files: &[SourceFile]) -> Analysis {
        let results: Vec<_> = if self.parallel {
            files.par_iter().map(|f| scan_source(f, &self.scan)).collect()
        } else {
            files.iter().map(|f| scan_source(f, &self.scan)).collect()
        };

        let mut warnings = Vec::new();
        let mut found = Vec::new();
        for (file, result) in files.iter().zip(results) {
            match result {
                Ok(Some(decl)) => found.push(decl),
                Ok(None) => {}
                Err(error) => warnings.push(ScanWarning::new(file.path.clone(), error)),
            }
        }

        let declarations = dedupe(found, &mut warnings);
        let graph = build_graph(&declarations, &self.filter, self.resolve);
        let model = assemble(&declarations, &graph, &self.assemble);

        for warning in &warnings {
            tracing::warn!("{}", warning);
        }
        tracing::info!(
            files = files.len(),
            types = model.len(),
            edges = graph.edges.len(),
            warnings = warnings.len(),
            "analysis complete"
        );

        Analysis {
            model,
            warnings,
            files_scanned: files.len(),
        }
    }
}

/// Keep one declaration per FQN. A later declaration replaces an earlier
/// one and takes its place at the end of the input order.
fn dedupe(found: Vec<TypeDeclaration>, warnings: &mut Vec<ScanWarning>) -> Vec<TypeDeclaration> {
    let mut slots: Vec<Option<TypeDeclaration>> = Vec::with_capacity(found.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for decl in found {
        let fqn = decl.fqn();
        if let Some(previous) = index.get(&fqn).and_then(|&i| slots[i].take()) {
            warnings.push(ScanWarning::new(
                decl.file.clone(),
                ScanError::Duplicate {
                    fqn: fqn.clone(),
                    previous: previous.file,
                },
            ));
        }
        index.insert(fqn, slots.len());
        slots.push(Some(decl));
    }

    slots.into_iter().flatten().collect()
}
