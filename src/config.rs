//! Configuration file schema.
//!
//! Every field is optional in YAML; a missing file means all defaults.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::assemble::AssembleOptions;
use crate::resolve::ResolveOptions;
use crate::scan::{DocWindow, TypeFilter};

/// Config file names searched for in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["classmap.yaml", ".classmap.yaml"];

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Config {
    /// File extensions collected by the source loader (without the dot).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Glob patterns for paths to exclude (e.g., "**/generated/**").
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Directory names pruned during traversal. Hidden directories are
    /// always pruned.
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,
    /// Export a body excerpt per member.
    #[serde(default)]
    pub snippets: bool,
    #[serde(default = "default_snippet_length")]
    pub snippet_length: usize,
    #[serde(default = "default_doc_window_lines")]
    pub doc_window_lines: usize,
    #[serde(default = "default_doc_max_blank_lines")]
    pub doc_max_blank_lines: usize,
    /// Project types that should never become collaborators or edges.
    #[serde(default)]
    pub extra_builtin_types: Vec<String>,
    /// Stop at an explicit import of an unknown type instead of falling
    /// back to the global simple-name lookup.
    #[serde(default)]
    pub explicit_imports_shadow: bool,
    #[serde(default = "default_true")]
    pub parallel: bool,
}

fn default_extensions() -> Vec<String> {
    vec!["java".to_string()]
}

fn default_skip_dirs() -> Vec<String> {
    ["build", "target", "out", "node_modules"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_snippet_length() -> usize {
    200
}

fn default_doc_window_lines() -> usize {
    10
}

fn default_doc_max_blank_lines() -> usize {
    2
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            excluded_paths: Vec::new(),
            skip_dirs: default_skip_dirs(),
            snippets: false,
            snippet_length: default_snippet_length(),
            doc_window_lines: default_doc_window_lines(),
            doc_max_blank_lines: default_doc_max_blank_lines(),
            extra_builtin_types: Vec::new(),
            explicit_imports_shadow: false,
            parallel: true,
        }
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        // An empty document deserializes as null, which means all defaults.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load `explicit` if given, else the first default name found in `dir`,
    /// else defaults. Returns the path that was loaded, if any.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => discover(dir),
        };
        match path {
            Some(p) => {
                let config = Self::parse_file(&p)?;
                validate(&config)?;
                Ok((config, Some(p)))
            }
            None => Ok((Self::default(), None)),
        }
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn doc_window(&self) -> DocWindow {
        DocWindow {
            max_lines: self.doc_window_lines,
            max_blank_lines: self.doc_max_blank_lines,
        }
    }

    pub fn type_filter(&self) -> TypeFilter {
        TypeFilter::with_extra(self.extra_builtin_types.iter().cloned())
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            explicit_imports_shadow: self.explicit_imports_shadow,
            parallel: self.parallel,
        }
    }

    pub fn assemble_options(&self) -> AssembleOptions {
        AssembleOptions {
            snippets: self.snippets,
            snippet_length: self.snippet_length,
        }
    }

    /// Whether `ext` is one of the configured extensions.
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

/// First default config file present in `dir`.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Validate a config for correctness.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    if config.extensions.iter().all(|e| e.trim_start_matches('.').is_empty()) {
        anyhow::bail!("extensions must name at least one file extension");
    }
    if config.snippet_length == 0 {
        anyhow::bail!("snippet_length must be greater than zero");
    }
    if config.doc_window_lines == 0 {
        anyhow::bail!("doc_window_lines must be greater than zero");
    }

    for pattern in &config.excluded_paths {
        globset::Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
    }

    Ok(())
}
