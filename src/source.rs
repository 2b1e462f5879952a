//! Source loading: directory traversal and text decoding.
//!
//! The analyzer itself never touches the filesystem; this module turns a
//! root path into the ordered `(path, text)` set it consumes.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::error::{ScanError, ScanWarning};
use crate::model::SourceFile;

/// Files read from disk, plus the ones that could not be read.
#[derive(Debug, Default)]
pub struct LoadedSources {
    pub files: Vec<SourceFile>,
    pub warnings: Vec<ScanWarning>,
}

/// Collects source files under a root according to a [`Config`].
pub struct SourceLoader<'a> {
    config: &'a Config,
    excluded: GlobSet,
}

impl<'a> SourceLoader<'a> {
    pub fn new(config: &'a Config) -> anyhow::Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &config.excluded_paths {
            let glob = Glob::new(pattern)
                .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
            builder.add(glob);
        }
        Ok(Self {
            config,
            excluded: builder.build()?,
        })
    }

    /// Load every matching file under `root`, sorted by path.
    ///
    /// `root` may also be a single file, which is loaded regardless of its
    /// extension. Paths are stored relative to `root`.
    pub fn load(&self, root: &Path) -> anyhow::Result<LoadedSources> {
        let mut loaded = LoadedSources::default();

        if root.is_file() {
            let name = root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| root.to_string_lossy().to_string());
            read_into(&mut loaded, root, name);
            return Ok(loaded);
        }

        let walker = WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_pruned(e, root));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(|p| relative_path(p, root))
                        .unwrap_or_default();
                    tracing::warn!(path = %path, error = %e, "cannot traverse entry");
                    if let Some(io) = e.into_io_error() {
                        loaded.warnings.push(ScanWarning::new(path, ScanError::Read(io)));
                    }
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !self.config.accepts_extension(ext) {
                continue;
            }
            let relative = relative_path(path, root);
            if self.excluded.is_match(&relative) {
                tracing::debug!(path = %relative, "excluded by pattern");
                continue;
            }
            read_into(&mut loaded, path, relative);
        }

        tracing::debug!(
            files = loaded.files.len(),
            unreadable = loaded.warnings.len(),
            "loaded sources"
        );
        Ok(loaded)
    }

    fn is_pruned(&self, entry: &DirEntry, root: &Path) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        let name: &str = &name;
        if name.starts_with('.') || self.config.skip_dirs.iter().any(|d| d == name) {
            return true;
        }
        self.excluded.is_match(relative_path(entry.path(), root))
    }
}

fn read_into(loaded: &mut LoadedSources, path: &Path, relative: String) {
    match read_source(path) {
        Ok(text) => loaded.files.push(SourceFile::new(relative, text)),
        Err(error) => {
            let warning = ScanWarning::new(relative, error);
            tracing::warn!("{}", warning);
            loaded.warnings.push(warning);
        }
    }
}

/// Read a whole file and decode it as UTF-8.
pub fn read_source(path: &Path) -> Result<String, ScanError> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes).map_err(|_| ScanError::Decode)
}

/// `path` relative to `root`, with forward slashes.
fn relative_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn paths(loaded: &LoadedSources) -> Vec<&str> {
        loaded.files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_load_filters_and_sorts() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/b/B.java", b"class B {}");
        write(temp.path(), "src/a/A.java", b"class A {}");
        write(temp.path(), "src/a/notes.txt", b"ignored");
        write(temp.path(), "build/Gen.java", b"class Gen {}");
        write(temp.path(), ".git/Hidden.java", b"class Hidden {}");

        let config = Config::default();
        let loaded = SourceLoader::new(&config).unwrap().load(temp.path()).unwrap();
        assert_eq!(paths(&loaded), vec!["src/a/A.java", "src/b/B.java"]);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_excluded_paths() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/A.java", b"class A {}");
        write(temp.path(), "src/generated/G.java", b"class G {}");
        write(temp.path(), "src/ATest.java", b"class ATest {}");

        let config = Config {
            excluded_paths: vec!["**/generated/**".to_string(), "**/*Test.java".to_string()],
            ..Default::default()
        };
        let loaded = SourceLoader::new(&config).unwrap().load(temp.path()).unwrap();
        assert_eq!(paths(&loaded), vec!["src/A.java"]);
    }

    #[test]
    fn test_undecodable_file_becomes_warning() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "Bad.java", &[0xff, 0xfe, 0x00, 0x63]);
        write(temp.path(), "Good.java", b"class Good {}");

        let config = Config::default();
        let loaded = SourceLoader::new(&config).unwrap().load(temp.path()).unwrap();
        assert_eq!(paths(&loaded), vec!["Good.java"]);
        assert_eq!(loaded.warnings.len(), 1);
        assert_eq!(loaded.warnings[0].path, "Bad.java");
        assert!(matches!(loaded.warnings[0].error, ScanError::Decode));
    }

    #[test]
    fn test_single_file_root() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "Only.txt", b"class Only {}");

        let config = Config::default();
        let loaded = SourceLoader::new(&config)
            .unwrap()
            .load(&temp.path().join("Only.txt"))
            .unwrap();
        assert_eq!(paths(&loaded), vec!["Only.txt"]);
    }
}
