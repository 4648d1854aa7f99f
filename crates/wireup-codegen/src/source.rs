//! Input source sets.
//!
//! The generator consumes an ordered [`SourceSet`]: file order is scan
//! order, and scan order decides first-seen-wins deduplication, so a set
//! built from a directory walks it in sorted order to stay deterministic
//! across runs.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// One source file: a display path, the module its items live in, and its
/// content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path used in diagnostics, relative to the set root when walked.
    pub path: String,
    /// Module path the file's top-level items belong to, derived from the
    /// file path by rustc's conventions: `lib.rs`, `main.rs` and `mod.rs`
    /// map to their directory, any other stem adds a module segment.
    pub module: String,
    /// Full file content.
    pub content: String,
}

/// Derives the module path for a file, relative to the set root.
fn module_of(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let mut segments: Vec<&str> = normalized
        .trim_start_matches("./")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    if segments.first() == Some(&"src") {
        segments.remove(0);
    }
    let Some(last) = segments.pop() else {
        return String::new();
    };
    let stem = last.strip_suffix(".rs").unwrap_or(last);
    if !matches!(stem, "lib" | "main" | "mod") {
        segments.push(stem);
    }
    segments.join("::")
}

/// Ordered collection of source files plus ambient crate metadata.
///
/// `crate_name` and `package_name` feed the generated namespace fallback
/// chain (explicit option, then crate name, then package name, then
/// `"generated"`).
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    files: Vec<SourceFile>,
    crate_name: Option<String>,
    package_name: Option<String>,
}

impl SourceSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects every `.rs` file under `root`, depth-first in sorted
    /// order. Hidden entries and `target` directories are skipped.
    pub fn from_dir(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let mut set = Self::new();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let name = entry.file_name().to_string_lossy();
                !(name.starts_with('.') && name.len() > 1) && name != "target"
            });

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                match e.into_io_error() {
                    Some(io) => Error::io(path, io),
                    None => Error::io(path, std::io::Error::other("walk error")),
                }
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("rs") {
                continue;
            }
            let content =
                fs::read_to_string(path).map_err(|e| Error::io(path.to_path_buf(), e))?;
            let display = path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .into_owned();
            set.push(display, content);
        }
        Ok(set)
    }

    /// Appends a file; order of pushes is scan order. The file's module
    /// path derives from `path`.
    pub fn push(&mut self, path: impl Into<String>, content: impl Into<String>) {
        let path = path.into();
        self.files.push(SourceFile {
            module: module_of(&path),
            path,
            content: content.into(),
        });
    }

    /// Builder form of [`push`](Self::push).
    pub fn with_source(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.push(path, content);
        self
    }

    /// Sets the ambient crate name (`CARGO_CRATE_NAME` in build scripts).
    pub fn with_crate_name(mut self, name: impl Into<String>) -> Self {
        self.crate_name = Some(name.into());
        self
    }

    /// Sets the ambient package name (`CARGO_PKG_NAME` in build scripts).
    pub fn with_package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = Some(name.into());
        self
    }

    /// Ambient crate name, when supplied.
    pub fn crate_name(&self) -> Option<&str> {
        self.crate_name.as_deref()
    }

    /// Ambient package name, when supplied.
    pub fn package_name(&self) -> Option<&str> {
        self.package_name.as_deref()
    }

    /// Files in scan order.
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Number of files in the set.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the set holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
