//! File tree access behind traits.
//!
//! Paths handed to and returned from these traits are always relative to the
//! tree root and `/`-separated, regardless of platform.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use schemasplit_common_core::{Error, Result};
use tracing::trace;

use crate::path::{safe_join, to_unix_string};
use crate::{read_to_string, remove_file_if_exists, write_string_atomic, MAX_FILE_SIZE};

/// Match options shared by every tree: `*` never crosses `/`, and dot-files
/// (temporary files from atomic writes) are never matched by wildcards.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Read access to a tree of files.
pub trait TreeSource {
    /// Root of the tree, used in error messages.
    fn root(&self) -> &Path;

    /// Relative paths of all files matching `pattern`, sorted.
    fn find(&self, pattern: &str) -> Result<Vec<String>>;

    /// Read a file as text.
    fn read(&self, path: &str) -> Result<String>;

    /// Whether a file exists at `path`.
    fn exists(&self, path: &str) -> bool;
}

/// Write access to a tree of files.
pub trait TreeSink {
    /// Write `contents` to `path`, creating parent directories as needed.
    fn write(&mut self, path: &str, contents: &str) -> Result<()>;

    /// Remove the file at `path`. Returns whether anything was removed.
    fn remove(&mut self, path: &str) -> Result<bool>;
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| Error::FileSystem {
        message: format!("invalid glob pattern `{pattern}`: {e}"),
        path: None,
        source: None,
    })
}

/// A tree rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct DiskTree {
    root: PathBuf,
}

impl DiskTree {
    /// Create a tree rooted at `root`. The directory need not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Self { root: PathBuf::from(".") };
        }
        Self { root }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        safe_join(&self.root, path).ok_or_else(|| {
            Error::file_system(format!("path escapes tree root: {path}"), path)
        })
    }
}

impl TreeSource for DiskTree {
    fn root(&self) -> &Path {
        &self.root
    }

    fn find(&self, pattern: &str) -> Result<Vec<String>> {
        compile(pattern)?;
        let root = Pattern::escape(&self.root.to_string_lossy());
        let full = format!("{root}/{pattern}");

        let entries = glob::glob_with(&full, MATCH_OPTIONS).map_err(|e| Error::FileSystem {
            message: format!("invalid glob pattern `{full}`: {e}"),
            path: None,
            source: None,
        })?;

        let mut found = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| {
                let path = e.path().display().to_string();
                Error::FileSystem {
                    message: format!("failed to read directory entry: {path}"),
                    path: Some(path),
                    source: Some(Box::new(e.into_error())),
                }
            })?;
            if !path.is_file() {
                continue;
            }
            let relative = path.strip_prefix(&self.root).unwrap_or(path.as_path());
            found.push(to_unix_string(relative));
        }
        found.sort();
        trace!(pattern, count = found.len(), "find");
        Ok(found)
    }

    fn read(&self, path: &str) -> Result<String> {
        read_to_string(self.resolve(path)?, MAX_FILE_SIZE)
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.is_file()).unwrap_or(false)
    }
}

impl TreeSink for DiskTree {
    fn write(&mut self, path: &str, contents: &str) -> Result<()> {
        write_string_atomic(self.resolve(path)?, contents)
    }

    fn remove(&mut self, path: &str) -> Result<bool> {
        remove_file_if_exists(self.resolve(path)?)
    }
}

/// An in-memory tree, keyed by relative path.
#[derive(Debug, Clone)]
pub struct MemoryTree {
    root: PathBuf,
    files: BTreeMap<String, String>,
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self {
            root: PathBuf::from("<memory>"),
            files: BTreeMap::new(),
        }
    }
}

impl MemoryTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree pre-populated with `(path, contents)` pairs.
    pub fn with_files<I, P, C>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        Self {
            files: files
                .into_iter()
                .map(|(p, c)| (p.into(), c.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// All files, sorted by path.
    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }

    /// Contents of a single file.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the tree holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl TreeSource for MemoryTree {
    fn root(&self) -> &Path {
        &self.root
    }

    fn find(&self, pattern: &str) -> Result<Vec<String>> {
        let pattern = compile(pattern)?;
        // BTreeMap iteration is already sorted
        Ok(self
            .files
            .keys()
            .filter(|path| pattern.matches_with(path, MATCH_OPTIONS))
            .cloned()
            .collect())
    }

    fn read(&self, path: &str) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| Error::file_system(format!("file not found: {path}"), path))
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}

impl TreeSink for MemoryTree {
    fn write(&mut self, path: &str, contents: &str) -> Result<()> {
        self.files.insert(path.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&mut self, path: &str) -> Result<bool> {
        Ok(self.files.remove(path).is_some())
    }
}
