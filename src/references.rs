//! Reference lookup against project files.
//!
//! An item's reference is a piece of text expected to appear in the project:
//! either in a file name or on some line of a file. When reference checking is
//! on, the publisher shows where it was found instead of the raw text.

use crate::model::Item;
use crate::publish::PublishError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Where a reference was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefLocation {
    /// Path relative to the search root, `/`-separated.
    pub path: String,
    /// 1-based line number; `None` when the reference matched the file name.
    pub line: Option<usize>,
}

impl fmt::Display for RefLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} (line {})", self.path, line),
            None => write!(f, "{} (line None)", self.path),
        }
    }
}

/// Resolves an item's reference to a location.
pub trait ReferenceLocator {
    fn locate(&self, item: &Item) -> Result<RefLocation, PublishError>;
}

/// Searches every non-hidden file under a project root.
///
/// Files are visited in sorted order. For each file, a name containing the
/// reference wins over a matching line. The item's own file and any excluded
/// path (the publishing manifest, a previous output directory) are never a
/// match.
#[derive(Debug, Clone)]
pub struct ProjectFiles {
    root: PathBuf,
    excluded: Vec<PathBuf>,
}

impl ProjectFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded: Vec::new(),
        }
    }

    /// Skip `path` during lookup. Directories are skipped with everything in
    /// them. Paths that don't exist yet are checked again on every lookup.
    pub fn excluding(mut self, path: impl Into<PathBuf>) -> Self {
        self.excluded.push(path.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical forms of every path to skip for `item`.
    fn skipped_paths(&self, item: &Item) -> Vec<PathBuf> {
        let mut skipped: Vec<PathBuf> = self
            .excluded
            .iter()
            .filter_map(|p| fs::canonicalize(p).ok())
            .collect();
        if let Some(own) = item.path.as_deref() {
            skipped.extend(fs::canonicalize(own).ok());
            skipped.extend(fs::canonicalize(self.root.join(own)).ok());
        }
        skipped
    }
}

impl ReferenceLocator for ProjectFiles {
    fn locate(&self, item: &Item) -> Result<RefLocation, PublishError> {
        let reference = item.reference().unwrap_or_default();
        let not_found = || PublishError::ReferenceNotFound {
            id: item.id.clone(),
            reference: reference.to_string(),
        };
        if reference.is_empty() {
            return Err(not_found());
        }

        let skipped = self.skipped_paths(item);
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !(is_hidden(e) || is_skipped(e, &skipped)));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
            if entry.file_name().to_string_lossy().contains(reference) {
                return Ok(RefLocation {
                    path: display_path(relative),
                    line: None,
                });
            }
            // Binary and non-UTF-8 files can't hold a textual reference.
            let Ok(content) = fs::read_to_string(entry.path()) else {
                continue;
            };
            if let Some(index) = content.lines().position(|l| l.contains(reference)) {
                return Ok(RefLocation {
                    path: display_path(relative),
                    line: Some(index + 1),
                });
            }
        }

        Err(not_found())
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn is_skipped(entry: &DirEntry, skipped: &[PathBuf]) -> bool {
    !skipped.is_empty()
        && fs::canonicalize(entry.path()).is_ok_and(|path| skipped.contains(&path))
}

/// Relative path with `/` separators regardless of platform.
fn display_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
