//! Walk output types

use std::path::{Path, PathBuf};

/// What kind of filesystem node an entry is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
    /// Regular file with an execute bit set.
    Executable,
    /// Symbolic link. Descended only when links are followed.
    Symlink { target: PathBuf, target_is_dir: bool },
}

/// One surviving node of a walk.
///
/// Structure is implied by order and depth: the root has depth 0 and every
/// entry directly follows its parent or a preceding sibling's subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub name: String,
    pub depth: usize,
    pub kind: EntryKind,
    /// Zero for directories.
    pub size_bytes: u64,
    /// Seconds since the Unix epoch. Zero for directories.
    pub mtime_epoch: i64,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Dir)
    }

    /// Directories and links to directories. These sort with directories
    /// and never get an index row.
    pub fn lists_as_dir(&self) -> bool {
        match &self.kind {
            EntryKind::Dir => true,
            EntryKind::Symlink { target_is_dir, .. } => *target_is_dir,
            _ => false,
        }
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0
    }
}

/// A path the walk could not read, kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPath {
    pub path: PathBuf,
    pub reason: String,
    pub permission_denied: bool,
}

impl SkippedPath {
    pub fn from_io(path: &Path, err: &std::io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            reason: err.to_string(),
            permission_denied: err.kind() == std::io::ErrorKind::PermissionDenied,
        }
    }
}

/// Ordered, filtered entries of one walk.
#[derive(Debug, Clone, Default)]
pub struct WalkResult {
    pub entries: Vec<Entry>,
    pub skipped: Vec<SkippedPath>,
    /// Set once the tree strategy for this run is known.
    pub used_fallback_renderer: bool,
}

impl WalkResult {
    pub fn root(&self) -> Option<&Entry> {
        self.entries.first()
    }

    pub fn files(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.lists_as_dir())
    }

    pub fn file_count(&self) -> usize {
        self.files().count()
    }

    /// Directories below the root.
    pub fn dir_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.is_dir() && !e.is_root())
            .count()
    }

    pub fn had_permission_errors(&self) -> bool {
        self.skipped.iter().any(|s| s.permission_denied)
    }
}
