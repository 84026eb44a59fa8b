//! TreeWalker - produces the ordered, filtered entry sequence for a snapshot

use std::collections::HashSet;
use std::fs::{self, DirEntry, Metadata};
use std::path::{Path, PathBuf};

use crate::error::{Result, SnapshotError};

use super::classify::should_exclude;
use super::config::WalkerConfig;
use super::entry::{Entry, EntryKind, SkippedPath, WalkResult};
use super::filter::FilterConfig;
use super::utils::{compare_names, is_executable, mtime_epoch};

/// Depth-first walker driven by an explicit work stack.
///
/// At every level directories come first, then everything else, each group
/// sorted by [`compare_names`]. Both snapshot artifacts are rendered from the
/// resulting sequence, so this order is the single source of truth.
pub struct TreeWalker<'a> {
    filters: &'a FilterConfig,
    config: WalkerConfig,
}

/// Stack item: the entry plus whether its children should be listed.
struct Pending {
    entry: Entry,
    descend: bool,
}

/// Per-walk mutable state.
#[derive(Default)]
struct WalkState {
    skipped: Vec<SkippedPath>,
    visited: HashSet<PathBuf>,
}

impl<'a> TreeWalker<'a> {
    pub fn new(filters: &'a FilterConfig, config: WalkerConfig) -> Self {
        Self { filters, config }
    }

    pub fn filters(&self) -> &FilterConfig {
        self.filters
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    /// Walk `root` and collect every entry that survives the filters.
    ///
    /// The root itself is never filtered. Unreadable subtrees are recorded in
    /// [`WalkResult::skipped`] and do not fail the walk.
    pub fn walk(&self, root: &Path) -> Result<WalkResult> {
        let root_meta = fs::metadata(root).map_err(|_| SnapshotError::InvalidRoot {
            path: root.to_path_buf(),
        })?;
        if !root_meta.is_dir() {
            return Err(SnapshotError::InvalidRoot {
                path: root.to_path_buf(),
            });
        }

        let mut state = WalkState::default();
        if self.config.follow_symlinks {
            state.visited.insert(canonical(root));
        }

        let mut entries = Vec::new();
        let mut stack = vec![Pending {
            entry: Entry {
                path: root.to_path_buf(),
                name: root.display().to_string(),
                depth: 0,
                kind: EntryKind::Dir,
                size_bytes: 0,
                mtime_epoch: 0,
            },
            descend: !self.config.at_max_depth(0),
        }];

        while let Some(Pending { entry, descend }) = stack.pop() {
            let dir = entry.path.clone();
            let depth = entry.depth;
            entries.push(entry);

            if !descend {
                continue;
            }
            if self.config.is_cancelled() {
                log::debug!("walk cancelled before {}", dir.display());
                return Err(SnapshotError::Cancelled);
            }

            log::trace!("visiting {}", dir.display());
            match self.read_children(&dir, depth + 1, &mut state) {
                Ok(children) => stack.extend(children.into_iter().rev()),
                Err(err) => {
                    log::warn!("skipping {}: {}", dir.display(), err);
                    state.skipped.push(SkippedPath::from_io(&dir, &err));
                }
            }
        }

        Ok(WalkResult {
            entries,
            skipped: state.skipped,
            used_fallback_renderer: false,
        })
    }

    /// List, filter and sort the children of `dir`.
    ///
    /// When links are followed, directories claim their canonical target in
    /// sorted order; a directory whose target was already claimed is listed
    /// but not descended.
    fn read_children(
        &self,
        dir: &Path,
        depth: usize,
        state: &mut WalkState,
    ) -> std::io::Result<Vec<Pending>> {
        let mut dirs = Vec::new();
        let mut files = Vec::new();

        for item in fs::read_dir(dir)? {
            let item = match item {
                Ok(item) => item,
                Err(err) => {
                    state.skipped.push(SkippedPath::from_io(dir, &err));
                    continue;
                }
            };
            match self.build_child(&item, depth) {
                Ok(Some(pending)) if pending.entry.lists_as_dir() => dirs.push(pending),
                Ok(Some(pending)) => files.push(pending),
                Ok(None) => {}
                Err(err) => {
                    log::warn!("skipping {}: {}", item.path().display(), err);
                    state.skipped.push(SkippedPath::from_io(&item.path(), &err));
                }
            }
        }

        dirs.sort_by(|a, b| compare_names(&a.entry.name, &b.entry.name));
        files.sort_by(|a, b| compare_names(&a.entry.name, &b.entry.name));

        if self.config.follow_symlinks {
            for pending in &mut dirs {
                if !state.visited.insert(canonical(&pending.entry.path)) && pending.descend {
                    log::debug!(
                        "not descending {}: target already visited",
                        pending.entry.path.display()
                    );
                    pending.descend = false;
                }
            }
        }

        dirs.extend(files);
        Ok(dirs)
    }

    /// Classify one directory item. `Ok(None)` means it was filtered out.
    fn build_child(&self, item: &DirEntry, depth: usize) -> std::io::Result<Option<Pending>> {
        let path = item.path();
        let name = item.file_name().to_string_lossy().into_owned();
        let file_type = item.file_type()?;

        if file_type.is_symlink() {
            return Ok(self.build_symlink(path, name, depth));
        }

        if file_type.is_dir() {
            if should_exclude(&name, true, &path, self.filters) {
                log::debug!("excluded directory {}", path.display());
                return Ok(None);
            }
            return Ok(Some(self.dir_pending(path, name, depth)));
        }

        if should_exclude(&name, false, &path, self.filters) {
            log::debug!("excluded file {}", path.display());
            return Ok(None);
        }
        let meta = item.metadata()?;
        let kind = if is_executable(&meta) {
            EntryKind::Executable
        } else {
            EntryKind::File
        };
        Ok(Some(file_pending(path, name, depth, kind, &meta)))
    }

    /// Links to directories take directory rules and sort with directories.
    /// They are descended only when links are followed.
    fn build_symlink(&self, path: PathBuf, name: String, depth: usize) -> Option<Pending> {
        let target_meta = fs::metadata(&path).ok();
        let target_is_dir = target_meta.as_ref().is_some_and(Metadata::is_dir);

        if should_exclude(&name, target_is_dir, &path, self.filters) {
            log::debug!("excluded link {}", path.display());
            return None;
        }

        let target = fs::read_link(&path).unwrap_or_default();
        let (size_bytes, mtime) = if target_is_dir {
            (0, 0)
        } else {
            target_meta
                .or_else(|| fs::symlink_metadata(&path).ok())
                .map(|m| (m.len(), mtime_epoch(&m)))
                .unwrap_or((0, 0))
        };
        let descend =
            target_is_dir && self.config.follow_symlinks && !self.config.at_max_depth(depth);
        Some(Pending {
            entry: Entry {
                path,
                name,
                depth,
                kind: EntryKind::Symlink {
                    target,
                    target_is_dir,
                },
                size_bytes,
                mtime_epoch: mtime,
            },
            descend,
        })
    }

    fn dir_pending(&self, path: PathBuf, name: String, depth: usize) -> Pending {
        Pending {
            entry: Entry {
                path,
                name,
                depth,
                kind: EntryKind::Dir,
                size_bytes: 0,
                mtime_epoch: 0,
            },
            descend: !self.config.at_max_depth(depth),
        }
    }
}

fn file_pending(path: PathBuf, name: String, depth: usize, kind: EntryKind, meta: &Metadata) -> Pending {
    Pending {
        entry: Entry {
            path,
            name,
            depth,
            kind,
            size_bytes: meta.len(),
            mtime_epoch: mtime_epoch(meta),
        },
        descend: false,
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
