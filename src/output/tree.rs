//! Tree text rendering
//!
//! [`TreeFormatter`] is the in-process renderer. It reproduces the layout of
//! `tree -a -F --dirsfirst --noreport` so a snapshot reads the same whichever
//! strategy produced it. [`TreeRenderer`] applies the strategy chosen for the
//! run, keeps external output only when it matches, and writes the artifact.

use std::path::Path;

use crate::error::Result;
use crate::tree::{EntryKind, FilterConfig, WalkResult, WalkerConfig};

use super::atomic::write_atomic;
use super::strategy::{FallbackReason, TreeStrategy};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// Formatter for the in-process tree listing.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeFormatter;

impl TreeFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Render every entry of the walk, one line each, newline-terminated.
    pub fn format(&self, walk: &WalkResult) -> String {
        let last_flags = last_sibling_flags(walk);
        let mut output = String::new();
        // ancestors[d] is true when the entry open at depth d was the last of its siblings
        let mut ancestors: Vec<bool> = Vec::new();

        for (entry, &is_last) in walk.entries.iter().zip(&last_flags) {
            if entry.is_root() {
                output.push_str(&entry.name);
                output.push('\n');
                continue;
            }

            ancestors.truncate(entry.depth);
            for depth in 1..entry.depth {
                let ancestor_last = ancestors.get(depth).copied().unwrap_or(true);
                output.push_str(if ancestor_last { SPACE } else { PIPE });
            }
            output.push_str(if is_last { LAST_BRANCH } else { BRANCH });
            output.push_str(&entry_label(&entry.name, &entry.kind));
            output.push('\n');

            if ancestors.len() <= entry.depth {
                ancestors.resize(entry.depth + 1, true);
            }
            ancestors[entry.depth] = is_last;
        }

        output
    }
}

/// Name plus the classification marker `tree -F` would print.
pub fn entry_label(name: &str, kind: &EntryKind) -> String {
    match kind {
        EntryKind::Dir => format!("{}/", name),
        EntryKind::Executable => format!("{}*", name),
        EntryKind::Symlink {
            target,
            target_is_dir,
        } => {
            let marker = if *target_is_dir { "/" } else { "" };
            format!("{} -> {}{}", name, target.display(), marker)
        }
        EntryKind::File => name.to_string(),
    }
}

/// For each entry, whether no later sibling follows it.
///
/// Scans backwards: a sibling at the same depth seen before any shallower
/// entry means the current entry is not last.
fn last_sibling_flags(walk: &WalkResult) -> Vec<bool> {
    let mut flags = vec![true; walk.entries.len()];
    let mut sibling_seen: Vec<bool> = Vec::new();

    for (i, entry) in walk.entries.iter().enumerate().rev() {
        let depth = entry.depth;
        if sibling_seen.len() <= depth {
            sibling_seen.resize(depth + 1, false);
        }
        flags[i] = !sibling_seen[depth];
        sibling_seen[depth] = true;
        sibling_seen.truncate(depth + 1);
    }

    flags
}

/// Keep the external listing only when it is identical to the in-process one.
fn accept_external(external: String, local: String) -> (String, Option<FallbackReason>) {
    if external == local {
        return (external, None);
    }
    match external
        .lines()
        .zip(local.lines())
        .position(|(theirs, ours)| theirs != ours)
    {
        Some(line) => log::debug!("external tree differs from the walk at line {}", line + 1),
        None => log::debug!(
            "external tree listed {} lines, walk has {}",
            external.lines().count(),
            local.lines().count()
        ),
    }
    (local, Some(FallbackReason::OutputMismatch))
}

/// Produces the tree artifact for one run using its selected strategy.
pub struct TreeRenderer<'a> {
    strategy: TreeStrategy,
    filters: &'a FilterConfig,
    config: &'a WalkerConfig,
    formatter: TreeFormatter,
}

/// What the renderer ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub used_fallback: bool,
    pub fallback_reason: Option<FallbackReason>,
    pub bytes_written: u64,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(strategy: TreeStrategy, filters: &'a FilterConfig, config: &'a WalkerConfig) -> Self {
        Self {
            strategy,
            filters,
            config,
            formatter: TreeFormatter::new(),
        }
    }

    pub fn strategy(&self) -> &TreeStrategy {
        &self.strategy
    }

    /// Build the tree text. Falls back in-process when the external tool fails
    /// or its listing differs from the in-process rendering of the walk.
    pub fn render_text(&self, walk: &WalkResult) -> (String, Option<FallbackReason>) {
        let local = self.formatter.format(walk);
        let external = match &self.strategy {
            TreeStrategy::External(tool) => tool,
            TreeStrategy::Fallback(reason) => return (local, Some(reason.clone())),
        };

        let Some(root) = walk.root() else {
            return (local, Some(FallbackReason::OutputMismatch));
        };

        match external.run(&root.path, self.filters, self.config) {
            Ok(text) => accept_external(text, local),
            Err(err) => {
                log::debug!("external tree failed: {}; rendering in-process", err);
                (local, Some(FallbackReason::ToolFailed(err.to_string())))
            }
        }
    }

    /// Render and write the tree artifact atomically to `out_path`.
    pub fn render(&self, walk: &WalkResult, out_path: &Path) -> Result<RenderOutcome> {
        let (text, fallback_reason) = self.render_text(walk);
        write_atomic(out_path, text.as_bytes())?;
        Ok(RenderOutcome {
            used_fallback: fallback_reason.is_some(),
            fallback_reason,
            bytes_written: text.len() as u64,
        })
    }
}
