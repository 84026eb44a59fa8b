//! Tree strategy selection
//!
//! The strategy is decided once per run, before rendering, from the filters
//! and walker options. Rendering code only matches on the result.

use std::fmt;

use crate::tree::{FilterConfig, WalkerConfig};

use super::external::ExternalTree;

/// How the tree artifact is produced for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeStrategy {
    /// Delegate to the system `tree` utility.
    External(ExternalTree),
    /// Render in-process.
    Fallback(FallbackReason),
}

impl TreeStrategy {
    pub fn is_fallback(&self) -> bool {
        matches!(self, TreeStrategy::Fallback(_))
    }
}

/// Why the in-process renderer was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// Substring keyword rules have no `tree -I` equivalent.
    KeywordFilters,
    ToolUnavailable,
    /// The caller asked for in-process rendering.
    Disabled,
    FollowSymlinks,
    /// A rule contains characters that cannot be written as a `tree -I` pattern.
    UnsupportedPattern,
    ToolFailed(String),
    /// The external listing did not have one line per walked entry.
    OutputMismatch,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::KeywordFilters => write!(f, "keyword filters are active"),
            FallbackReason::ToolUnavailable => write!(f, "tree utility not found"),
            FallbackReason::Disabled => write!(f, "external rendering disabled"),
            FallbackReason::FollowSymlinks => write!(f, "symlink following is enabled"),
            FallbackReason::UnsupportedPattern => write!(f, "filters not expressible as tree patterns"),
            FallbackReason::ToolFailed(msg) => write!(f, "tree utility failed: {}", msg),
            FallbackReason::OutputMismatch => write!(f, "tree utility output did not match the walk"),
        }
    }
}

/// Pick the strategy for a run.
///
/// External delegation is only attempted when it can express every active
/// rule; keyword filters always force the in-process renderer.
pub fn select_strategy(
    filters: &FilterConfig,
    config: &WalkerConfig,
    prefer_external: bool,
) -> TreeStrategy {
    let strategy = if filters.has_keywords() {
        TreeStrategy::Fallback(FallbackReason::KeywordFilters)
    } else if !prefer_external {
        TreeStrategy::Fallback(FallbackReason::Disabled)
    } else if config.follow_symlinks {
        TreeStrategy::Fallback(FallbackReason::FollowSymlinks)
    } else if !ExternalTree::can_express(filters) {
        TreeStrategy::Fallback(FallbackReason::UnsupportedPattern)
    } else {
        match ExternalTree::locate() {
            Some(tool) => TreeStrategy::External(tool),
            None => TreeStrategy::Fallback(FallbackReason::ToolUnavailable),
        }
    };
    log::debug!("tree strategy: {:?}", strategy);
    strategy
}
