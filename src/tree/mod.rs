//! Filtering and traversal
//!
//! A [`FilterConfig`] decides which names survive, [`should_exclude`] applies it
//! to a single entry, and [`TreeWalker`] turns a root directory into the
//! ordered [`WalkResult`] that both snapshot artifacts are rendered from.

mod classify;
mod config;
mod entry;
mod filter;
mod utils;
mod walker;

pub use classify::should_exclude;
pub use config::{CancelFlag, WalkerConfig};
pub use entry::{Entry, EntryKind, SkippedPath, WalkResult};
pub use filter::{
    DEFAULT_EXCLUDED_DIR_PATTERNS, DEFAULT_EXCLUDED_EXTS, DEFAULT_EXCLUDED_NAMES, DirPattern,
    FilterConfig, normalize_dir_patterns, normalize_extensions, normalize_words,
    parse_extension_list, parse_pattern_list, parse_word_list,
};
pub use utils::{compare_names, format_size, system_time_to_epoch};
pub use walker::TreeWalker;
