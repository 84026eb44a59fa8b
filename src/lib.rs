//! CloudTree - filtered directory tree and file index snapshots

pub mod error;
pub mod output;
pub mod settings;
pub mod snapshot;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{Result, SettingsError, SnapshotError};
pub use output::{
    FallbackReason, IndexWriter, TreeFormatter, TreeRenderer, TreeStrategy, print_summary,
    select_strategy,
};
pub use settings::{JsonSettingsStore, Settings, SettingsStore};
pub use snapshot::{
    SnapshotPaths, SnapshotReport, SnapshotRequest, Stage, default_label, default_out_dir,
    run_snapshot, run_snapshot_with_progress, snapshot_paths, timestamp_now,
};
pub use tree::{
    CancelFlag, Entry, EntryKind, FilterConfig, SkippedPath, TreeWalker, WalkResult, WalkerConfig,
    should_exclude,
};
