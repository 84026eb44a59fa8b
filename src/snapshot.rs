//! Snapshot runs: walk once, then write the tree and index artifacts

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::Local;

use crate::error::{Result, SnapshotError};
use crate::output::{FallbackReason, IndexWriter, TreeRenderer, select_strategy};
use crate::tree::{FilterConfig, SkippedPath, TreeWalker, WalkerConfig};

/// Marks artifacts produced with exclusion rules applied.
pub const SNAPSHOT_SUFFIX: &str = "FILTERED";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Local time formatted for artifact names.
pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Output file locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub tree: PathBuf,
    pub index: PathBuf,
}

pub fn snapshot_paths(out_dir: &Path, label: &str, timestamp: &str) -> SnapshotPaths {
    SnapshotPaths {
        tree: out_dir.join(format!("{label}_tree_{SNAPSHOT_SUFFIX}_{timestamp}.txt")),
        index: out_dir.join(format!("{label}_files_index_{SNAPSHOT_SUFFIX}_{timestamp}.tsv")),
    }
}

/// `~/Documents/CloudTree/snapshots/cloud_tree`, or the home directory when
/// the platform has no documents folder.
pub fn default_out_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("CloudTree")
        .join("snapshots")
        .join("cloud_tree")
}

/// Last path component of the root, used when no label is given.
pub fn default_label(root: &Path) -> String {
    root.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "root".to_string())
}

/// Progress points reported during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Scanning,
    WritingTree,
    WritingIndex,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Stage::Scanning => "Starting scan...",
            Stage::WritingTree => "Writing tree...",
            Stage::WritingIndex => "Writing TSV...",
            Stage::Done => "Done",
        };
        f.write_str(text)
    }
}

/// Everything a front-end supplies for one run.
#[derive(Debug, Clone)]
pub struct SnapshotRequest {
    pub root: PathBuf,
    pub out_dir: PathBuf,
    pub label: String,
    pub filters: FilterConfig,
    pub walker: WalkerConfig,
    pub write_tree: bool,
    pub write_index: bool,
    /// Try the system `tree` utility when the filters allow it.
    pub prefer_external: bool,
    /// Overrides the timestamp in artifact names.
    pub timestamp: Option<String>,
}

impl SnapshotRequest {
    pub fn new(root: impl Into<PathBuf>, out_dir: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            out_dir: out_dir.into(),
            label: label.into(),
            filters: FilterConfig::default(),
            walker: WalkerConfig::default(),
            write_tree: true,
            write_index: true,
            prefer_external: true,
            timestamp: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReport {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Outcome of a run that got past validation and the walk.
#[derive(Debug, Default)]
pub struct SnapshotReport {
    pub tree: Option<ArtifactReport>,
    pub index: Option<ArtifactReport>,
    pub files_indexed: usize,
    pub used_fallback_renderer: bool,
    pub fallback_reason: Option<FallbackReason>,
    pub skipped: Vec<SkippedPath>,
    /// Artifacts that could not be written. Each is independent of the other.
    pub failures: Vec<SnapshotError>,
    pub elapsed: Duration,
}

impl SnapshotReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn had_permission_errors(&self) -> bool {
        self.skipped.iter().any(|s| s.permission_denied)
    }
}

pub fn run_snapshot(request: &SnapshotRequest) -> Result<SnapshotReport> {
    run_snapshot_with_progress(request, |_| {})
}

/// Validate, walk, then write the enabled artifacts.
///
/// An invalid root, an uncreatable output directory or a cancelled walk abort
/// the run before any artifact is written. Write failures are collected in
/// [`SnapshotReport::failures`] so the other artifact is still attempted.
pub fn run_snapshot_with_progress<F>(request: &SnapshotRequest, mut progress: F) -> Result<SnapshotReport>
where
    F: FnMut(Stage),
{
    let started = Instant::now();

    if !request.root.is_dir() {
        return Err(SnapshotError::InvalidRoot {
            path: request.root.clone(),
        });
    }
    fs::create_dir_all(&request.out_dir).map_err(|source| SnapshotError::CreateOutputDir {
        path: request.out_dir.clone(),
        source,
    })?;

    let timestamp = request.timestamp.clone().unwrap_or_else(timestamp_now);
    let paths = snapshot_paths(&request.out_dir, &request.label, &timestamp);

    progress(Stage::Scanning);
    log::info!("scanning {}", request.root.display());
    let walker = TreeWalker::new(&request.filters, request.walker.clone());
    let mut walk = walker.walk(&request.root)?;
    log::info!(
        "walk found {} files in {} directories ({} skipped)",
        walk.file_count(),
        walk.dir_count(),
        walk.skipped.len()
    );

    let mut report = SnapshotReport::default();

    if request.write_tree {
        progress(Stage::WritingTree);
        let strategy = select_strategy(&request.filters, &request.walker, request.prefer_external);
        let renderer = TreeRenderer::new(strategy, &request.filters, &request.walker);
        match renderer.render(&walk, &paths.tree) {
            Ok(outcome) => {
                walk.used_fallback_renderer = outcome.used_fallback;
                report.fallback_reason = outcome.fallback_reason;
                report.tree = Some(ArtifactReport {
                    path: paths.tree.clone(),
                    bytes: outcome.bytes_written,
                });
            }
            Err(err) => {
                log::error!("{}", err);
                report.failures.push(err);
            }
        }
    }

    if request.write_index {
        progress(Stage::WritingIndex);
        match IndexWriter::new().write(&walk, &paths.index) {
            Ok(rows) => {
                report.files_indexed = rows;
                report.index = Some(ArtifactReport {
                    bytes: fs::metadata(&paths.index).map(|m| m.len()).unwrap_or(0),
                    path: paths.index.clone(),
                });
            }
            Err(err) => {
                log::error!("{}", err);
                report.failures.push(err);
            }
        }
    }

    progress(Stage::Done);
    report.used_fallback_renderer = walk.used_fallback_renderer;
    report.skipped = walk.skipped;
    report.elapsed = started.elapsed();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTree;

    fn request(tree: &TestTree, out: &Path) -> SnapshotRequest {
        let mut request = SnapshotRequest::new(tree.path(), out, "proj");
        request.prefer_external = false;
        request.timestamp = Some("20240102_030405".to_string());
        request
    }

    #[test]
    fn test_snapshot_paths() {
        let paths = snapshot_paths(Path::new("/out"), "site", "20240102_030405");
        assert_eq!(
            paths.tree,
            PathBuf::from("/out/site_tree_FILTERED_20240102_030405.txt")
        );
        assert_eq!(
            paths.index,
            PathBuf::from("/out/site_files_index_FILTERED_20240102_030405.tsv")
        );
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp_now();
        assert_eq!(ts.len(), 15);
        assert_eq!(ts.as_bytes()[8], b'_');
        assert!(ts.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_default_label() {
        assert_eq!(default_label(Path::new("/data/Site A")), "Site A");
        assert_eq!(default_label(Path::new("/")), "root");
    }

    #[test]
    fn test_run_writes_both_artifacts() {
        let tree = TestTree::new();
        tree.add_file("a.obj", "mesh");
        tree.add_file("b.txt", "hello");
        tree.add_file("mesh/c.txt", "hidden");
        let out = TestTree::new();

        let report = run_snapshot(&request(&tree, out.path())).unwrap();
        assert!(report.is_complete());
        assert!(report.used_fallback_renderer);
        assert_eq!(report.fallback_reason, Some(FallbackReason::Disabled));
        assert_eq!(report.files_indexed, 1);

        let tree_text = fs::read_to_string(&report.tree.unwrap().path).unwrap();
        assert_eq!(tree_text, format!("{}\n└── b.txt\n", tree.path().display()));

        let index_text = fs::read_to_string(&report.index.unwrap().path).unwrap();
        let fields: Vec<&str> = index_text.trim_end().split('\t').collect();
        assert_eq!(fields[0], tree.path().join("b.txt").to_string_lossy());
        assert_eq!(fields[1], "5");
    }

    #[test]
    fn test_invalid_root_writes_nothing() {
        let tree = TestTree::new();
        let out = tree.path().join("out");
        let mut req = request(&tree, &out);
        req.root = tree.path().join("missing");

        let err = run_snapshot(&req).unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidRoot { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn test_disabled_artifacts_are_not_written() {
        let tree = TestTree::new();
        tree.add_file("a.txt", "x");
        let out = TestTree::new();
        let mut req = request(&tree, out.path());
        req.write_tree = false;

        let report = run_snapshot(&req).unwrap();
        assert!(report.tree.is_none());
        assert!(report.index.is_some());
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_tree_write_still_writes_index() {
        let tree = TestTree::new();
        tree.add_file("a.txt", "hello");
        let out = TestTree::new();
        let req = request(&tree, out.path());
        let paths = snapshot_paths(out.path(), "proj", "20240102_030405");
        fs::create_dir(&paths.tree).unwrap();

        let report = run_snapshot(&req).unwrap();
        assert!(!report.is_complete());
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0], SnapshotError::WriteFailure { .. }));
        assert!(report.tree.is_none());
        let index = report.index.unwrap();
        assert_eq!(index.path, paths.index);
        assert!(index.bytes > 0);
        assert_eq!(report.files_indexed, 1);
    }

    #[test]
    fn test_progress_stages() {
        let tree = TestTree::new();
        let out = TestTree::new();
        let mut stages = Vec::new();
        run_snapshot_with_progress(&request(&tree, out.path()), |stage| stages.push(stage)).unwrap();
        assert_eq!(
            stages,
            vec![Stage::Scanning, Stage::WritingTree, Stage::WritingIndex, Stage::Done]
        );
    }

    #[test]
    fn test_cancelled_run_writes_nothing() {
        let tree = TestTree::new();
        tree.add_file("a/b.txt", "x");
        let out = TestTree::new();
        let flag = crate::tree::CancelFlag::new();
        flag.cancel();
        let mut req = request(&tree, out.path());
        req.walker.cancel = Some(flag);

        assert!(matches!(run_snapshot(&req), Err(SnapshotError::Cancelled)));
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }
}
