//! Error types for snapshot runs

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = SnapshotError> = std::result::Result<T, E>;

/// Whole-run and per-artifact failures.
///
/// Per-subtree read errors are not represented here: the walker records them
/// as [`SkippedPath`](crate::tree::SkippedPath) values and keeps going.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("root is not a directory: {}", path.display())]
    InvalidRoot { path: PathBuf },

    #[error("cannot create output directory '{}': {source}", path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write '{}': {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot cancelled")]
    Cancelled,

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("no configuration directory available on this platform")]
    NoConfigDir,

    #[error("cannot read settings '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write settings '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
