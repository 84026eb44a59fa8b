//! Tab-separated file index

use std::fmt::Write as _;
use std::path::Path;

use crate::error::Result;
use crate::tree::{Entry, WalkResult};

use super::atomic::write_atomic;

/// Writes one `path<TAB>size<TAB>mtime` row per file, in walk order.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndexWriter;

impl IndexWriter {
    pub fn new() -> Self {
        Self
    }

    /// Format all file rows. Directories are omitted; there is no header.
    pub fn format(&self, walk: &WalkResult) -> String {
        let mut output = String::new();
        for entry in walk.files() {
            push_row(&mut output, entry);
        }
        output
    }

    /// Write the index atomically. Returns the number of rows written.
    pub fn write(&self, walk: &WalkResult, out_path: &Path) -> Result<usize> {
        let text = self.format(walk);
        write_atomic(out_path, text.as_bytes())?;
        Ok(walk.file_count())
    }
}

fn push_row(output: &mut String, entry: &Entry) {
    let path = sanitize_field(&entry.path.to_string_lossy());
    // Writing to a String cannot fail.
    let _ = writeln!(output, "{}\t{}\t{}", path, entry.size_bytes, entry.mtime_epoch);
}

/// Replace tabs and line breaks so a path always stays one TSV field.
pub fn sanitize_field(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}
