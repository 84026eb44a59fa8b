//! Snapshot artifact rendering
//!
//! # Module Structure
//!
//! - `strategy` - choose between the external `tree` utility and the in-process renderer
//! - `external` - run `tree` with equivalent exclusion patterns
//! - `tree` - in-process tree formatter and the per-run renderer
//! - `index` - TSV file index writer
//! - `atomic` - temp-file-and-rename writes shared by both artifacts
//! - `summary` - coloured end-of-run report for the CLI

mod atomic;
mod external;
mod index;
mod strategy;
mod summary;
mod tree;

pub use atomic::write_atomic;
pub use external::{ExternalTree, ExternalTreeError, ignore_pattern};
pub use index::{IndexWriter, sanitize_field};
pub use strategy::{FallbackReason, TreeStrategy, select_strategy};
pub use summary::{print_summary, write_summary};
pub use tree::{RenderOutcome, TreeFormatter, TreeRenderer, entry_label};
