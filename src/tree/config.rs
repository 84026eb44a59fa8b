//! Configuration types for tree walkers

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Configuration for tree walking behavior.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Directories at this depth are listed but not descended.
    pub max_depth: Option<usize>,
    /// Descend into symlinked directories, once per canonical target.
    pub follow_symlinks: bool,
    /// Checked between directory visits; setting it aborts the walk.
    pub cancel: Option<CancelFlag>,
}

impl WalkerConfig {
    pub fn at_max_depth(&self, depth: usize) -> bool {
        self.max_depth.is_some_and(|max| depth >= max)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_set)
    }
}

/// Cooperative cancellation shared between a host and a running walk.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
