//! Delegation to the system `tree` utility

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;

use crate::tree::{FilterConfig, WalkerConfig};

/// Built-in exclusions the classifier always applies, in `tree -I` syntax.
const BUILTIN_PATTERNS: &[&str] = &[".ds_store", "pointcloud*", "point cloud*"];

#[derive(Error, Debug)]
pub enum ExternalTreeError {
    #[error("cannot run tree: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("tree exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

/// A located `tree` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTree {
    binary: PathBuf,
}

impl ExternalTree {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Find `tree` on the `PATH`.
    pub fn locate() -> Option<Self> {
        match which::which("tree") {
            Ok(binary) => Some(Self::new(binary)),
            Err(err) => {
                log::debug!("tree utility unavailable: {}", err);
                None
            }
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// `tree -I` separates patterns with `|`, so no rule may contain one.
    pub fn can_express(filters: &FilterConfig) -> bool {
        let exts = filters.excluded_extensions().iter();
        let names = filters.excluded_names().iter();
        let dirs = filters.excluded_dir_patterns().iter().map(|p| p.as_str());
        !exts
            .map(String::as_str)
            .chain(names.map(String::as_str))
            .chain(dirs)
            .any(|rule| rule.contains('|'))
    }

    /// Arguments for a listing equivalent to the in-process renderer.
    pub fn args(&self, root: &Path, filters: &FilterConfig, config: &WalkerConfig) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            root.as_os_str().to_os_string(),
            "-a".into(),
            "-F".into(),
            "-N".into(),
            "--dirsfirst".into(),
            "--noreport".into(),
            "--charset".into(),
            "UTF-8".into(),
            "--ignore-case".into(),
        ];
        if let Some(depth) = config.max_depth {
            args.push("-L".into());
            args.push(depth.to_string().into());
        }
        let pattern = ignore_pattern(filters);
        if !pattern.is_empty() {
            args.push("-I".into());
            args.push(pattern.into());
        }
        args
    }

    /// Run `tree` and capture its stdout. The child is always waited on.
    pub fn run(
        &self,
        root: &Path,
        filters: &FilterConfig,
        config: &WalkerConfig,
    ) -> Result<String, ExternalTreeError> {
        let output = Command::new(&self.binary)
            .args(self.args(root, filters, config))
            .output()
            .map_err(ExternalTreeError::Spawn)?;

        if !output.status.success() {
            return Err(ExternalTreeError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Build the `|`-separated `tree -I` pattern for the configured rules.
pub fn ignore_pattern(filters: &FilterConfig) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut push = |part: String| {
        if !parts.contains(&part) {
            parts.push(part);
        }
    };

    for ext in filters.excluded_extensions() {
        push(format!("*.{}", ext));
    }
    for name in filters.excluded_names() {
        push(name.clone());
    }
    for pattern in filters.excluded_dir_patterns() {
        push(pattern.as_str().to_string());
    }
    for builtin in BUILTIN_PATTERNS {
        push(builtin.to_string());
    }

    parts.join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignore_pattern_default_filters() {
        let pattern = ignore_pattern(&FilterConfig::default());
        assert!(pattern.starts_with("*.e57|*.fbx|"));
        assert!(pattern.contains("*.obj"));
        assert!(pattern.contains("|mesh|meshes|pointcloud*|point cloud*"));
        assert_eq!(pattern.matches(".ds_store").count(), 1);
    }

    #[test]
    fn test_ignore_pattern_empty_filters_keeps_builtins() {
        let pattern = ignore_pattern(&FilterConfig::empty());
        assert_eq!(pattern, ".ds_store|pointcloud*|point cloud*");
    }

    #[test]
    fn test_args_include_depth_and_pattern() {
        let tool = ExternalTree::new(PathBuf::from("/usr/bin/tree"));
        let config = WalkerConfig {
            max_depth: Some(2),
            ..Default::default()
        };
        let filters = FilterConfig::empty().with_extensions(["obj"]);
        let args = tool.args(Path::new("/data"), &filters, &config);
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(args[0], "/data");
        assert!(args.contains(&"--dirsfirst".to_string()));
        assert!(args.contains(&"--noreport".to_string()));
        let level = args.iter().position(|a| a == "-L").unwrap();
        assert_eq!(args[level + 1], "2");
        let ignore = args.iter().position(|a| a == "-I").unwrap();
        assert!(args[ignore + 1].starts_with("*.obj|"));
    }

    #[test]
    fn test_can_express() {
        assert!(ExternalTree::can_express(&FilterConfig::default()));
        let filters = FilterConfig::empty().with_names(["odd|name"]);
        assert!(!ExternalTree::can_express(&filters));
    }

    #[test]
    fn test_missing_binary_reports_spawn_error() {
        let tool = ExternalTree::new(PathBuf::from("/nonexistent/tree-binary"));
        let result = tool.run(
            Path::new("/"),
            &FilterConfig::empty(),
            &WalkerConfig::default(),
        );
        assert!(matches!(result, Err(ExternalTreeError::Spawn(_))));
    }
}
