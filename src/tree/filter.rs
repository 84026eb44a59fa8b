//! Exclusion rules for snapshot walks
//!
//! A [`FilterConfig`] is built once per run from user input and never changes
//! afterwards. Every string it holds is trimmed, lowercased and de-duplicated,
//! so the classifier can compare against lowercased entry names directly.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use glob::Pattern;
use regex::Regex;

/// Extensions of heavy 3D/scan payloads excluded unless the caller overrides them.
pub const DEFAULT_EXCLUDED_EXTS: &[&str] = &[
    "udsmesh", "uds", "obj", "fbx", "stl", "gltf", "glb", "ply", "las", "laz", "e57", "rcp",
    "rcs",
];

pub const DEFAULT_EXCLUDED_NAMES: &[&str] = &[".ds_store"];

pub const DEFAULT_EXCLUDED_DIR_PATTERNS: &[&str] = &["mesh", "meshes", "pointcloud*", "point cloud*"];

static EXTENSION_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,;]+").expect("EXTENSION_SEPARATORS regex is invalid"));

static WORD_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;\n]+").expect("WORD_SEPARATORS regex is invalid"));

/// A directory-name pattern: either an exact name or a wildcard pattern such as `pointcloud*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirPattern {
    raw: String,
    glob: Option<Pattern>,
}

impl DirPattern {
    /// Build a pattern from user text. Returns `None` for blank input.
    pub fn new(text: &str) -> Option<Self> {
        let raw = text.trim().to_lowercase();
        if raw.is_empty() {
            return None;
        }
        let glob = if raw.contains(['*', '?', '[']) {
            Pattern::new(&raw).ok()
        } else {
            None
        };
        Some(Self { raw, glob })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_wildcard(&self) -> bool {
        self.glob.is_some()
    }

    /// Match against an already-lowercased directory name.
    pub fn matches(&self, lowered_name: &str) -> bool {
        match &self.glob {
            Some(pattern) => pattern.matches(lowered_name),
            None => self.raw == lowered_name,
        }
    }
}

/// Immutable set of exclusion rules for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    excluded_extensions: BTreeSet<String>,
    excluded_names: BTreeSet<String>,
    excluded_dir_patterns: Vec<DirPattern>,
    excluded_keywords: BTreeSet<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            excluded_extensions: normalize_extensions(DEFAULT_EXCLUDED_EXTS),
            excluded_names: normalize_words(DEFAULT_EXCLUDED_NAMES),
            excluded_dir_patterns: normalize_dir_patterns(DEFAULT_EXCLUDED_DIR_PATTERNS),
            excluded_keywords: BTreeSet::new(),
        }
    }
}

impl FilterConfig {
    /// A config with no configurable rules. Built-in exclusions still apply.
    pub fn empty() -> Self {
        Self {
            excluded_extensions: BTreeSet::new(),
            excluded_names: BTreeSet::new(),
            excluded_dir_patterns: Vec::new(),
            excluded_keywords: BTreeSet::new(),
        }
    }

    pub fn new<E, D, K>(extensions: E, dir_patterns: D, keywords: K) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        Self {
            excluded_extensions: normalize_extensions(extensions),
            excluded_names: normalize_words(DEFAULT_EXCLUDED_NAMES),
            excluded_dir_patterns: normalize_dir_patterns(dir_patterns),
            excluded_keywords: normalize_words(keywords),
        }
    }

    pub fn with_extensions<I>(mut self, extensions: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.excluded_extensions = normalize_extensions(extensions);
        self
    }

    pub fn with_names<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.excluded_names = normalize_words(names);
        self
    }

    pub fn with_dir_patterns<I>(mut self, patterns: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.excluded_dir_patterns = normalize_dir_patterns(patterns);
        self
    }

    pub fn with_keywords<I>(mut self, keywords: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.excluded_keywords = normalize_words(keywords);
        self
    }

    pub fn excluded_extensions(&self) -> &BTreeSet<String> {
        &self.excluded_extensions
    }

    pub fn excluded_names(&self) -> &BTreeSet<String> {
        &self.excluded_names
    }

    pub fn excluded_dir_patterns(&self) -> &[DirPattern] {
        &self.excluded_dir_patterns
    }

    pub fn excluded_keywords(&self) -> &BTreeSet<String> {
        &self.excluded_keywords
    }

    /// Keyword rules cannot be expressed by the external tree utility.
    pub fn has_keywords(&self) -> bool {
        !self.excluded_keywords.is_empty()
    }
}

/// Lowercase, trim and drop one leading dot from each extension.
pub fn normalize_extensions<I>(items: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    items
        .into_iter()
        .filter_map(|item| {
            let lowered = item.as_ref().trim().to_lowercase();
            let ext = lowered.strip_prefix('.').unwrap_or(&lowered).trim();
            (!ext.is_empty()).then(|| ext.to_string())
        })
        .collect()
}

pub fn normalize_words<I>(items: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}

/// Normalize directory patterns, keeping first-seen order.
pub fn normalize_dir_patterns<I>(items: I) -> Vec<DirPattern>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut patterns: Vec<DirPattern> = Vec::new();
    for item in items {
        if let Some(pattern) = DirPattern::new(item.as_ref()) {
            if !patterns.iter().any(|p| p.raw == pattern.raw) {
                patterns.push(pattern);
            }
        }
    }
    patterns
}

/// Parse user text like `"obj, .FBX; stl"` into normalized extensions.
pub fn parse_extension_list(text: &str) -> BTreeSet<String> {
    normalize_extensions(EXTENSION_SEPARATORS.split(text.trim()))
}

/// Parse comma/semicolon/line separated words. Spaces inside a word are kept.
pub fn parse_word_list(text: &str) -> BTreeSet<String> {
    normalize_words(WORD_SEPARATORS.split(text))
}

/// Parse comma/semicolon/line separated directory patterns, keeping the
/// order they were written in.
pub fn parse_pattern_list(text: &str) -> Vec<String> {
    normalize_dir_patterns(WORD_SEPARATORS.split(text))
        .into_iter()
        .map(|pattern| pattern.raw)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extension_list() {
        let exts = parse_extension_list(" obj, .FBX;stl  e57 ,, ");
        let expected: BTreeSet<String> = ["e57", "fbx", "obj", "stl"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(exts, expected);
    }

    #[test]
    fn test_parse_extension_list_empty() {
        assert!(parse_extension_list("").is_empty());
        assert!(parse_extension_list(" , ; . ").is_empty());
    }

    #[test]
    fn test_parse_word_list_keeps_inner_spaces() {
        let words = parse_word_list("Draft, old copy;\nBACKUP\n\n");
        assert!(words.contains("draft"));
        assert!(words.contains("old copy"));
        assert!(words.contains("backup"));
        assert_eq!(words.len(), 3);
    }

    #[test]
    fn test_parse_pattern_list_keeps_order() {
        let patterns = parse_pattern_list("Scans*, mesh;\nArchive, MESH,,");
        assert_eq!(patterns, vec!["scans*", "mesh", "archive"]);

        let config = FilterConfig::empty().with_dir_patterns(&patterns);
        let raw: Vec<&str> = config
            .excluded_dir_patterns()
            .iter()
            .map(DirPattern::as_str)
            .collect();
        assert_eq!(raw, vec!["scans*", "mesh", "archive"]);
    }

    #[test]
    fn test_default_config() {
        let config = FilterConfig::default();
        assert!(config.excluded_extensions().contains("obj"));
        assert!(config.excluded_extensions().contains("rcs"));
        assert!(config.excluded_names().contains(".ds_store"));
        assert!(!config.has_keywords());
        let patterns: Vec<&str> = config
            .excluded_dir_patterns()
            .iter()
            .map(DirPattern::as_str)
            .collect();
        assert_eq!(patterns, vec!["mesh", "meshes", "pointcloud*", "point cloud*"]);
    }

    #[test]
    fn test_dir_patterns_dedup_preserves_order() {
        let patterns = normalize_dir_patterns(["Mesh", "scans*", "MESH", "  ", "renders"]);
        let raw: Vec<&str> = patterns.iter().map(DirPattern::as_str).collect();
        assert_eq!(raw, vec!["mesh", "scans*", "renders"]);
    }

    #[test]
    fn test_dir_pattern_matching() {
        let exact = DirPattern::new("Mesh").unwrap();
        assert!(!exact.is_wildcard());
        assert!(exact.matches("mesh"));
        assert!(!exact.matches("meshes"));

        let prefix = DirPattern::new("pointcloud*").unwrap();
        assert!(prefix.is_wildcard());
        assert!(prefix.matches("pointcloud_2024"));
        assert!(!prefix.matches("old_pointcloud"));
    }

    #[test]
    fn test_blank_pattern_rejected() {
        assert!(DirPattern::new("   ").is_none());
    }

    #[test]
    fn test_empty_config_has_no_rules() {
        let config = FilterConfig::empty();
        assert!(config.excluded_extensions().is_empty());
        assert!(config.excluded_names().is_empty());
        assert!(config.excluded_dir_patterns().is_empty());
        assert!(config.excluded_keywords().is_empty());
    }

    #[test]
    fn test_builder_normalizes() {
        let config = FilterConfig::empty()
            .with_extensions([".OBJ", "obj", ""])
            .with_keywords(["  Draft ", "draft"]);
        assert_eq!(config.excluded_extensions().len(), 1);
        assert_eq!(config.excluded_keywords().len(), 1);
        assert!(config.has_keywords());
    }
}
