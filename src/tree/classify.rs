//! Per-entry exclusion decisions

use std::path::Path;

use super::filter::FilterConfig;

/// Finder metadata files are never part of a snapshot.
const SENTINEL_NAME: &str = ".ds_store";

/// Point-cloud folders are pruned regardless of configured patterns.
const POINT_CLOUD_PREFIX: &str = "pointcloud";

/// Decide whether an entry is filtered out.
///
/// Rules are checked in order and the first match wins:
/// sentinel/excluded names, directory patterns, file extensions, keywords.
/// `full_path` is only used to read the extension, so a name without a dot
/// simply never matches the extension rule.
pub fn should_exclude(
    entry_name: &str,
    is_directory: bool,
    full_path: &Path,
    config: &FilterConfig,
) -> bool {
    let name = entry_name.trim().to_lowercase();

    if name == SENTINEL_NAME || config.excluded_names().contains(&name) {
        return true;
    }

    if is_directory && is_excluded_dir_name(&name, config) {
        return true;
    }

    if !is_directory && has_excluded_extension(full_path, config) {
        return true;
    }

    contains_keyword(&name, config)
}

fn is_excluded_dir_name(lowered: &str, config: &FilterConfig) -> bool {
    if config
        .excluded_dir_patterns()
        .iter()
        .any(|pattern| pattern.matches(lowered))
    {
        return true;
    }

    let compact: String = lowered.chars().filter(|c| !c.is_whitespace()).collect();
    compact.starts_with(POINT_CLOUD_PREFIX)
}

fn has_excluded_extension(path: &Path, config: &FilterConfig) -> bool {
    if config.excluded_extensions().is_empty() {
        return false;
    }
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| config.excluded_extensions().contains(&ext))
}

fn contains_keyword(lowered: &str, config: &FilterConfig) -> bool {
    config
        .excluded_keywords()
        .iter()
        .any(|word| lowered.contains(word.as_str()))
}
