//! CLI entry point for cloudtree

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cloudtree::settings::{JsonSettingsStore, Settings, SettingsStore};
use cloudtree::tree::{
    DEFAULT_EXCLUDED_DIR_PATTERNS, parse_extension_list, parse_pattern_list, parse_word_list,
};
use cloudtree::{
    FilterConfig, SnapshotRequest, WalkerConfig, default_label, default_out_dir, print_summary,
    run_snapshot_with_progress,
};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "cloudtree")]
#[command(about = "Filtered tree + TSV index snapshots of a directory")]
#[command(version)]
struct Args {
    /// Root folder to snapshot (defaults to the remembered root)
    root: Option<PathBuf>,

    /// Label used in output filenames (default: basename of root)
    #[arg(long)]
    label: Option<String>,

    /// Output directory for snapshots
    #[arg(short, long = "out", value_name = "DIR")]
    out: Option<PathBuf>,

    /// Comma/space separated extensions to exclude (example: "obj, fbx")
    #[arg(long = "exclude-exts", value_name = "LIST")]
    exclude_exts: Option<String>,

    /// Comma/line separated words to exclude from names (case-insensitive)
    #[arg(long = "exclude-words", value_name = "LIST")]
    exclude_words: Option<String>,

    /// Comma separated directory names or prefixes ("scans*") to prune.
    /// Replaces the default mesh/point cloud patterns.
    #[arg(long = "exclude-dirs", value_name = "LIST")]
    exclude_dirs: Option<String>,

    /// Descend only N levels deep
    #[arg(short = 'L', long = "level")]
    level: Option<usize>,

    /// Skip the tree listing
    #[arg(long = "no-tree", conflicts_with = "no_index")]
    no_tree: bool,

    /// Skip the TSV file index
    #[arg(long = "no-index")]
    no_index: bool,

    /// Always render the tree in-process instead of calling the `tree` utility
    #[arg(long = "no-external")]
    no_external: bool,

    /// Descend into symlinked directories (each target at most once)
    #[arg(long = "follow-symlinks")]
    follow_symlinks: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Remember these settings for the next run
    #[arg(long, conflicts_with = "forget")]
    remember: bool,

    /// Clear remembered settings before running
    #[arg(long)]
    forget: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable logging
    #[arg(short, long)]
    quiet: bool,
}

fn setup_logging(quiet: bool, verbose: u8) {
    let level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
    log::trace!("logger initialized with level {:?}", level);
}

fn main() {
    let args = Args::parse();
    setup_logging(args.quiet, args.verbose);
    log::debug!("args: {:?}", args);

    let exit_code = match run(&args) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            eprintln!("cloudtree: {:#}", e);
            1
        }
    };
    process::exit(exit_code);
}

/// Returns whether every requested artifact was written.
fn run(args: &Args) -> Result<bool> {
    let store = match JsonSettingsStore::default_location() {
        Ok(store) => Some(store),
        Err(e) => {
            log::warn!("settings unavailable: {}", e);
            None
        }
    };

    if args.forget {
        if let Some(store) = &store {
            store.clear().context("failed to clear remembered settings")?;
        }
    }

    let saved = match &store {
        Some(store) if !args.forget => store.load().unwrap_or_else(|e| {
            log::warn!("ignoring saved settings: {}", e);
            Settings::default()
        }),
        _ => Settings::default(),
    };
    let remembered = saved.remember_settings.then_some(&saved);

    let root = args
        .root
        .clone()
        .or_else(|| remembered.and_then(Settings::root))
        .context("no root folder given (pass ROOT or run once with --remember)")?;
    let root = absolute(&root)?;

    let label = args
        .label
        .clone()
        .or_else(|| remembered.and_then(|s| s.label().map(str::to_string)))
        .unwrap_or_else(|| default_label(&root));
    let out_dir = match args.out.clone().or_else(|| remembered.and_then(Settings::out_dir)) {
        Some(dir) => absolute(&dir)?,
        None => default_out_dir(),
    };

    let exts_text = args
        .exclude_exts
        .clone()
        .or_else(|| remembered.map(|s| s.exclude_exts.clone()));
    let words_text = args
        .exclude_words
        .clone()
        .or_else(|| remembered.map(|s| s.exclude_words.clone()));
    let level = args.level.or_else(|| remembered.and_then(|s| s.last_depth));

    let mut filters = FilterConfig::default();
    if let Some(text) = &exts_text {
        filters = filters.with_extensions(parse_extension_list(text));
    }
    if let Some(text) = &words_text {
        filters = filters.with_keywords(parse_word_list(text));
    }
    filters = match &args.exclude_dirs {
        Some(text) => filters.with_dir_patterns(parse_pattern_list(text)),
        None => filters.with_dir_patterns(DEFAULT_EXCLUDED_DIR_PATTERNS),
    };

    let mut request = SnapshotRequest::new(&root, &out_dir, label.clone());
    request.filters = filters;
    request.walker = WalkerConfig {
        max_depth: level,
        follow_symlinks: args.follow_symlinks,
        cancel: None,
    };
    request.write_tree = !args.no_tree;
    request.write_index = !args.no_index;
    request.prefer_external = !args.no_external;

    let report = run_snapshot_with_progress(&request, |stage| log::info!("{}", stage))
        .with_context(|| format!("snapshot of '{}' failed", root.display()))?;

    if args.remember {
        if let Some(store) = &store {
            let settings = Settings {
                last_root: root.display().to_string(),
                last_label: label,
                last_out: out_dir.display().to_string(),
                last_depth: level,
                last_do_tree: request.write_tree,
                last_do_tsv: request.write_index,
                exclude_exts: exts_text.unwrap_or_else(|| Settings::default().exclude_exts),
                exclude_words: words_text.unwrap_or_default(),
                remember_settings: true,
            };
            if let Err(e) = store.save(&settings) {
                log::warn!("could not remember settings: {}", e);
            }
        }
    }

    print_summary(&report, should_use_color(args.color)).context("failed to print summary")?;
    Ok(report.is_complete())
}

/// Resolve `path` against the working directory, following symlinks when it exists.
fn absolute(path: &Path) -> Result<PathBuf> {
    if let Ok(resolved) = path.canonicalize() {
        return Ok(resolved);
    }
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("cannot read the current directory")?;
    Ok(cwd.join(path))
}
