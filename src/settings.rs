//! Remembered front-end settings
//!
//! The snapshot core never touches these. Front-ends load them to prefill
//! their inputs and save them after a successful run.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::tree::DEFAULT_EXCLUDED_EXTS;

const APP_DIR: &str = "CloudTree";
const SETTINGS_FILE: &str = "config.json";

/// Values a front-end remembers between sessions.
///
/// Filter lists are stored as the text the user typed, so they round-trip
/// through the same parsing as fresh input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub last_root: String,
    pub last_label: String,
    pub last_out: String,
    pub last_depth: Option<usize>,
    pub last_do_tree: bool,
    pub last_do_tsv: bool,
    pub exclude_exts: String,
    pub exclude_words: String,
    pub remember_settings: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let mut exts: Vec<&str> = DEFAULT_EXCLUDED_EXTS.to_vec();
        exts.sort_unstable();
        Self {
            last_root: String::new(),
            last_label: String::new(),
            last_out: String::new(),
            last_depth: None,
            last_do_tree: true,
            last_do_tsv: true,
            exclude_exts: exts.join(", "),
            exclude_words: String::new(),
            remember_settings: false,
        }
    }
}

impl Settings {
    fn non_empty(value: &str) -> Option<&str> {
        let value = value.trim();
        (!value.is_empty()).then_some(value)
    }

    pub fn root(&self) -> Option<PathBuf> {
        Self::non_empty(&self.last_root).map(PathBuf::from)
    }

    pub fn label(&self) -> Option<&str> {
        Self::non_empty(&self.last_label)
    }

    pub fn out_dir(&self) -> Option<PathBuf> {
        Self::non_empty(&self.last_out).map(PathBuf::from)
    }
}

/// Persistence for [`Settings`], owned by a front-end.
pub trait SettingsStore {
    /// Missing settings are not an error; they load as defaults.
    fn load(&self) -> Result<Settings, SettingsError>;
    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

/// Pretty-printed JSON file store.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/CloudTree/config.json`
    pub fn default_location() -> Result<Self, SettingsError> {
        let dir = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(Self::new(dir.join(APP_DIR).join(SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the stored file. Succeeds if there is nothing to remove.
    pub fn clear(&self) -> Result<(), SettingsError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SettingsError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Settings, SettingsError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Settings::default()),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        Ok(serde_json::from_str(&text)?)
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let write_err = |source| SettingsError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json + "\n").map_err(write_err)
    }
}
