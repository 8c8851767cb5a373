// Theme store configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const PREFS_PATH_ENV: &str = "TOOLSHELF_PREFS";
pub const THEME_KEY_ENV: &str = "TOOLSHELF_THEME_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ThemeConfig {
    /// Key of the durable entry holding the mode.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// File backing the durable store.
    #[serde(default = "default_prefs_path")]
    pub prefs_path: PathBuf,
    /// Attribute set on the root presentation node.
    #[serde(default = "default_marker_attribute")]
    pub marker_attribute: String,
    /// Also mark the root node with a `light` / `dark` class.
    #[serde(default = "default_true")]
    pub class_marker: bool,
}

fn default_storage_key() -> String {
    "theme".to_string()
}

fn default_prefs_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".toolshelf_prefs.json")
}

fn default_marker_attribute() -> String {
    "data-theme".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            prefs_path: default_prefs_path(),
            marker_attribute: default_marker_attribute(),
            class_marker: true,
        }
    }
}

impl ThemeConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Reads a JSON config file; missing fields take their defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(PREFS_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            self.prefs_path = PathBuf::from(path);
        }
        if let Some(key) = lookup(THEME_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.storage_key = key;
        }
        self
    }
}
