// Shared theme definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two display themes a page can render in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl Default for ThemeMode {
    fn default() -> Self {
        ThemeMode::Light
    }
}

impl ThemeMode {
    pub const ALL: [ThemeMode; 2] = [ThemeMode::Light, ThemeMode::Dark];

    /// The complement of this mode.
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Textual form written to the durable store and the presentation marker.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Parses a stored value. Anything other than the exact tokens is rejected.
    pub fn parse_stored(value: &str) -> Option<Self> {
        match value {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized theme mode {0:?}")]
pub struct ParseThemeModeError(pub String);

impl FromStr for ThemeMode {
    type Err = ParseThemeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_stored(s).ok_or_else(|| ParseThemeModeError(s.to_string()))
    }
}

/// Readiness of the store as seen by a consumer view.
///
/// Views that render while `NotReady` should render with no theme applied
/// rather than guessing, so they never flash the wrong theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeState {
    NotReady,
    Ready(ThemeMode),
}

impl ThemeState {
    pub fn is_ready(self) -> bool {
        matches!(self, ThemeState::Ready(_))
    }

    /// The mode to apply, if any.
    pub fn mode(self) -> Option<ThemeMode> {
        match self {
            ThemeState::Ready(mode) => Some(mode),
            ThemeState::NotReady => None,
        }
    }
}
