// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Skin search locations and persisted preferences.
//!
//! The preferences file is TOML and is only ever read here:
//!
//! ```toml
//! skin = "Landscape"
//! ```
//!
//! A missing file is the same as an empty one. An empty skin name selects
//! the built-in default.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Directory name used under each search root.
pub const APP_DIR: &str = "faceplate";

/// Subdirectory of a shared data directory that may also hold skins.
pub const SKINS_DIR: &str = "skins";

/// Preferences file name inside the private directory.
pub const PREFERENCES_FILE: &str = "preferences.toml";

/// Shared data directories when `XDG_DATA_DIRS` is unset or empty.
pub const DEFAULT_DATA_DIRS: &str = "/usr/local/share:/usr/share";

/// Settings persisted by the application.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Selected skin name.
    pub skin: String,
}

/// Reading the preferences file failed.
#[derive(Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The file is not valid preferences TOML.
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "could not read {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid preferences in {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Where skins come from and which one is selected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostConfig {
    /// Per-user directory searched first. Skins sit directly inside it.
    pub private_dir: PathBuf,
    /// Shared data roots, in search order.
    pub data_dirs: Vec<PathBuf>,
    /// Persisted settings.
    pub preferences: Preferences,
}

impl HostConfig {
    /// Creates a configuration with default preferences.
    #[must_use]
    pub fn new(private_dir: impl Into<PathBuf>, data_dirs: Vec<PathBuf>) -> Self {
        Self {
            private_dir: private_dir.into(),
            data_dirs,
            preferences: Preferences::default(),
        }
    }

    /// Builds the configuration from the user's environment and reads the
    /// preferences file.
    ///
    /// # Errors
    ///
    /// See [`read_preferences`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let private_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);
        let xdg = std::env::var("XDG_DATA_DIRS").ok();
        let mut config = Self::new(private_dir, parse_data_dirs(xdg.as_deref()));
        config.preferences = read_preferences(&config.preferences_path())?;
        Ok(config)
    }

    /// Location of the preferences file.
    #[must_use]
    pub fn preferences_path(&self) -> PathBuf {
        self.private_dir.join(PREFERENCES_FILE)
    }

    /// The selected skin name; empty means the built-in default.
    #[must_use]
    pub fn skin_name(&self) -> &str {
        self.preferences.skin.trim()
    }
}

/// Splits a `XDG_DATA_DIRS`-style list, skipping empty entries.
#[must_use]
pub fn parse_data_dirs(value: Option<&str>) -> Vec<PathBuf> {
    let value = value.filter(|v| !v.is_empty()).unwrap_or(DEFAULT_DATA_DIRS);
    value
        .split(':')
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Reads preferences from `path`. A missing file yields the defaults.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
pub fn read_preferences(path: &Path) -> Result<Preferences, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("no preferences at {}", path.display());
            return Ok(Preferences::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
