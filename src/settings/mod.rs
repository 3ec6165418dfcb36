//! User settings for strata.
//!
//! Settings live in a TOML file at `~/.strata/settings.toml` (or
//! `%LOCALAPPDATA%\strata\settings.toml` on Windows) and adjust how builds
//! interact with the environment without touching any project descriptor:
//! where the local store lives and which repository URLs are overridden.
//!
//! A missing settings file is normal; the defaults apply. A file that
//! exists but cannot be read or parsed is a hard error for every operation
//! that needs repositories, never silently ignored.
//!
//! # File Format
//!
//! ```toml
//! # Move the store off the home directory
//! store-path = "~/build/strata-store"
//!
//! # Redirect repository ids declared in descriptors to other URLs,
//! # e.g. to an internal mirror of central
//! [overrides]
//! central = "https://mirror.internal.example/store"
//! ```
//!
//! Path and URL values run through shell expansion, so `~` and `$HOME`
//! work in both fields.
//!
//! # Location Override
//!
//! `STRATA_SETTINGS_PATH` points builds at another settings file, and
//! `STRATA_STORE_PATH` overrides the store location regardless of what the
//! settings file says. Both are primarily for tests and CI sandboxes.

use crate::constants::{SETTINGS_PATH_ENV, STORE_PATH_ENV};
use crate::core::error::StrataError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parsed settings file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    /// Root directory of the local store. Defaults to `~/.strata/store`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<String>,

    /// Repository URL overrides keyed by repository id.
    ///
    /// When a descriptor declares a repository whose id appears here, the
    /// override URL replaces the declared one. This is how a build is
    /// pointed at a mirror without editing descriptors.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, String>,
}

impl Settings {
    /// Load settings from the default location.
    ///
    /// Returns defaults when no settings file exists.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::SettingsLoad`] when the default path cannot
    /// be determined or the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, StrataError> {
        let path = Self::default_path()?;
        if path.exists() { Self::load_from(&path) } else { Ok(Self::default()) }
    }

    /// Load settings from a specific file.
    ///
    /// Unlike [`Settings::load`], the file must exist: callers naming an
    /// explicit path get an error rather than silent defaults when it is
    /// missing.
    pub fn load_from(path: &Path) -> Result<Self, StrataError> {
        let content = std::fs::read_to_string(path).map_err(|e| StrataError::SettingsLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let settings: Self =
            toml::from_str(&content).map_err(|e| StrataError::SettingsLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        debug!(path = %path.display(), overrides = settings.overrides.len(), "loaded settings");
        Ok(settings)
    }

    /// The settings file location for this environment.
    ///
    /// `STRATA_SETTINGS_PATH` wins; otherwise the platform default.
    pub fn default_path() -> Result<PathBuf, StrataError> {
        if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
            return Ok(PathBuf::from(shellexpand::tilde(&path).into_owned()));
        }

        let base = if cfg!(target_os = "windows") {
            dirs::data_local_dir().ok_or_else(|| StrataError::SettingsLoad {
                path: "settings.toml".to_string(),
                reason: "unable to determine local data directory".to_string(),
            })?
        } else {
            dirs::home_dir().ok_or_else(|| StrataError::SettingsLoad {
                path: "settings.toml".to_string(),
                reason: "unable to determine home directory".to_string(),
            })?
        };

        Ok(base.join(".strata").join("settings.toml"))
    }

    /// The store root these settings select.
    ///
    /// Precedence: `STRATA_STORE_PATH`, then the `store-path` field, then
    /// `~/.strata/store`.
    pub fn store_root(&self) -> Result<PathBuf, StrataError> {
        if let Ok(path) = std::env::var(STORE_PATH_ENV) {
            return Ok(PathBuf::from(shellexpand::tilde(&path).into_owned()));
        }

        if let Some(configured) = &self.store_path {
            return Ok(PathBuf::from(shellexpand::tilde(configured).into_owned()));
        }

        let home = dirs::home_dir().ok_or_else(|| StrataError::SettingsLoad {
            path: "settings.toml".to_string(),
            reason: "unable to determine home directory for the default store".to_string(),
        })?;
        Ok(home.join(".strata").join("store"))
    }

    /// The override URL for a repository id, shell-expanded, if one is set.
    #[must_use]
    pub fn url_override(&self, id: &str) -> Option<String> {
        self.overrides.get(id).map(|url| shellexpand::tilde(url).into_owned())
    }
}
