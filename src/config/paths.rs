//! Path management for pew
//!
//! ## Path Resolution Order
//!
//! 1. `PEW_CAPITAL_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/pew-capital` or `~/.config/pew-capital`
//! 3. Windows: `%APPDATA%\pew-capital`
//!
//! The session file is not kept here. It defaults to `session.json` in the
//! working directory so different checkouts can hold different logins.

use std::path::{Path, PathBuf};

use crate::error::PewError;

/// Default session file name, relative to the working directory
pub const DEFAULT_SESSION_FILE: &str = "session.json";

/// Manages the paths used by pew
#[derive(Debug, Clone)]
pub struct PewPaths {
    base_dir: PathBuf,
}

impl PewPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home or config directory can be determined.
    pub fn new() -> Result<Self, PewError> {
        let base_dir = match std::env::var("PEW_CAPITAL_DATA_DIR") {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create PewPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn ensure_directories(&self) -> Result<(), PewError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PewError::Io(format!("Failed to create config directory: {}", e)))
    }

    /// Check if `pew init` has been run
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, PewError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                PewError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("pew-capital"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, PewError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| PewError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("pew-capital"))
}
