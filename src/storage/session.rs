//! Session file persistence
//!
//! Keeps the cookies of the last run on disk so the next run is recognized
//! as a remembered device and skips the second factor.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::error::{PewError, PewResult};
use crate::models::Session;

/// Reads and writes the session file
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved session
    ///
    /// A missing, unreadable, or malformed file is logged and treated as "no
    /// prior session". This never fails.
    pub fn load(&self) -> Session {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                error!(path = %self.path.display(), "Failed to open session file: {}", e);
                return Session::new();
            }
        };

        match serde_json::from_reader::<_, Session>(BufReader::new(file)) {
            Ok(session) => {
                debug!(path = %self.path.display(), cookies = session.len(), "Loaded session");
                session
            }
            Err(e) => {
                error!(path = %self.path.display(), "Failed to parse session file: {}", e);
                Session::new()
            }
        }
    }

    /// Save the session, replacing whatever was there
    ///
    /// Writes to a sibling temp file and renames it over the target so a
    /// crash never leaves a half-written session behind.
    pub fn save(&self, session: &Session) -> PewResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                PewError::Io(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");

        let file = File::create(&temp_path)
            .map_err(|e| PewError::Io(format!("Failed to create temp file: {}", e)))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, session)?;
        writer
            .flush()
            .map_err(|e| PewError::Io(format!("Failed to flush session: {}", e)))?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            PewError::Io(format!("Failed to replace session file: {}", e))
        })?;

        debug!(path = %self.path.display(), cookies = session.len(), "Saved session");
        Ok(())
    }

    /// Forget the saved session. A missing file is not an error.
    ///
    /// Returns whether a file was actually removed.
    pub fn clear(&self) -> PewResult<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(PewError::Io(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
