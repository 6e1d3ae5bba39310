//! User settings for pew
//!
//! Everything here has a sensible default, so a missing `config.json` behaves
//! exactly like a freshly initialized one.

use serde::{Deserialize, Serialize};

use super::paths::PewPaths;
use crate::api::TwoFactorMode;
use crate::error::PewError;
use crate::models::{default_buckets, AccountBucket};

/// User settings for pew
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Root of the aggregation service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Page size for the transactions request
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: u32,

    /// How the second factor is delivered when one is needed
    #[serde(default)]
    pub two_factor_mode: TwoFactorMode,

    /// HTTP timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Report buckets, printed in this order
    #[serde(default = "default_buckets")]
    pub buckets: Vec<AccountBucket>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_base_url() -> String {
    "https://home.personalcapital.com".to_string()
}

fn default_rows_per_page() -> u32 {
    100
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            base_url: default_base_url(),
            rows_per_page: default_rows_per_page(),
            two_factor_mode: TwoFactorMode::default(),
            request_timeout_secs: default_request_timeout_secs(),
            buckets: default_buckets(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &PewPaths) -> Result<Self, PewError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - `pew init` decides when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| PewError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| PewError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PewPaths) -> Result<(), PewError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| PewError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| PewError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    fn validate(&self) -> Result<(), PewError> {
        if self.rows_per_page == 0 {
            return Err(PewError::Config("rows_per_page must be at least 1".into()));
        }
        if let Err(e) = url::Url::parse(&self.base_url) {
            return Err(PewError::Config(format!(
                "Invalid base_url '{}': {}",
                self.base_url, e
            )));
        }
        Ok(())
    }
}
