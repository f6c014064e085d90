//! Application configuration
//!
//! Stored with confy as TOML in the platform config directory under
//! [`APP_NAME`]. Split settings live in their own table so they can be shared
//! with the handlers as `Arc<RwLock<SplitSettings>>`.

use std::path::PathBuf;

use cs3split_types::SplitSettings;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

pub const APP_NAME: &str = "cs3split";

/// Tick period when none is configured (roughly 60 ticks per second).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 16;

/// Segments in a full run when none is configured.
pub const DEFAULT_SEGMENT_COUNT: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Console log written by the game. Empty when not configured.
    pub log_path: String,
    /// `encoding_rs` label used to decode the log.
    pub log_encoding: String,
    pub tick_interval_ms: u64,
    pub segment_count: usize,
    pub settings: SplitSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_path: String::new(),
            log_encoding: "utf-8".to_string(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            segment_count: DEFAULT_SEGMENT_COUNT,
            settings: SplitSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load the stored config, falling back to defaults if it cannot be read.
    pub fn load() -> Self {
        Self::try_load().unwrap_or_else(|e| {
            warn!(error = %e, "Using default config");
            Self::default()
        })
    }

    pub fn try_load() -> Result<Self, ConfigError> {
        confy::load(APP_NAME, None).map_err(ConfigError::Load)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, None, self).map_err(ConfigError::Store)
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        confy::get_configuration_file_path(APP_NAME, None).map_err(ConfigError::Path)
    }

    /// Configured log path, if any.
    pub fn log_path(&self) -> Option<PathBuf> {
        let trimmed = self.log_path.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }
}

/// Default directory for the application's own rolling log files.
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join(APP_NAME).join("logs"))
}
