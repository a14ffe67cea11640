//! User configuration and preferences

use crate::error::{ReviewError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Preferences persisted between runs. Every field is optional in the file so
/// older or hand-edited configs keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct UserConfig {
    /// Whether the welcome dialog has been shown
    pub welcome_shown: bool,
    /// Folder the last successful move went to; pre-fills the move prompt
    pub last_destination: Option<PathBuf>,
    /// Folder to review when none is given on the command line
    pub directory: Option<PathBuf>,
    /// Age threshold in hours
    pub hours: Option<u32>,
    pub skip_hidden: Option<bool>,
    /// Path to the ffmpeg executable used for video thumbnails
    pub ffmpeg: Option<PathBuf>,
}

impl UserConfig {
    /// Get the config file path (~/.config/dlreview/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dlreview").join("config.json"))
    }

    /// Load config from the default location, or defaults if there is none yet
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    fn default_path() -> Result<PathBuf> {
        Self::config_path().ok_or_else(|| {
            ReviewError::Config("Could not determine config directory".to_string())
        })
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ReviewError::Config(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| ReviewError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ReviewError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ReviewError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, contents)
            .map_err(|e| ReviewError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
