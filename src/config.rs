//! Application configuration
//!
//! Stored as JSON in ~/.config/daybook/config.json by default:
//! ```text
//! { "store_path": "/home/me/.local/share/daybook/store.json", "utc_offset_minutes": 60 }
//! ```

use crate::{Error, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const MAX_OFFSET_MINUTES: i32 = 24 * 60 - 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backing file of the blob store
    pub store_path: PathBuf,
    /// Fixed UTC offset that defines calendar days
    pub utc_offset_minutes: i32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store_path: Self::default_store_path(),
            utc_offset_minutes: 0,
        }
    }
}

impl Config {
    /// ~/.config/daybook/config.json, or ./daybook-config.json without a config dir
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("daybook").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("daybook-config.json"))
    }

    /// ~/.local/share/daybook/store.json, or ./daybook.json without a data dir
    pub fn default_store_path() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join("daybook").join("store.json"))
            .unwrap_or_else(|| PathBuf::from("daybook.json"))
    }

    /// Load a config file; a missing file yields the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(Error::Config(format!(
                "utc_offset_minutes must be within ±{}, got {}",
                MAX_OFFSET_MINUTES, self.utc_offset_minutes
            )));
        }
        Ok(())
    }

    /// The time zone that defines calendar days
    pub fn zone(&self) -> Result<FixedOffset> {
        self.validate()?;
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            Error::Config(format!("Invalid UTC offset: {}", self.utc_offset_minutes))
        })
    }
}
