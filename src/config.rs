//! Application configuration management.
//!
//! This module handles loading and saving the client configuration,
//! which includes the backend base URL and default city/region.
//!
//! Configuration is stored at `~/.config/citylens/config.json`; the
//! `CITYLENS_API_URL` environment variable overrides the stored URL.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for the config directory path
const APP_NAME: &str = "citylens";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Backend base URL used when neither env nor config provides one
const DEFAULT_API_BASE_URL: &str = "https://api.citylens.app";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub default_city: Option<String>,
    pub default_region: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Resolve the backend base URL: env override, then config, then default.
    pub fn api_base_url(&self) -> String {
        if let Ok(url) = std::env::var("CITYLENS_API_URL") {
            if !url.is_empty() {
                return url;
            }
        }
        self.api_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }
}
