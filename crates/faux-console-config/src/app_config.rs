//! Console configuration
//!
//! Configuration loaded from .faux-console.toml file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cookies::CookieOptions;

/// Console configuration loaded from .faux-console.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Prefix put in front of every setting name in durable storage
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// How long stored settings live before they expire
    #[serde(default = "default_expiry_days")]
    pub expiry_days: i64,

    /// Scope path stored with every setting
    #[serde(default = "default_path")]
    pub path: String,

    /// Explicit location of the settings store (defaults to the config dir)
    #[serde(default)]
    pub storage_file: Option<PathBuf>,

    /// Initial number of visible rows in the render surface
    #[serde(default = "default_viewport_height")]
    pub viewport_height: usize,

    /// Share of the terminal height the console view occupies
    #[serde(default = "default_height_percent")]
    pub height_percent: u16,
}

fn default_key_prefix() -> String {
    "Console-".to_string()
}

fn default_expiry_days() -> i64 {
    365 * 10
}

fn default_path() -> String {
    "/".to_string()
}

fn default_viewport_height() -> usize {
    20
}

fn default_height_percent() -> u16 {
    40
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            expiry_days: default_expiry_days(),
            path: default_path(),
            storage_file: None,
            viewport_height: default_viewport_height(),
            height_percent: default_height_percent(),
        }
    }
}

impl ConsoleConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded console config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default console config");
        Self::default()
    }

    /// Storage options derived from this configuration
    pub fn cookie_options(&self) -> CookieOptions {
        CookieOptions {
            expires_in_days: self.expiry_days,
            path: self.path.clone(),
        }
    }
}
