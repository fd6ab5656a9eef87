//! Configuration and data directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/faux-console/`
//! - macOS: `~/Library/Application Support/faux-console/`
//! - Windows: `%APPDATA%\faux-console\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "faux-console";
const STORAGE_FILE: &str = "cookies.json";

/// Get the application config directory and ensure it exists
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
    Ok(dir)
}

/// Get path to the default durable settings store
pub fn default_storage_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(STORAGE_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_path_is_in_config_dir() {
        // Some CI sandboxes have no config directory at all
        if let Ok(path) = default_storage_path() {
            assert!(path.ends_with(STORAGE_FILE));
            assert!(path.parent().unwrap().ends_with(APP_NAME));
        }
    }
}
