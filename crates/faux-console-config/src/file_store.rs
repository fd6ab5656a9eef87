//! File-backed key-value storage
//!
//! Keeps a [`CookieJar`] in memory and writes it through to a JSON file on
//! every change, so settings survive across sessions.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cookies::{CookieJar, CookieOptions, KeyValueStore};
use crate::paths;

/// Cookie jar persisted to a JSON file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    jar: CookieJar,
}

impl FileStore {
    /// Open the store at the default location in the config directory
    pub fn open_default() -> Result<Self> {
        Self::open(paths::default_storage_path()?)
    }

    /// Open the store at `path`, starting empty when the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let jar = if path.exists() {
            let mut jar = Self::load_from_path(&path)?;
            jar.purge_expired();
            log::info!("Loaded {} stored settings from {:?}", jar.len(), path);
            jar
        } else {
            log::debug!("No settings store at {:?}, starting empty", path);
            CookieJar::new()
        };

        Ok(Self { path, jar })
    }

    fn load_from_path(path: &Path) -> Result<CookieJar> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings store: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings store: {:?}", path))
    }

    fn save_to_path(&self) -> Result<()> {
        let content =
            serde_json::to_string_pretty(&self.jar).context("Failed to serialize settings")?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write settings store: {:?}", self.path))?;

        log::debug!("Saved settings store to {:?}", self.path);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory view of the stored pairs
    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.jar.get(key)
    }

    fn set(&mut self, key: &str, value: &str, options: &CookieOptions) -> Result<()> {
        self.jar.set(key, value, options)?;
        self.save_to_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("cookies.json")).unwrap();

        assert!(store.jar().is_empty());
        assert_eq!(store.get("Console-enabled"), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cookies.json");

        let mut store = FileStore::open(&path).unwrap();
        store
            .set("Console-enabled", "true", &CookieOptions::default())
            .unwrap();
        store
            .set("Console-theme", "dark", &CookieOptions::default())
            .unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("Console-enabled").as_deref(), Some("true"));
        assert_eq!(reopened.get("Console-theme").as_deref(), Some("dark"));
        assert_eq!(reopened.path(), path.as_path());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        fs::write(&path, "not json").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings store"));
    }
}
