//! Configuration and durable storage for faux-console
//!
//! This crate provides:
//! - Directory and file path utilities
//! - Configuration file loading (TOML)
//! - Console configuration (ConsoleConfig)
//! - Cookie-style key-value storage, in memory and file-backed

pub mod app_config;
pub mod config_file;
pub mod cookies;
pub mod file_store;
pub mod paths;

pub use app_config::ConsoleConfig;
pub use config_file::load_config_file;
pub use cookies::{CookieJar, CookieOptions, KeyValueStore};
pub use file_store::FileStore;
pub use paths::{config_dir, default_storage_path};
