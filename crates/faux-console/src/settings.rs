//! Persistent console settings
//!
//! Every setting has a statically known default. Stored values are strings
//! and are coerced back to the type of the default on load; anything
//! missing falls back to the default.

use faux_console_config::{ConsoleConfig, CookieJar, CookieOptions, KeyValueStore};

use crate::message::format_number;

pub const ENABLED: &str = "enabled";
pub const THEME: &str = "theme";
pub const SAVE_MESSAGES: &str = "saveMessages";

/// A typed setting value
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl SettingValue {
    /// Coerce a stored string to the same type as `self`
    pub fn coerce(&self, raw: &str) -> SettingValue {
        match self {
            SettingValue::Bool(_) => SettingValue::Bool(raw == "true"),
            SettingValue::Number(_) => SettingValue::Number(parse_number(raw)),
            SettingValue::Text(_) => SettingValue::Text(raw.to_string()),
        }
    }

    /// String form written to storage
    pub fn to_stored(&self) -> String {
        match self {
            SettingValue::Bool(value) => value.to_string(),
            SettingValue::Number(value) => format_number(*value),
            SettingValue::Text(value) => value.clone(),
        }
    }
}

/// Numeric parse with JavaScript `Number()` rules: surrounding whitespace
/// is ignored, blank input is zero, anything unparsable is NaN.
pub fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();

    match trimmed {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust accepts "inf"/"nan" spellings that Number() rejects
        _ if trimmed
            .chars()
            .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') =>
        {
            f64::NAN
        }
        _ => trimmed.parse().unwrap_or(f64::NAN),
    }
}

/// The persisted console preferences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub enabled: bool,
    pub theme: String,
    pub save_messages: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: false,
            theme: "default".to_string(),
            save_messages: false,
        }
    }
}

impl Settings {
    /// Declared setting names, in storage order
    pub const KEYS: [&'static str; 3] = [ENABLED, THEME, SAVE_MESSAGES];

    pub fn get(&self, key: &str) -> Option<SettingValue> {
        match key {
            ENABLED => Some(SettingValue::Bool(self.enabled)),
            THEME => Some(SettingValue::Text(self.theme.clone())),
            SAVE_MESSAGES => Some(SettingValue::Bool(self.save_messages)),
            _ => None,
        }
    }

    /// Assign a setting; unknown keys and mismatched types are ignored
    pub fn set(&mut self, key: &str, value: SettingValue) {
        match (key, value) {
            (ENABLED, SettingValue::Bool(value)) => self.enabled = value,
            (THEME, SettingValue::Text(value)) => self.theme = value,
            (SAVE_MESSAGES, SettingValue::Bool(value)) => self.save_messages = value,
            (key, value) => log::debug!("Ignoring setting {} = {:?}", key, value),
        }
    }
}

/// Reads and writes [`Settings`] through a key-value store
pub struct SettingsStore {
    store: Box<dyn KeyValueStore>,
    prefix: String,
    options: CookieOptions,
}

impl SettingsStore {
    pub fn new(
        store: Box<dyn KeyValueStore>,
        prefix: impl Into<String>,
        options: CookieOptions,
    ) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            options,
        }
    }

    /// Store keyed and scoped according to `config`
    pub fn from_config(store: Box<dyn KeyValueStore>, config: &ConsoleConfig) -> Self {
        Self::new(store, config.key_prefix.clone(), config.cookie_options())
    }

    /// Non-durable store with the default prefix and options
    pub fn in_memory() -> Self {
        Self::from_config(Box::new(CookieJar::new()), &ConsoleConfig::default())
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Raw stored string for a setting name, if one was ever written
    pub fn stored(&self, key: &str) -> Option<String> {
        self.store.get(&self.storage_key(key))
    }

    /// Load settings, merging stored values over the defaults
    pub fn load(&self) -> Settings {
        let defaults = Settings::default();
        let mut settings = defaults.clone();

        for key in Settings::KEYS {
            let Some(default) = defaults.get(key) else {
                continue;
            };

            if let Some(raw) = self.stored(key) {
                settings.set(key, default.coerce(&raw));
            }
        }

        settings
    }

    /// Write settings through to storage
    ///
    /// A setting that was never stored and still holds its default is skipped.
    pub fn save(&mut self, settings: &Settings) {
        let defaults = Settings::default();

        for key in Settings::KEYS {
            let Some(value) = settings.get(key) else {
                continue;
            };

            let storage_key = self.storage_key(key);

            if self.store.get(&storage_key).is_none()
                && defaults.get(key) == Some(value.clone())
            {
                continue;
            }

            if let Err(e) = self
                .store
                .set(&storage_key, &value.to_stored(), &self.options)
            {
                log::warn!("Failed to persist setting {}: {:#}", storage_key, e);
            }
        }
    }
}
