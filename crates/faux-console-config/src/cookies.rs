//! Cookie-style key-value storage
//!
//! Values are kept as `name=value` pairs with an expiry and a scope path.
//! Reads go through the flat `"a=1; b=2"` representation the same way a
//! browser exposes `document.cookie`, so the lookup rules stay identical
//! regardless of where the pairs are persisted.

use anyhow::Result;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Durable string key-value storage with per-entry expiry
pub trait KeyValueStore: Send {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str, options: &CookieOptions) -> Result<()>;
}

/// Expiry and scope used when writing a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    /// Days from now until the value expires; zero or less deletes it
    pub expires_in_days: i64,
    /// Scope path
    pub path: String,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            expires_in_days: 365 * 10,
            path: "/".to_string(),
        }
    }
}

/// A single stored pair. `value` is kept percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub expires: Option<DateTime<Utc>>,
    pub path: String,
}

impl Cookie {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }
}

/// In-memory cookie store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieJar {
    cookies: Vec<Cookie>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flat representation of all live pairs: `"a=1; b=2"`
    pub fn raw(&self) -> String {
        let now = Utc::now();
        self.cookies
            .iter()
            .filter(|cookie| !cookie.is_expired(now))
            .map(|cookie| format!("{}={}", cookie.name, cookie.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Look up `key` in the flat representation and decode its value
    ///
    /// A pair matches when its name, with surrounding whitespace removed,
    /// equals `key`. Values that fail to decode read as absent.
    pub fn read(&self, key: &str) -> Option<String> {
        let raw = self.raw();

        for pair in raw.split(';') {
            let mut parts = pair.splitn(2, '=');
            let name = parts.next().unwrap_or_default();

            if name.trim() == key || name == format!(" {}", key) {
                let value = parts.next().unwrap_or_default();
                return match urlencoding::decode(value) {
                    Ok(decoded) => Some(decoded.into_owned()),
                    Err(e) => {
                        log::debug!("Ignoring undecodable value for {}: {}", key, e);
                        None
                    }
                };
            }
        }

        None
    }

    /// Apply an assignment such as `"k=v; expires=<date>; path=/;"`
    ///
    /// An assignment whose expiry lies in the past deletes the pair.
    pub fn write(&mut self, assignment: &str) {
        let mut segments = assignment.split(';');

        let Some((name, value)) = segments
            .next()
            .and_then(|pair| pair.split_once('='))
            .map(|(name, value)| (name.trim(), value.trim()))
        else {
            log::debug!("Ignoring malformed cookie assignment");
            return;
        };

        if name.is_empty() {
            return;
        }

        let mut expires = None;
        let mut path = "/".to_string();

        for attribute in segments {
            let Some((key, attr_value)) = attribute.split_once('=') else {
                continue;
            };
            match key.trim().to_ascii_lowercase().as_str() {
                "expires" => {
                    expires = DateTime::parse_from_rfc2822(attr_value.trim())
                        .ok()
                        .map(|date| date.with_timezone(&Utc));
                }
                "path" => path = attr_value.trim().to_string(),
                _ => {}
            }
        }

        let cookie = Cookie {
            name: name.to_string(),
            value: value.to_string(),
            expires,
            path,
        };

        let existing = self
            .cookies
            .iter()
            .position(|c| c.name == cookie.name && c.path == cookie.path);

        if cookie.is_expired(Utc::now()) {
            if let Some(index) = existing {
                self.cookies.remove(index);
            }
            return;
        }

        match existing {
            Some(index) => self.cookies[index] = cookie,
            None => self.cookies.push(cookie),
        }
    }

    /// Build the assignment string for `key=value` with the given options
    pub fn assignment(
        key: &str,
        value: &str,
        options: &CookieOptions,
        now: DateTime<Utc>,
    ) -> String {
        let expires = TimeDelta::try_days(options.expires_in_days)
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        format!(
            "{}={}; expires={}; path={};",
            key,
            urlencoding::encode(value),
            expires.format("%a, %d %b %Y %H:%M:%S GMT"),
            options.path
        )
    }

    /// Drop every pair whose expiry has passed
    pub fn purge_expired(&mut self) {
        let now = Utc::now();
        self.cookies.retain(|cookie| !cookie.is_expired(now));
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

impl KeyValueStore for CookieJar {
    fn get(&self, key: &str) -> Option<String> {
        self.read(key)
    }

    fn set(&mut self, key: &str, value: &str, options: &CookieOptions) -> Result<()> {
        self.write(&Self::assignment(key, value, options, Utc::now()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_jar() {
        let jar = CookieJar::new();
        assert_eq!(jar.raw(), "");
        assert_eq!(jar.get("Console-enabled"), None);
        assert!(jar.is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let mut jar = CookieJar::new();
        jar.set("Console-enabled", "true", &CookieOptions::default())
            .unwrap();
        jar.set("Console-theme", "dark", &CookieOptions::default())
            .unwrap();

        assert_eq!(jar.raw(), "Console-enabled=true; Console-theme=dark");
        assert_eq!(jar.get("Console-enabled").as_deref(), Some("true"));
        assert_eq!(jar.get("Console-theme").as_deref(), Some("dark"));
        assert_eq!(jar.get("Console-saveMessages"), None);
    }

    #[test]
    fn test_set_replaces_existing_value() {
        let mut jar = CookieJar::new();
        let options = CookieOptions::default();
        jar.set("Console-theme", "dark", &options).unwrap();
        jar.set("Console-theme", "light", &options).unwrap();

        assert_eq!(jar.len(), 1);
        assert_eq!(jar.get("Console-theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let mut jar = CookieJar::new();
        jar.set("Console-theme", "solarized; dark=yes", &CookieOptions::default())
            .unwrap();

        assert!(!jar.raw().contains("dark=yes"));
        assert_eq!(
            jar.get("Console-theme").as_deref(),
            Some("solarized; dark=yes")
        );
    }

    #[test]
    fn test_name_must_match_exactly() {
        let mut jar = CookieJar::new();
        jar.write("XConsole-theme=dark; path=/;");

        assert_eq!(jar.get("Console-theme"), None);
        assert_eq!(jar.get("XConsole-theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_undecodable_value_reads_as_absent() {
        let mut jar = CookieJar::new();
        jar.write("Console-theme=%FF%FE; path=/;");

        assert_eq!(jar.get("Console-theme"), None);
    }

    #[test]
    fn test_expired_assignment_deletes() {
        let mut jar = CookieJar::new();
        jar.set("Console-theme", "dark", &CookieOptions::default())
            .unwrap();

        let expired = CookieOptions {
            expires_in_days: -1,
            ..CookieOptions::default()
        };
        jar.set("Console-theme", "dark", &expired).unwrap();

        assert!(jar.is_empty());
        assert_eq!(jar.get("Console-theme"), None);
    }

    #[test]
    fn test_assignment_format() {
        let now = DateTime::parse_from_rfc3339("2015-02-16T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let assignment =
            CookieJar::assignment("Console-enabled", "true", &CookieOptions::default(), now);

        assert!(assignment.starts_with("Console-enabled=true; expires="));
        assert!(assignment.ends_with("GMT; path=/;"));
        assert!(assignment.contains("2025"));
    }

    #[test]
    fn test_write_parses_expiry_and_path() {
        let mut jar = CookieJar::new();
        jar.write("Console-theme=dark; expires=Thu, 01 Jan 2099 00:00:00 GMT; path=/app;");

        assert_eq!(jar.get("Console-theme").as_deref(), Some("dark"));
        assert_eq!(jar.cookies[0].path, "/app");
        assert!(jar.cookies[0].expires.is_some());
    }

    #[test]
    fn test_malformed_assignment_is_ignored() {
        let mut jar = CookieJar::new();
        jar.write("no equals sign here");
        jar.write("=value-without-name");

        assert!(jar.is_empty());
    }
}
