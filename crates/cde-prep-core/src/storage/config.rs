//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default phase durations used to pre-fill and reset the form
//! - Calendar export endpoint and entry length
//! - Form strictness
//! - Offline shell cache name and precache list
//!
//! Configuration is stored at `~/.config/cde-prep/config.toml`. Scheduled
//! events are never written here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::calendar_link::{CalendarLinkBuilder, DEFAULT_CALENDAR_BASE_URL, DEFAULT_WINDOW_MINUTES};
use crate::error::{ConfigError, LinkError};
use crate::offline::{ShellConfig, DEFAULT_CACHE_NAME, DEFAULT_PRECACHE};
use crate::phase::PrepDurations;

/// Default phase durations in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_warm_up")]
    pub warm_up: u32,
    #[serde(default = "default_tacking")]
    pub tacking: u32,
    #[serde(default = "default_grooming")]
    pub grooming: u32,
}

/// Calendar export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Length of the exported entry.
    #[serde(default = "default_window_minutes")]
    pub window_minutes: u32,
}

/// Form behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormConfig {
    /// Reject unparseable duration input instead of keeping the previous value.
    #[serde(default)]
    pub strict_numbers: bool,
}

/// Offline shell configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineConfig {
    #[serde(default = "default_cache_name")]
    pub cache_name: String,
    #[serde(default = "default_precache")]
    pub precache: Vec<String>,
    /// Activate a freshly installed shell without waiting.
    #[serde(default = "default_skip_waiting")]
    pub skip_waiting: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/cde-prep/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub offline: OfflineConfig,
}

// Default functions
fn default_warm_up() -> u32 {
    30
}
fn default_tacking() -> u32 {
    10
}
fn default_grooming() -> u32 {
    10
}
fn default_base_url() -> String {
    DEFAULT_CALENDAR_BASE_URL.into()
}
fn default_window_minutes() -> u32 {
    DEFAULT_WINDOW_MINUTES
}
fn default_cache_name() -> String {
    DEFAULT_CACHE_NAME.into()
}
fn default_precache() -> Vec<String> {
    DEFAULT_PRECACHE.iter().map(|s| s.to_string()).collect()
}
fn default_skip_waiting() -> bool {
    true
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            warm_up: default_warm_up(),
            tacking: default_tacking(),
            grooming: default_grooming(),
        }
    }
}

impl DefaultsConfig {
    pub fn durations(&self) -> PrepDurations {
        PrepDurations::new(self.warm_up, self.tacking, self.grooming)
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            window_minutes: default_window_minutes(),
        }
    }
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            cache_name: default_cache_name(),
            precache: default_precache(),
            skip_waiting: default_skip_waiting(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u32>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/cde-prep"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails [`Config::validate`]. `self` is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check values that the type system does not.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.calendar_link_builder()
            .map_err(|e| ConfigError::InvalidValue {
                key: "calendar.base_url".into(),
                message: e.to_string(),
            })?;
        if self.calendar.window_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "calendar.window_minutes".into(),
                message: "must be at least one minute".into(),
            });
        }
        if self.offline.cache_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "offline.cache_name".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }

    pub fn calendar_link_builder(&self) -> Result<CalendarLinkBuilder, LinkError> {
        Ok(CalendarLinkBuilder::new(&self.calendar.base_url)?
            .with_window_minutes(self.calendar.window_minutes))
    }

    /// Offline shell settings for an app served from `origin`.
    pub fn shell_config(&self, origin: &str) -> ShellConfig {
        ShellConfig {
            origin: origin.to_string(),
            cache_name: self.offline.cache_name.clone(),
            precache: self.offline.precache.clone(),
            skip_waiting: self.offline.skip_waiting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.defaults.warm_up, 30);
        assert_eq!(parsed.calendar.base_url, DEFAULT_CALENDAR_BASE_URL);
        assert_eq!(parsed.offline.precache.len(), 5);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[defaults]\nwarm_up = 45\n").unwrap();
        assert_eq!(parsed.defaults.durations(), PrepDurations::new(45, 10, 10));
        assert_eq!(parsed.calendar.window_minutes, 60);
        assert!(!parsed.form.strict_numbers);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("defaults.tacking").as_deref(), Some("10"));
        assert_eq!(cfg.get("form.strict_numbers").as_deref(), Some("false"));
        assert_eq!(
            cfg.get("offline.cache_name").as_deref(),
            Some("cde-event-prep-cache-v1")
        );
        assert!(cfg.get("defaults.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("defaults.grooming", "25").unwrap();
        cfg.set("form.strict_numbers", "true").unwrap();
        cfg.set("calendar.base_url", "https://calendar.google.com/calendar/render")
            .unwrap();
        cfg.set("offline.precache", r#"["/", "/offline.html"]"#).unwrap();
        assert_eq!(cfg.defaults.grooming, 25);
        assert!(cfg.form.strict_numbers);
        assert_eq!(cfg.calendar.base_url, "https://calendar.google.com/calendar/render");
        assert_eq!(cfg.offline.precache, vec!["/", "/offline.html"]);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("defaults.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_values_and_leaves_config_unchanged() {
        let mut cfg = Config::default();
        assert!(cfg.set("defaults.warm_up", "-5").is_err());
        assert!(cfg.set("form.strict_numbers", "maybe").is_err());
        assert!(cfg.set("calendar.base_url", "not a url").is_err());
        assert!(cfg.set("calendar.window_minutes", "0").is_err());
        assert_eq!(cfg.defaults.warm_up, 30);
        assert_eq!(cfg.calendar.base_url, DEFAULT_CALENDAR_BASE_URL);
        assert_eq!(cfg.calendar.window_minutes, 60);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.defaults.warm_up, 30);
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("calendar.window_minutes", "90").unwrap();
        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.calendar.window_minutes, 90);
    }

    #[test]
    fn load_from_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "defaults = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn builder_follows_calendar_section() {
        let mut cfg = Config::default();
        cfg.set("calendar.window_minutes", "30").unwrap();
        assert_eq!(cfg.calendar_link_builder().unwrap().window_minutes(), 30);
    }

    #[test]
    fn shell_config_follows_offline_section() {
        let mut cfg = Config::default();
        assert_eq!(
            cfg.shell_config("https://cde-prep.test"),
            ShellConfig::new("https://cde-prep.test")
        );

        cfg.set("offline.cache_name", "cde-event-prep-cache-v2").unwrap();
        cfg.set("offline.skip_waiting", "false").unwrap();
        let shell = cfg.shell_config("https://cde-prep.test");
        assert_eq!(shell.cache_name, "cde-event-prep-cache-v2");
        assert!(!shell.skip_waiting);
        assert_eq!(shell.precache, cfg.offline.precache);
    }
}
