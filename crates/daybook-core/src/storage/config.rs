//! TOML-based application configuration.
//!
//! Stores:
//! - Notion API endpoint and request timeout
//! - Time zone used for day/week/month labels
//! - Display names of the calendar databases and their properties
//!
//! Configuration is stored at `~/.config/daybook/config.toml`. The
//! integration secret is not part of it; see [`crate::notion::load_secret`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::notion::client::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Largest page size the query endpoint accepts.
const MAX_BACKFILL_LIMIT: u32 = 100;

/// Notion API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotionConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Display names of the calendar databases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableNames {
    #[serde(default = "default_day_table")]
    pub day: String,
    #[serde(default = "default_week_table")]
    pub week: String,
    #[serde(default = "default_month_table")]
    pub month: String,
    /// Records that get linked to the Day they were created on.
    #[serde(default = "default_links_table")]
    pub links: String,
}

/// Property names used on the calendar databases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyNames {
    #[serde(default = "default_name_property")]
    pub name: String,
    /// Date of a Day record.
    #[serde(default = "default_date_property")]
    pub date: String,
    /// Monday..Sunday range of a Week record.
    #[serde(default = "default_date_range_property")]
    pub date_range: String,
    /// Relation from Day to Week.
    #[serde(default = "default_week_property")]
    pub week: String,
    /// Relation from Day to Month.
    #[serde(default = "default_month_property")]
    pub month: String,
    /// Relation from a link record to its Day.
    #[serde(default = "default_day_property")]
    pub day: String,
}

/// Calendar sync configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// IANA zone name, e.g. "Europe/London".
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Links examined per backfill run (1-100).
    #[serde(default = "default_backfill_limit")]
    pub backfill_limit: u32,
    #[serde(default)]
    pub tables: TableNames,
    #[serde(default)]
    pub properties: PropertyNames,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/daybook/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notion: NotionConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

// Default functions
fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_time_zone() -> String {
    "UTC".into()
}
fn default_backfill_limit() -> u32 {
    100
}
fn default_day_table() -> String {
    "My Days".into()
}
fn default_week_table() -> String {
    "Week".into()
}
fn default_month_table() -> String {
    "Month".into()
}
fn default_links_table() -> String {
    "Resonance Calendar".into()
}
fn default_name_property() -> String {
    "Name".into()
}
fn default_date_property() -> String {
    "Date".into()
}
fn default_date_range_property() -> String {
    "Date Range".into()
}
fn default_week_property() -> String {
    "Week".into()
}
fn default_month_property() -> String {
    "Month".into()
}
fn default_day_property() -> String {
    "Day".into()
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            day: default_day_table(),
            week: default_week_table(),
            month: default_month_table(),
            links: default_links_table(),
        }
    }
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            name: default_name_property(),
            date: default_date_property(),
            date_range: default_date_range_property(),
            week: default_week_property(),
            month: default_month_property(),
            day: default_day_property(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            backfill_limit: default_backfill_limit(),
            tables: TableNames::default(),
            properties: PropertyNames::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notion: NotionConfig::default(),
            calendar: CalendarConfig::default(),
        }
    }
}

impl CalendarConfig {
    /// Parsed [`Self::time_zone`].
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.time_zone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimeZone(self.time_zone.clone()))
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
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot replace a whole section".into()));
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

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Check values that the type system does not.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.calendar.tz()?;
        if !(1..=MAX_BACKFILL_LIMIT).contains(&self.calendar.backfill_limit) {
            return Err(ConfigError::InvalidValue {
                key: "calendar.backfill_limit".into(),
                message: format!("must be between 1 and {MAX_BACKFILL_LIMIT}"),
            });
        }
        if self.notion.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "notion.timeout_secs".into(),
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Load from the data directory or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path` or write and return the default.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: err.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
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

    /// Set a config value by key without persisting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid; the
    /// config is left unchanged in that case.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Client settings for `credential`.
    pub fn client_config(&self, credential: impl Into<String>) -> Result<ClientConfig, ConfigError> {
        Ok(ClientConfig::new(credential)
            .with_time_zone(self.calendar.tz()?)
            .with_base_url(self.notion.base_url.clone())
            .with_timeout(Duration::from_secs(self.notion.timeout_secs)))
    }
}
