//! Application configuration
//!
//! Stored as JSON in the platform config directory. Environment variables
//! override the file:
//!
//! - `LOGBOOK_CONFIG_PATH` - config file location
//! - `LOGBOOK_API_URL` - backend base URL
//! - `LOGBOOK_API_TOKEN` - bearer token
//! - `LOGBOOK_VEHICLE_ID` - default vehicle

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::services::DueSoonThresholds;

pub const CONFIG_PATH_ENV: &str = "LOGBOOK_CONFIG_PATH";
pub const API_URL_ENV: &str = "LOGBOOK_API_URL";
pub const API_TOKEN_ENV: &str = "LOGBOOK_API_TOKEN";
pub const VEHICLE_ID_ENV: &str = "LOGBOOK_VEHICLE_ID";

/// Keys accepted by `AppConfig::set`
pub const CONFIG_KEYS: [&str; 7] = [
    "api_url",
    "api_token",
    "vehicle_id",
    "timeout_seconds",
    "due_soon_days",
    "due_soon_miles",
    "warning_percent",
];

/// Persisted CLI/library configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub vehicle_id: Option<i64>,
    pub timeout_seconds: u64,
    pub due_soon_days: i64,
    pub due_soon_miles: i64,
    pub warning_percent: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let thresholds = DueSoonThresholds::default();
        Self {
            api_url: "http://localhost:5000".to_string(),
            api_token: None,
            vehicle_id: None,
            timeout_seconds: 30,
            due_soon_days: thresholds.days,
            due_soon_miles: thresholds.miles,
            warning_percent: thresholds.warning_percent,
        }
    }
}

impl AppConfig {
    /// Load from the default path, then apply environment overrides.
    ///
    /// Not validated here; [`LogbookClient::from_config`] validates before
    /// any request is made.
    ///
    /// [`LogbookClient::from_config`]: crate::api::LogbookClient::from_config
    pub fn load() -> Result<Self> {
        let path = get_config_path()?;
        let mut config = Self::read_from(&path)?;
        config.apply_env()?;
        Ok(config)
    }

    /// Load and validate a file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = Self::read_from(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a file without validating its values
    pub fn read_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("[config] No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        log::debug!("[config] Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("[config] Saved config to {}", path.display());
        Ok(())
    }

    /// Apply `LOGBOOK_*` environment overrides
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            self.api_url = url;
        }
        if let Ok(token) = std::env::var(API_TOKEN_ENV) {
            self.api_token = Some(token).filter(|t| !t.is_empty());
        }
        if let Ok(id) = std::env::var(VEHICLE_ID_ENV) {
            self.vehicle_id = Some(parse_value(VEHICLE_ID_ENV, &id)?);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(Error::config(format!(
                "api_url must start with http:// or https:// (got '{}')",
                self.api_url
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(Error::config("timeout_seconds must be greater than zero"));
        }
        if self.due_soon_days < 0 || self.due_soon_miles < 0 {
            return Err(Error::config("due-soon thresholds must be non-negative"));
        }
        if !(0.0..=100.0).contains(&self.warning_percent) {
            return Err(Error::config("warning_percent must be between 0 and 100"));
        }
        Ok(())
    }

    /// Due-soon thresholds for the reminder engine
    pub fn thresholds(&self) -> DueSoonThresholds {
        DueSoonThresholds {
            days: self.due_soon_days,
            miles: self.due_soon_miles,
            warning_percent: self.warning_percent,
        }
    }

    /// Set a value by key, validating the result
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.clone();
        match key {
            "api_url" => updated.api_url = value.trim_end_matches('/').to_string(),
            "api_token" => updated.api_token = Some(value.to_string()).filter(|v| !v.is_empty()),
            "vehicle_id" => {
                updated.vehicle_id = if value.is_empty() {
                    None
                } else {
                    Some(parse_value(key, value)?)
                }
            }
            "timeout_seconds" => updated.timeout_seconds = parse_value(key, value)?,
            "due_soon_days" => updated.due_soon_days = parse_value(key, value)?,
            "due_soon_miles" => updated.due_soon_miles = parse_value(key, value)?,
            "warning_percent" => updated.warning_percent = parse_value(key, value)?,
            _ => {
                return Err(Error::config(format!(
                    "Unknown config key: {}. Available keys: {}",
                    key,
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Display value for a key, with the token masked
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "api_url" => self.api_url.clone(),
            "api_token" => mask_token(&self.api_token),
            "vehicle_id" => self
                .vehicle_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
            "timeout_seconds" => self.timeout_seconds.to_string(),
            "due_soon_days" => self.due_soon_days.to_string(),
            "due_soon_miles" => self.due_soon_miles.to_string(),
            "warning_percent" => self.warning_percent.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// All keys with display values
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }
}

/// Path of the config file
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    let dirs = directories::ProjectDirs::from("com", "logbook", "Logbook")
        .ok_or_else(|| Error::config("Could not determine project directories"))?;

    Ok(dirs.config_dir().join("config.json"))
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("Invalid value for {}: {}", key, value)))
}

fn mask_token(token: &Option<String>) -> String {
    match token {
        Some(t) if !t.is_empty() => "****".to_string(),
        _ => "-".to_string(),
    }
}
