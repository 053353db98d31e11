//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Display units for temperature and wind
//! - Forecast location and horizon
//! - The alignment acceptance window
//! - Rain classification thresholds
//! - Notification preferences
//!
//! Configuration is stored at `~/.config/weatherslot/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::align::{AcceptancePolicy, Aligner};
use crate::error::{ConfigError, CoreError};
use crate::rain::{RainClassifier, RainThresholds};
use crate::units::{DisplayUnits, TemperatureUnit, WindUnit};

pub const MAX_FORECAST_DAYS: u32 = 16;
const CACHE_MINUTES_RANGE: (u32, u32) = (10, 120);
const CHECK_INTERVAL_RANGE: (u32, u32) = (5, 1440);

/// Display units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitsConfig {
    #[serde(default)]
    pub temperature: TemperatureUnit,
    #[serde(default)]
    pub wind: WindUnit,
}

/// Where to fetch the forecast for. Explicit coordinates skip geocoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_city")]
    pub name: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastConfig {
    #[serde(default = "default_forecast_days")]
    pub days: u32,
    /// How long a cached forecast is reused before refetching.
    #[serde(default = "default_cache_minutes")]
    pub cache_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Largest accepted distance between slot start and sample. 0 disables the window.
    #[serde(default = "default_window_minutes")]
    pub window_minutes: u32,
}

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub rain_alerts: bool,
    #[serde(default = "default_check_interval")]
    pub check_interval_minutes: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/weatherslot/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub units: UnitsConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub alignment: AlignmentConfig,
    #[serde(default)]
    pub rain: RainThresholds,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

// Default functions
fn default_city() -> String {
    "Bucharest".into()
}
fn default_forecast_days() -> u32 {
    7
}
fn default_cache_minutes() -> u32 {
    30
}
fn default_window_minutes() -> u32 {
    30
}
fn default_check_interval() -> u32 {
    60
}
fn default_true() -> bool {
    true
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: default_city(),
            latitude: None,
            longitude: None,
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            days: default_forecast_days(),
            cache_minutes: default_cache_minutes(),
        }
    }
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            window_minutes: default_window_minutes(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rain_alerts: true,
            check_interval_minutes: default_check_interval(),
        }
    }
}

impl NotificationsConfig {
    pub fn check_interval(&self) -> u32 {
        self.check_interval_minutes
            .clamp(CHECK_INTERVAL_RANGE.0, CHECK_INTERVAL_RANGE.1)
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
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => parse_number(value).ok_or_else(|| {
                    invalid(format!("cannot parse '{value}' as number"))
                })?,
                // Unset optional values take a number when the input is numeric.
                serde_json::Value::Null if value.is_empty() => serde_json::Value::Null,
                serde_json::Value::Null => parse_number(value)
                    .unwrap_or_else(|| serde_json::Value::String(value.into())),
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                serde_json::Value::String(_) => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
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

    /// Set a config value by key. The result must still validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the updated config is out of range. `self` is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// All leaf keys with their current values, in document order.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let out_of_range = |key: &str, value: u32, (lo, hi): (u32, u32)| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{value} is outside {lo}..={hi}"),
        };

        if !(1..=MAX_FORECAST_DAYS).contains(&self.forecast.days) {
            return Err(out_of_range("forecast.days", self.forecast.days, (1, MAX_FORECAST_DAYS)));
        }
        let (lo, hi) = CACHE_MINUTES_RANGE;
        if !(lo..=hi).contains(&self.forecast.cache_minutes) {
            return Err(out_of_range(
                "forecast.cache_minutes",
                self.forecast.cache_minutes,
                CACHE_MINUTES_RANGE,
            ));
        }
        if let Some(lat) = self.location.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(ConfigError::InvalidValue {
                    key: "location.latitude".into(),
                    message: format!("{lat} is not a latitude"),
                });
            }
        }
        if let Some(lon) = self.location.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(ConfigError::InvalidValue {
                    key: "location.longitude".into(),
                    message: format!("{lon} is not a longitude"),
                });
            }
        }
        if self.location.name.trim().is_empty() && self.coordinates().is_none() {
            return Err(ConfigError::InvalidValue {
                key: "location.name".into(),
                message: "a city name or coordinates are required".into(),
            });
        }
        self.rain.validate().map_err(|e| ConfigError::InvalidValue {
            key: "rain".into(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.location.latitude?, self.location.longitude?))
    }

    pub fn display_units(&self) -> DisplayUnits {
        DisplayUnits {
            temperature: self.units.temperature,
            wind: self.units.wind,
        }
    }

    pub fn aligner(&self) -> Aligner {
        Aligner::new(AcceptancePolicy::from_window_minutes(
            self.alignment.window_minutes,
        ))
    }

    pub fn classifier(&self) -> Result<RainClassifier, CoreError> {
        Ok(RainClassifier::new(self.rain.clone())?)
    }
}

fn parse_number(value: &str) -> Option<serde_json::Value> {
    if let Ok(n) = value.parse::<u64>() {
        Some(serde_json::Value::Number(n.into()))
    } else {
        value
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
    }
}
