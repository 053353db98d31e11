//! Temperature and wind unit conversions.
//!
//! Stored values are always canonical (°C, km/h). These functions are only
//! called when formatting for display or when normalizing a provider payload.

mod display;

pub use display::{DisplayUnits, SampleDisplay};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const KMH_PER_MS: f64 = 3.6;
const KMH_PER_MPH: f64 = 1.609_344;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "celsius" | "c" | "°c" => Ok(Self::Celsius),
            "fahrenheit" | "f" | "°f" => Ok(Self::Fahrenheit),
            other => Err(ValidationError::InvalidValue {
                field: "temperature_unit".into(),
                message: format!("unknown unit '{other}'"),
            }),
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Celsius => "celsius",
            Self::Fahrenheit => "fahrenheit",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindUnit {
    #[default]
    #[serde(rename = "km/h")]
    KilometersPerHour,
    #[serde(rename = "m/s")]
    MetersPerSecond,
    #[serde(rename = "mph")]
    MilesPerHour,
}

impl WindUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::KilometersPerHour => "km/h",
            Self::MetersPerSecond => "m/s",
            Self::MilesPerHour => "mph",
        }
    }

    fn kmh_factor(&self) -> f64 {
        match self {
            Self::KilometersPerHour => 1.0,
            Self::MetersPerSecond => KMH_PER_MS,
            Self::MilesPerHour => KMH_PER_MPH,
        }
    }
}

impl FromStr for WindUnit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "km/h" | "kmh" | "kph" => Ok(Self::KilometersPerHour),
            "m/s" | "ms" => Ok(Self::MetersPerSecond),
            "mph" => Ok(Self::MilesPerHour),
            other => Err(ValidationError::InvalidValue {
                field: "wind_unit".into(),
                message: format!("unknown unit '{other}'"),
            }),
        }
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Convert a temperature between units; identity when `from == to`.
pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    match (from, to) {
        (TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit) => celsius_to_fahrenheit(value),
        (TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius) => fahrenheit_to_celsius(value),
        _ => value,
    }
}

/// Convert a wind speed between units; identity when `from == to`.
pub fn convert_wind(value: f64, from: WindUnit, to: WindUnit) -> f64 {
    if from == to {
        return value;
    }
    value * from.kmh_factor() / to.kmh_factor()
}
