//! Table-cell formatting for forecast samples.

use serde::{Deserialize, Serialize};

use super::{convert_temperature, convert_wind, TemperatureUnit, WindUnit};
use crate::forecast::ForecastSample;

const PLACEHOLDER: &str = "-";

/// Display units chosen by the user. Passed explicitly to every formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayUnits {
    pub temperature: TemperatureUnit,
    pub wind: WindUnit,
}

/// Formatted cells for one schedule row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleDisplay {
    pub temperature: String,
    pub conditions: String,
    pub precipitation: String,
    pub wind: String,
}

impl SampleDisplay {
    /// Every cell shows the "no data" placeholder.
    pub fn placeholder() -> Self {
        Self {
            temperature: PLACEHOLDER.into(),
            conditions: PLACEHOLDER.into(),
            precipitation: PLACEHOLDER.into(),
            wind: PLACEHOLDER.into(),
        }
    }

    pub fn new(sample: Option<&ForecastSample>, units: DisplayUnits) -> Self {
        let Some(sample) = sample else {
            return Self::placeholder();
        };
        let temperature = convert_temperature(
            sample.temperature,
            TemperatureUnit::Celsius,
            units.temperature,
        );
        let wind = convert_wind(sample.wind_speed, WindUnit::KilometersPerHour, units.wind);
        Self {
            temperature: format!("{temperature:.1}{}", units.temperature.symbol()),
            conditions: sample.description().to_string(),
            precipitation: format!("{}%", sample.precipitation_probability),
            wind: format!("{wind:.1} {}", units.wind.symbol()),
        }
    }
}
