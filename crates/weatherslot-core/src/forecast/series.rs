//! Normalized forecast samples and the time-ordered series.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::wmo;
use crate::error::ForecastError;

/// One hourly forecast point. Temperature in °C, amount in mm, wind in km/h.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: DateTime<FixedOffset>,
    pub temperature: f64,
    /// Percent, 0..=100.
    pub precipitation_probability: u8,
    pub precipitation_amount: f64,
    /// WMO weather interpretation code.
    pub weather_code: u16,
    pub wind_speed: f64,
}

impl ForecastSample {
    pub fn description(&self) -> &'static str {
        wmo::describe(self.weather_code)
    }
}

/// One daily aggregate, keyed by local date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySample {
    pub date: NaiveDate,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub precipitation_sum: f64,
    pub weather_code: u16,
}

#[derive(Deserialize)]
struct SeriesParts {
    #[serde(default)]
    hourly: Vec<ForecastSample>,
    #[serde(default)]
    daily: Vec<DailySample>,
}

/// Hourly samples in non-decreasing time order plus the coarser daily
/// sequence. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesParts")]
pub struct ForecastSeries {
    hourly: Vec<ForecastSample>,
    daily: Vec<DailySample>,
}

impl ForecastSeries {
    /// Build a series, rejecting hourly samples that go back in time.
    pub fn new(hourly: Vec<ForecastSample>, daily: Vec<DailySample>) -> Result<Self, ForecastError> {
        if let Some(index) = hourly
            .windows(2)
            .position(|pair| pair[1].timestamp < pair[0].timestamp)
        {
            return Err(ForecastError::Unsorted {
                index: index + 1,
                previous: hourly[index].timestamp.to_rfc3339(),
                next: hourly[index + 1].timestamp.to_rfc3339(),
            });
        }
        Ok(Self { hourly, daily })
    }

    /// A series with no data, used when no forecast is available.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn hourly(&self) -> &[ForecastSample] {
        &self.hourly
    }

    pub fn daily(&self) -> &[DailySample] {
        &self.daily
    }

    pub fn is_empty(&self) -> bool {
        self.hourly.is_empty()
    }

    /// Offset of the first hourly sample; the canonical zone for alignment.
    pub fn reference_offset(&self) -> Option<FixedOffset> {
        self.hourly.first().map(|s| *s.timestamp.offset())
    }

    /// First and last hourly timestamps.
    pub fn span(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        Some((self.hourly.first()?.timestamp, self.hourly.last()?.timestamp))
    }

    pub fn daily_for(&self, date: NaiveDate) -> Option<&DailySample> {
        self.daily.iter().find(|d| d.date == date)
    }
}

impl TryFrom<SeriesParts> for ForecastSeries {
    type Error = ForecastError;

    fn try_from(parts: SeriesParts) -> Result<Self, Self::Error> {
        Self::new(parts.hourly, parts.daily)
    }
}
