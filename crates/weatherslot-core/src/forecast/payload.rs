//! Forecast payload adapters.
//!
//! Two shapes are accepted and normalized into a [`ForecastSeries`]:
//!
//! - the record form, `{"hourly": [{"datetime", "temperature", ...}], "daily": [...]}`;
//! - the Open-Meteo columnar response, `{"hourly": {"time": [...], "temperature_2m": [...]}}`.
//!
//! Individual samples that cannot be used (unparsable timestamp, missing
//! temperature) are skipped. Missing secondary fields default to zero, and
//! Fahrenheit temperatures are converted to Celsius here.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::series::{DailySample, ForecastSample, ForecastSeries};
use crate::error::ForecastError;
use crate::units::{convert_temperature, TemperatureUnit};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parse an ISO-8601 timestamp. Strings without an offset are local time in
/// `offset`.
pub fn parse_timestamp(value: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts);
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .and_then(|naive| offset.from_local_datetime(&naive).single())
}

/// Fields of one hourly point before validation.
#[derive(Debug, Default)]
struct HourlyFields {
    datetime: Option<String>,
    temperature: Option<f64>,
    precipitation_probability: Option<f64>,
    precipitation: Option<f64>,
    weather_code: Option<f64>,
    wind_speed: Option<f64>,
}

impl HourlyFields {
    fn from_record(record: &Value) -> Self {
        Self {
            datetime: record
                .get("datetime")
                .or_else(|| record.get("time"))
                .and_then(Value::as_str)
                .map(str::to_string),
            temperature: number(record, "temperature"),
            precipitation_probability: number(record, "precipitation_probability"),
            precipitation: number(record, "precipitation"),
            weather_code: number(record, "weather_code"),
            wind_speed: number(record, "wind_speed"),
        }
    }

    fn into_sample(self, offset: FixedOffset, unit: TemperatureUnit) -> Option<ForecastSample> {
        let Some(raw_ts) = self.datetime else {
            debug!("skipping hourly sample without datetime");
            return None;
        };
        let Some(timestamp) = parse_timestamp(&raw_ts, offset) else {
            debug!(datetime = %raw_ts, "skipping hourly sample with unparsable datetime");
            return None;
        };
        let Some(temperature) = self.temperature.filter(|t| t.is_finite()) else {
            debug!(datetime = %raw_ts, "skipping hourly sample without temperature");
            return None;
        };
        Some(ForecastSample {
            timestamp,
            temperature: convert_temperature(temperature, unit, TemperatureUnit::Celsius),
            precipitation_probability: percent(self.precipitation_probability),
            precipitation_amount: non_negative(self.precipitation),
            weather_code: code(self.weather_code),
            wind_speed: non_negative(self.wind_speed),
        })
    }
}

#[derive(Debug, Default)]
struct DailyFields {
    date: Option<String>,
    temperature_max: Option<f64>,
    temperature_min: Option<f64>,
    precipitation_sum: Option<f64>,
    weather_code: Option<f64>,
}

impl DailyFields {
    fn from_record(record: &Value) -> Self {
        Self {
            date: record
                .get("date")
                .or_else(|| record.get("time"))
                .and_then(Value::as_str)
                .map(str::to_string),
            temperature_max: number(record, "temperature_max"),
            temperature_min: number(record, "temperature_min"),
            precipitation_sum: number(record, "precipitation_sum"),
            weather_code: number(record, "weather_code"),
        }
    }

    fn into_sample(self, unit: TemperatureUnit) -> Option<DailySample> {
        let raw_date = self.date?;
        let Ok(date) = NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d") else {
            debug!(date = %raw_date, "skipping daily sample with unparsable date");
            return None;
        };
        let to_celsius = |t: f64| convert_temperature(t, unit, TemperatureUnit::Celsius);
        Some(DailySample {
            date,
            temperature_max: self.temperature_max.map(to_celsius),
            temperature_min: self.temperature_min.map(to_celsius),
            precipitation_sum: non_negative(self.precipitation_sum),
            weather_code: code(self.weather_code),
        })
    }
}

fn number(record: &Value, key: &str) -> Option<f64> {
    record.get(key).and_then(Value::as_f64)
}

fn percent(value: Option<f64>) -> u8 {
    value
        .filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0)
}

fn non_negative(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).map(|v| v.max(0.0)).unwrap_or(0.0)
}

fn code(value: Option<f64>) -> u16 {
    value
        .filter(|v| v.is_finite() && *v >= 0.0 && *v <= f64::from(u16::MAX))
        .map(|v| v as u16)
        .unwrap_or(0)
}

/// Open-Meteo `/v1/forecast` response, columnar arrays.
#[derive(Debug, Default, Deserialize)]
pub struct OpenMeteoResponse {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub utc_offset_seconds: Option<i32>,
    #[serde(default)]
    pub hourly_units: HashMap<String, String>,
    #[serde(default)]
    pub hourly: OpenMeteoHourly,
    #[serde(default)]
    pub daily_units: HashMap<String, String>,
    #[serde(default)]
    pub daily: OpenMeteoDaily,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenMeteoHourly {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_probability: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation: Vec<Option<f64>>,
    #[serde(default, alias = "weather_code")]
    pub weathercode: Vec<Option<f64>>,
    #[serde(default, alias = "wind_speed_10m")]
    pub windspeed_10m: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenMeteoDaily {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default, alias = "weather_code")]
    pub weathercode: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_sum: Vec<Option<f64>>,
}

fn column(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

fn unit_from_label(units: &HashMap<String, String>, key: &str) -> TemperatureUnit {
    units
        .get(key)
        .and_then(|label| label.parse().ok())
        .unwrap_or_default()
}

impl OpenMeteoResponse {
    /// Normalize into a series. Naive timestamps use `utc_offset_seconds`,
    /// or `fallback_offset` when the response omits it.
    pub fn into_series(self, fallback_offset: FixedOffset) -> Result<ForecastSeries, ForecastError> {
        let offset = self
            .utc_offset_seconds
            .and_then(FixedOffset::east_opt)
            .unwrap_or(fallback_offset);
        let hourly_unit = unit_from_label(&self.hourly_units, "temperature_2m");
        let daily_unit = unit_from_label(&self.daily_units, "temperature_2m_max");

        let h = &self.hourly;
        let hourly = h
            .time
            .iter()
            .enumerate()
            .filter_map(|(i, time)| {
                HourlyFields {
                    datetime: Some(time.clone()),
                    temperature: column(&h.temperature_2m, i),
                    precipitation_probability: column(&h.precipitation_probability, i),
                    precipitation: column(&h.precipitation, i),
                    weather_code: column(&h.weathercode, i),
                    wind_speed: column(&h.windspeed_10m, i),
                }
                .into_sample(offset, hourly_unit)
            })
            .collect();

        let d = &self.daily;
        let daily = d
            .time
            .iter()
            .enumerate()
            .filter_map(|(i, date)| {
                DailyFields {
                    date: Some(date.clone()),
                    temperature_max: column(&d.temperature_2m_max, i),
                    temperature_min: column(&d.temperature_2m_min, i),
                    precipitation_sum: column(&d.precipitation_sum, i),
                    weather_code: column(&d.weathercode, i),
                }
                .into_sample(daily_unit)
            })
            .collect();

        ForecastSeries::new(hourly, daily)
    }
}

/// Parse a record-form payload already decoded to JSON.
fn records_into_series(payload: &Value, fallback_offset: FixedOffset) -> Result<ForecastSeries, ForecastError> {
    let offset = payload
        .get("utc_offset_seconds")
        .and_then(Value::as_i64)
        .and_then(|s| i32::try_from(s).ok())
        .and_then(FixedOffset::east_opt)
        .unwrap_or(fallback_offset);
    let unit = payload
        .get("temperature_unit")
        .and_then(Value::as_str)
        .and_then(|u| u.parse().ok())
        .unwrap_or_default();

    let hourly = payload
        .get("hourly")
        .and_then(Value::as_array)
        .map(|records| {
            records
                .iter()
                .filter_map(|r| HourlyFields::from_record(r).into_sample(offset, unit))
                .collect()
        })
        .unwrap_or_default();
    let daily = payload
        .get("daily")
        .and_then(Value::as_array)
        .map(|records| {
            records
                .iter()
                .filter_map(|r| DailyFields::from_record(r).into_sample(unit))
                .collect()
        })
        .unwrap_or_default();

    ForecastSeries::new(hourly, daily)
}

impl ForecastSeries {
    /// Parse either accepted payload shape from a JSON value.
    pub fn from_payload(payload: Value, fallback_offset: FixedOffset) -> Result<Self, ForecastError> {
        match payload.get("hourly") {
            Some(Value::Array(_)) => records_into_series(&payload, fallback_offset),
            Some(Value::Object(_)) => serde_json::from_value::<OpenMeteoResponse>(payload)
                .map_err(|e| ForecastError::Payload(e.to_string()))?
                .into_series(fallback_offset),
            Some(_) => Err(ForecastError::Payload(
                "'hourly' must be an array of records or an object of columns".into(),
            )),
            None => Err(ForecastError::Payload("missing 'hourly'".into())),
        }
    }

    /// Parse either accepted payload shape from JSON text.
    pub fn from_json_str(content: &str, fallback_offset: FixedOffset) -> Result<Self, ForecastError> {
        let payload: Value =
            serde_json::from_str(content).map_err(|e| ForecastError::Payload(e.to_string()))?;
        Self::from_payload(payload, fallback_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn parses_offset_and_naive_timestamps() {
        let bucharest = FixedOffset::east_opt(3 * 3600).unwrap();
        let with_offset = parse_timestamp("2025-06-02T08:00:00+03:00", utc()).unwrap();
        let naive = parse_timestamp("2025-06-02T08:00", bucharest).unwrap();
        assert_eq!(with_offset, naive);
        assert_eq!(naive.offset(), &bucharest);
        assert!(parse_timestamp("yesterday", utc()).is_none());
    }

    #[test]
    fn record_payload_skips_malformed_samples() {
        let payload = json!({
            "hourly": [
                {"datetime": "2025-06-02T08:00", "temperature": 18.5, "precipitation_probability": 40,
                 "precipitation": 0.2, "weather_code": 61, "wind_speed": 12.0},
                {"datetime": "not a date", "temperature": 19.0},
                {"datetime": "2025-06-02T09:00", "temperature": null},
                {"datetime": "2025-06-02T10:00", "temperature": "warm"},
                {"datetime": "2025-06-02T11:00", "temperature": 21.0}
            ],
            "daily": [
                {"date": "2025-06-02", "temperature_max": 24.0, "temperature_min": 12.0,
                 "precipitation_sum": 1.5, "weather_code": 61},
                {"date": "June 3rd"}
            ]
        });
        let series = ForecastSeries::from_payload(payload, utc()).unwrap();
        assert_eq!(series.hourly().len(), 2);
        let last = &series.hourly()[1];
        assert_eq!(last.temperature, 21.0);
        assert_eq!(last.precipitation_probability, 0);
        assert_eq!(last.weather_code, 0);
        assert_eq!(series.daily().len(), 1);
    }

    #[test]
    fn record_payload_sanitizes_out_of_range_values() {
        let payload = json!({"hourly": [
            {"datetime": "2025-06-02T08:00:00Z", "temperature": 10.0,
             "precipitation_probability": 140, "precipitation": -3.0, "wind_speed": -1.0}
        ]});
        let series = ForecastSeries::from_payload(payload, utc()).unwrap();
        let sample = &series.hourly()[0];
        assert_eq!(sample.precipitation_probability, 100);
        assert_eq!(sample.precipitation_amount, 0.0);
        assert_eq!(sample.wind_speed, 0.0);
    }

    #[test]
    fn record_payload_must_be_sorted() {
        let payload = json!({"hourly": [
            {"datetime": "2025-06-02T09:00:00Z", "temperature": 10.0},
            {"datetime": "2025-06-02T08:00:00Z", "temperature": 10.0}
        ]});
        assert!(matches!(
            ForecastSeries::from_payload(payload, utc()),
            Err(ForecastError::Unsorted { .. })
        ));
    }

    #[test]
    fn open_meteo_columns_are_zipped() {
        let payload = json!({
            "latitude": 44.43,
            "longitude": 26.1,
            "utc_offset_seconds": 10800,
            "hourly_units": {"temperature_2m": "°C"},
            "hourly": {
                "time": ["2025-06-02T08:00", "2025-06-02T09:00", "2025-06-02T10:00"],
                "temperature_2m": [18.0, null, 20.0],
                "precipitation_probability": [10, 20],
                "precipitation": [0.0, 0.0, 0.5],
                "weathercode": [1, 2, 61],
                "windspeed_10m": [5.0, 6.0, 7.0]
            },
            "daily": {
                "time": ["2025-06-02"],
                "weathercode": [61],
                "temperature_2m_max": [24.0],
                "temperature_2m_min": [12.0],
                "precipitation_sum": [0.5]
            }
        });
        let series = ForecastSeries::from_payload(payload, utc()).unwrap();
        assert_eq!(series.hourly().len(), 2);
        let third = &series.hourly()[1];
        assert_eq!(third.precipitation_probability, 0);
        assert_eq!(third.weather_code, 61);
        assert_eq!(
            third.timestamp,
            DateTime::parse_from_rfc3339("2025-06-02T10:00:00+03:00").unwrap()
        );
        assert_eq!(series.daily()[0].temperature_max, Some(24.0));
    }

    #[test]
    fn fahrenheit_payload_is_normalized_to_celsius() {
        let payload = json!({
            "hourly_units": {"temperature_2m": "°F"},
            "hourly": {"time": ["2025-06-02T08:00"], "temperature_2m": [212.0]}
        });
        let series = ForecastSeries::from_payload(payload, utc()).unwrap();
        assert!((series.hourly()[0].temperature - 100.0).abs() < 1e-9);
    }

    #[test]
    fn unrecognized_payloads_are_errors() {
        assert!(matches!(
            ForecastSeries::from_payload(json!({"daily": []}), utc()),
            Err(ForecastError::Payload(_))
        ));
        assert!(matches!(
            ForecastSeries::from_json_str("[]", utc()),
            Err(ForecastError::Payload(_))
        ));
    }
}
