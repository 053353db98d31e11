//! Statistics over an aligned schedule
//!
//! Aggregation runs on canonical values (°C, mm). The display unit is carried
//! alongside and only applied when formatting.

mod display;

pub use display::StatisticsDisplay;

use serde::{Deserialize, Serialize};

use crate::align::EnrichedEntry;
use crate::rain::RainClassifier;
use crate::units::{convert_temperature, TemperatureUnit};

/// Summary of the forecast samples matched to a schedule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Mean temperature in °C over matched samples
    pub avg_temperature: Option<f64>,
    /// Lowest matched temperature in °C
    pub min_temperature: Option<f64>,
    /// Highest matched temperature in °C
    pub max_temperature: Option<f64>,
    /// Entries whose sample classifies as rainy
    pub rainy_periods: usize,
    /// Sum of precipitation amounts in mm over matched samples
    pub total_precipitation: f64,
    /// Entries that had a matched sample
    pub matched_entries: usize,
    /// Unit used when this summary is formatted
    pub display_unit: TemperatureUnit,
}

impl Statistics {
    /// Average temperature converted to the display unit.
    pub fn avg_in_display_unit(&self) -> Option<f64> {
        self.avg_temperature.map(|t| self.to_display(t))
    }

    pub fn min_in_display_unit(&self) -> Option<f64> {
        self.min_temperature.map(|t| self.to_display(t))
    }

    pub fn max_in_display_unit(&self) -> Option<f64> {
        self.max_temperature.map(|t| self.to_display(t))
    }

    fn to_display(&self, celsius: f64) -> f64 {
        convert_temperature(celsius, TemperatureUnit::Celsius, self.display_unit)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatisticsAggregator {
    classifier: RainClassifier,
}

impl StatisticsAggregator {
    pub fn new(classifier: RainClassifier) -> Self {
        Self { classifier }
    }

    /// Entries without a matched sample are skipped.
    pub fn aggregate(&self, entries: &[EnrichedEntry], display_unit: TemperatureUnit) -> Statistics {
        let mut stats = Statistics {
            display_unit,
            ..Statistics::default()
        };
        let mut sum = 0.0;

        for sample in entries.iter().filter_map(|e| e.matched_sample.as_ref()) {
            stats.matched_entries += 1;
            sum += sample.temperature;
            stats.min_temperature = Some(
                stats
                    .min_temperature
                    .map_or(sample.temperature, |m| m.min(sample.temperature)),
            );
            stats.max_temperature = Some(
                stats
                    .max_temperature
                    .map_or(sample.temperature, |m| m.max(sample.temperature)),
            );
            stats.total_precipitation += sample.precipitation_amount;
            if self.classifier.classify(sample).is_rainy {
                stats.rainy_periods += 1;
            }
        }

        if stats.matched_entries > 0 {
            stats.avg_temperature = Some(sum / stats.matched_entries as f64);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastSample;
    use crate::schedule::{RawScheduleEntry, ScheduleRecord};
    use chrono::DateTime;

    fn entry(sample: Option<(f64, u8, f64)>) -> EnrichedEntry {
        let record =
            ScheduleRecord::from_raw(RawScheduleEntry::new("Monday", "08:00-10:00", "Math", None));
        EnrichedEntry {
            record,
            resolved_date: None,
            matched_sample: sample.map(|(temperature, probability, amount)| ForecastSample {
                timestamp: DateTime::parse_from_rfc3339("2025-06-02T08:00:00+03:00").unwrap(),
                temperature,
                precipitation_probability: probability,
                precipitation_amount: amount,
                weather_code: 0,
                wind_speed: 0.0,
            }),
        }
    }

    #[test]
    fn empty_input_yields_nulls_and_zeros() {
        let stats = StatisticsAggregator::default().aggregate(&[], TemperatureUnit::Celsius);
        assert_eq!(stats.avg_temperature, None);
        assert_eq!(stats.min_temperature, None);
        assert_eq!(stats.max_temperature, None);
        assert_eq!(stats.rainy_periods, 0);
        assert_eq!(stats.total_precipitation, 0.0);
    }

    #[test]
    fn unmatched_entries_are_skipped() {
        let entries = vec![entry(None), entry(Some((10.0, 0, 0.0))), entry(None)];
        let stats = StatisticsAggregator::default().aggregate(&entries, TemperatureUnit::Celsius);
        assert_eq!(stats.matched_entries, 1);
        assert_eq!(stats.avg_temperature, Some(10.0));
    }

    #[test]
    fn aggregates_temperature_rain_and_precipitation() {
        let entries = vec![
            entry(Some((10.0, 10, 0.0))),
            entry(Some((20.0, 80, 1.5))),
            entry(Some((15.0, 0, 0.2))),
        ];
        let stats = StatisticsAggregator::default().aggregate(&entries, TemperatureUnit::Celsius);
        assert_eq!(stats.avg_temperature, Some(15.0));
        assert_eq!(stats.min_temperature, Some(10.0));
        assert_eq!(stats.max_temperature, Some(20.0));
        assert_eq!(stats.rainy_periods, 2);
        assert!((stats.total_precipitation - 1.7).abs() < 1e-9);
    }

    #[test]
    fn display_unit_does_not_change_canonical_values() {
        let entries = vec![entry(Some((20.0, 0, 0.0)))];
        let stats = StatisticsAggregator::default().aggregate(&entries, TemperatureUnit::Fahrenheit);
        assert_eq!(stats.avg_temperature, Some(20.0));
        assert_eq!(stats.avg_in_display_unit(), Some(68.0));
    }
}
