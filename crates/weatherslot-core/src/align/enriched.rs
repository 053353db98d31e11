use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::ScheduleError;
use crate::forecast::ForecastSample;
use crate::rain::{RainClassifier, RainRisk};
use crate::schedule::{ScheduleEntry, ScheduleRecord};
use crate::units::{convert_temperature, DisplayUnits, SampleDisplay, TemperatureUnit};

/// A schedule record paired with its resolved date and matched forecast sample.
///
/// Both are `None` for invalid records. `matched_sample` is also `None` when
/// no sample fell inside the acceptance window.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedEntry {
    pub record: ScheduleRecord,
    pub resolved_date: Option<NaiveDate>,
    pub matched_sample: Option<ForecastSample>,
}

impl EnrichedEntry {
    pub fn unmatched(record: ScheduleRecord) -> Self {
        Self {
            record,
            resolved_date: None,
            matched_sample: None,
        }
    }

    pub fn entry(&self) -> Option<&ScheduleEntry> {
        self.record.entry()
    }

    pub fn rain_risk(&self, classifier: &RainClassifier) -> Option<RainRisk> {
        self.matched_sample.as_ref().map(|s| classifier.classify(s))
    }

    pub fn display(&self, units: DisplayUnits) -> SampleDisplay {
        SampleDisplay::new(self.matched_sample.as_ref(), units)
    }
}

// Flattened so consumers see the source row fields next to the forecast match.
impl Serialize for EnrichedEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = self.record.raw();
        let mut state = serializer.serialize_struct("EnrichedEntry", 7)?;
        state.serialize_field("day", &raw.day)?;
        state.serialize_field("time", &raw.time)?;
        state.serialize_field("subject", &raw.subject)?;
        state.serialize_field("location", &raw.location)?;
        state.serialize_field("error", &self.record.error().map(|e| e.to_string()))?;
        state.serialize_field("resolved_date", &self.resolved_date)?;
        state.serialize_field("matched_sample", &self.matched_sample)?;
        state.end()
    }
}

#[derive(serde::Serialize)]
struct CsvRow<'a> {
    day: &'a str,
    time: &'a str,
    subject: &'a str,
    date: Option<NaiveDate>,
    temperature: Option<String>,
}

/// Write enriched entries as CSV with a `day,time,subject,date,temperature`
/// header. Temperature is in `unit` with one decimal, blank when unmatched.
pub fn enriched_to_csv(entries: &[EnrichedEntry], unit: TemperatureUnit) -> Result<String, ScheduleError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in entries {
        let raw = entry.record.raw();
        writer.serialize(CsvRow {
            day: &raw.day,
            time: &raw.time,
            subject: &raw.subject,
            date: entry.resolved_date,
            temperature: entry.matched_sample.as_ref().map(|s| {
                let value = convert_temperature(s.temperature, TemperatureUnit::Celsius, unit);
                format!("{value:.1}")
            }),
        })?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ScheduleError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
