//! Loading, querying and exporting the weekly schedule.
//!
//! JSON documents look like `{"schedule": [{"day", "time", "subject", "location"}]}`;
//! CSV files carry the header `day,time,subject,location`. Rows that fail
//! validation are kept (see [`ScheduleRecord`]) and reported, never dropped.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use chrono::Weekday;
use serde::Serialize;
use tracing::{info, warn};

use super::entry::{RawScheduleEntry, ScheduleEntry, ScheduleRecord, TimeRange};
use crate::error::ScheduleError;

#[derive(Serialize)]
struct ScheduleDocument<'a> {
    schedule: Vec<&'a RawScheduleEntry>,
}

/// Owns the loaded schedule records in source order.
#[derive(Debug, Clone, Default)]
pub struct ScheduleStore {
    records: Vec<ScheduleRecord>,
}

impl ScheduleStore {
    /// Validate raw rows into a store. Invalid rows are logged and kept.
    pub fn from_raw(rows: Vec<RawScheduleEntry>) -> Self {
        let records: Vec<ScheduleRecord> = rows.into_iter().map(ScheduleRecord::from_raw).collect();
        for (index, record) in records.iter().enumerate() {
            if let Some(err) = record.error() {
                warn!(row = index, error = %err, "schedule row failed validation");
            }
        }
        Self { records }
    }

    /// Parse a JSON schedule document.
    pub fn from_json_str(content: &str) -> Result<Self, ScheduleError> {
        let mut document: serde_json::Value = serde_json::from_str(content)?;
        let rows = document
            .get_mut("schedule")
            .map(serde_json::Value::take)
            .ok_or(ScheduleError::MissingScheduleKey)?;
        let rows: Vec<serde_json::Value> = serde_json::from_value(rows)?;
        Ok(Self::from_raw(
            rows.iter().map(RawScheduleEntry::from_json_value).collect(),
        ))
    }

    /// Parse CSV rows with a `day,time,subject,location` header.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, ScheduleError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let rows = csv_reader
            .deserialize::<RawScheduleEntry>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_raw(rows))
    }

    /// Load a schedule file, choosing the parser by extension.
    pub fn load(path: &Path) -> Result<Self, ScheduleError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let store = match extension.as_deref() {
            Some("json") => Self::from_json_str(&read_file(path)?)?,
            Some("csv") => Self::from_csv_reader(read_file(path)?.as_bytes())?,
            _ => return Err(ScheduleError::UnsupportedFormat(path.to_path_buf())),
        };
        info!(
            path = %path.display(),
            rows = store.len(),
            invalid = store.invalid_records().count(),
            "schedule loaded"
        );
        Ok(store)
    }

    pub fn records(&self) -> &[ScheduleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Valid entries in source order.
    pub fn entries(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.records.iter().filter_map(ScheduleRecord::entry)
    }

    /// Rows that failed validation, with their zero-based row index.
    pub fn invalid_records(&self) -> impl Iterator<Item = (usize, &ScheduleRecord)> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| !record.is_valid())
    }

    /// Fail on the first invalid row.
    pub fn validate_strict(&self) -> Result<(), ScheduleError> {
        for (index, record) in self.records.iter().enumerate() {
            if let Some(err) = record.error() {
                return Err(ScheduleError::InvalidEntry {
                    index,
                    source: err.clone(),
                });
            }
        }
        Ok(())
    }

    /// Valid entries that fall on `day`.
    pub fn entries_for_day(&self, day: Weekday) -> Vec<&ScheduleEntry> {
        self.entries().filter(|e| e.day == day).collect()
    }

    /// Distinct time ranges across valid entries, sorted by start then end.
    pub fn time_slots(&self) -> Vec<TimeRange> {
        self.entries()
            .map(|e| e.time_range)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Serialize the normalized rows back to the JSON document format.
    pub fn to_json_string(&self) -> Result<String, ScheduleError> {
        let document = ScheduleDocument {
            schedule: self.records.iter().map(ScheduleRecord::raw).collect(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Serialize the normalized rows to CSV with a header line.
    pub fn to_csv_string(&self) -> Result<String, ScheduleError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in &self.records {
            writer.serialize(record.raw())?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| ScheduleError::Csv(e.into_error().into()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Write the schedule to `path`, as JSON or CSV by extension.
    pub fn export(&self, path: &Path) -> Result<(), ScheduleError> {
        if self.is_empty() {
            return Err(ScheduleError::Empty);
        }
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let content = match extension.as_deref() {
            Some("json") => self.to_json_string()?,
            Some("csv") => self.to_csv_string()?,
            _ => return Err(ScheduleError::UnsupportedFormat(path.to_path_buf())),
        };
        std::fs::write(path, content).map_err(|source| ScheduleError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn read_file(path: &Path) -> Result<String, ScheduleError> {
    std::fs::read_to_string(path).map_err(|source| ScheduleError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::EntryError;

    const JSON: &str = r#"{
        "schedule": [
            {"day": "Luni", "time": "08:00-10:00", "subject": "Programare", "location": "C309"},
            {"day": "Monday", "time": "12:00-14:00", "subject": "Algebra"},
            {"day": "Marți", "time": "08:00-10:00", "subject": "Fizică"},
            {"day": "Blursday", "time": "10:00-12:00", "subject": "Nothing"}
        ]
    }"#;

    #[test]
    fn json_load_keeps_invalid_rows_in_place() {
        let store = ScheduleStore::from_json_str(JSON).unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(store.entries().count(), 3);

        let invalid: Vec<_> = store.invalid_records().map(|(i, _)| i).collect();
        assert_eq!(invalid, vec![3]);
    }

    #[test]
    fn mistyped_json_rows_stay_in_place() {
        let json = r#"{"schedule": [
            {"day": "Monday", "time": "08:00-10:00", "subject": "Math"},
            {"day": "Tuesday", "time": null, "subject": "Physics"},
            {"day": 3, "time": "10:00-12:00", "subject": "Chemistry"},
            {"day": "Friday", "time": "12:00-13:00", "subject": "Art"}
        ]}"#;
        let store = ScheduleStore::from_json_str(json).unwrap();
        assert_eq!(store.len(), 4);

        let subjects: Vec<_> = store.entries().map(|e| e.subject.as_str()).collect();
        assert_eq!(subjects, vec!["Math", "Art"]);

        let records = store.records();
        assert_eq!(records[1].error(), Some(&EntryError::MissingField("time")));
        assert_eq!(records[2].error(), Some(&EntryError::UnknownDay("3".into())));
        assert_eq!(records[1].raw().subject, "Physics");
    }

    #[test]
    fn json_without_schedule_key_is_rejected() {
        let err = ScheduleStore::from_json_str(r#"{"rows": []}"#).unwrap_err();
        assert!(matches!(err, ScheduleError::MissingScheduleKey));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = ScheduleStore::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ScheduleError::Json(_)));
    }

    #[test]
    fn csv_load_handles_missing_location() {
        let csv = "day,time,subject,location\nLuni,08:00-10:00,Programare,C309\nJoi, 14:00-16:00 ,Chimie,\n";
        let store = ScheduleStore::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(store.len(), 2);
        let entries: Vec<_> = store.entries().collect();
        assert_eq!(entries[0].location.as_deref(), Some("C309"));
        assert_eq!(entries[1].day, Weekday::Thu);
        assert_eq!(entries[1].location, None);
    }

    #[test]
    fn strict_validation_reports_first_bad_row() {
        let store = ScheduleStore::from_json_str(JSON).unwrap();
        match store.validate_strict() {
            Err(ScheduleError::InvalidEntry { index, source }) => {
                assert_eq!(index, 3);
                assert_eq!(source, EntryError::UnknownDay("Blursday".into()));
            }
            other => panic!("expected InvalidEntry, got {other:?}"),
        }
    }

    #[test]
    fn entries_for_day_and_time_slots() {
        let store = ScheduleStore::from_json_str(JSON).unwrap();
        let monday = store.entries_for_day(Weekday::Mon);
        assert_eq!(monday.len(), 2);

        let slots: Vec<String> = store.time_slots().iter().map(ToString::to_string).collect();
        assert_eq!(slots, vec!["08:00-10:00", "12:00-14:00"]);
    }

    #[test]
    fn json_export_round_trips_through_loader() {
        let store = ScheduleStore::from_json_str(JSON).unwrap();
        let exported = store.to_json_string().unwrap();
        let reloaded = ScheduleStore::from_json_str(&exported).unwrap();
        assert_eq!(reloaded.records(), store.records());
    }

    #[test]
    fn csv_export_round_trips_through_loader() {
        let store = ScheduleStore::from_json_str(JSON).unwrap();
        let exported = store.to_csv_string().unwrap();
        assert!(exported.starts_with("day,time,subject,location"));
        let reloaded = ScheduleStore::from_csv_reader(exported.as_bytes()).unwrap();
        assert_eq!(reloaded.records(), store.records());
    }

    #[test]
    fn load_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orar.json");
        std::fs::write(&path, JSON).unwrap();
        assert_eq!(ScheduleStore::load(&path).unwrap().len(), 4);

        let unknown = dir.path().join("orar.txt");
        std::fs::write(&unknown, JSON).unwrap();
        assert!(matches!(
            ScheduleStore::load(&unknown),
            Err(ScheduleError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn export_refuses_empty_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScheduleStore::default();
        assert!(matches!(
            store.export(&dir.path().join("out.csv")),
            Err(ScheduleError::Empty)
        ));
    }
}
