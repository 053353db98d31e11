//! Weekly recurring schedule entries and their validation.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const TIME_FORMAT: &str = "%H:%M";

/// Why a single schedule record failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    /// A required field is missing or blank
    #[error("field '{0}' is missing or empty")]
    MissingField(&'static str),

    /// Day name does not map to a weekday
    #[error("unknown day name '{0}'")]
    UnknownDay(String),

    /// Time range is not `HH:MM-HH:MM`
    #[error("invalid time range '{0}', expected HH:MM-HH:MM")]
    InvalidTimeRange(String),

    /// Start is not strictly before end
    #[error("time range {start}-{end} must start before it ends")]
    EmptyTimeRange { start: String, end: String },
}

/// Map a day name to a weekday, case-insensitively.
///
/// Accepts English full and three-letter names and Romanian names with or
/// without diacritics ("Marți", "Marti", "Sâmbătă", "Sambata", ...).
pub fn parse_weekday(name: &str) -> Result<Weekday, EntryError> {
    let folded: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'ă' | 'â' => 'a',
            'î' => 'i',
            'ș' | 'ş' => 's',
            'ț' | 'ţ' => 't',
            other => other,
        })
        .collect();

    let day = match folded.as_str() {
        "mon" | "monday" | "luni" => Weekday::Mon,
        "tue" | "tuesday" | "marti" => Weekday::Tue,
        "wed" | "wednesday" | "miercuri" => Weekday::Wed,
        "thu" | "thursday" | "joi" => Weekday::Thu,
        "fri" | "friday" | "vineri" => Weekday::Fri,
        "sat" | "saturday" | "sambata" => Weekday::Sat,
        "sun" | "sunday" | "duminica" => Weekday::Sun,
        _ => return Err(EntryError::UnknownDay(name.trim().to_string())),
    };
    Ok(day)
}

/// A half-open daily time range `start..end` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeRange {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeRange {
    /// Build a range, rejecting `start >= end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, EntryError> {
        if start >= end {
            return Err(EntryError::EmptyTimeRange {
                start: start.format(TIME_FORMAT).to_string(),
                end: end.format(TIME_FORMAT).to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Length of the range in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

impl FromStr for TimeRange {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EntryError::InvalidTimeRange(s.trim().to_string());
        let (start, end) = s.split_once('-').ok_or_else(invalid)?;
        let start = NaiveTime::parse_from_str(start.trim(), TIME_FORMAT).map_err(|_| invalid())?;
        let end = NaiveTime::parse_from_str(end.trim(), TIME_FORMAT).map_err(|_| invalid())?;
        Self::new(start, end)
    }
}

impl TryFrom<String> for TimeRange {
    type Error = EntryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeRange> for String {
    fn from(range: TimeRange) -> Self {
        range.to_string()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format(TIME_FORMAT),
            self.end.format(TIME_FORMAT)
        )
    }
}

/// A schedule row exactly as the source supplied it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawScheduleEntry {
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl RawScheduleEntry {
    pub fn new(day: &str, time: &str, subject: &str, location: Option<&str>) -> Self {
        Self {
            day: day.to_string(),
            time: time.to_string(),
            subject: subject.to_string(),
            location: location.map(str::to_string),
        }
    }

    /// Read a row from loosely typed JSON.
    ///
    /// Missing and null fields become empty strings. Other non-string values
    /// keep their JSON text so validation reports them on this row alone.
    pub fn from_json_value(value: &serde_json::Value) -> Self {
        let field = |name: &str| match value.get(name) {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };
        Self {
            day: field("day").unwrap_or_default(),
            time: field("time").unwrap_or_default(),
            subject: field("subject").unwrap_or_default(),
            location: field("location"),
        }
    }

    /// Trim every field and collapse a blank location to `None`.
    pub fn normalized(self) -> Self {
        let location = self
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        Self {
            day: self.day.trim().to_string(),
            time: self.time.trim().to_string(),
            subject: self.subject.trim().to_string(),
            location,
        }
    }
}

/// A validated weekly recurring entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day: Weekday,
    pub time_range: TimeRange,
    pub subject: String,
    pub location: Option<String>,
}

impl ScheduleEntry {
    pub fn new(
        day: Weekday,
        time_range: TimeRange,
        subject: impl Into<String>,
        location: Option<String>,
    ) -> Result<Self, EntryError> {
        let subject = subject.into().trim().to_string();
        if subject.is_empty() {
            return Err(EntryError::MissingField("subject"));
        }
        Ok(Self {
            day,
            time_range,
            subject,
            location: location.filter(|l| !l.trim().is_empty()),
        })
    }

    pub fn start(&self) -> NaiveTime {
        self.time_range.start()
    }
}

impl TryFrom<&RawScheduleEntry> for ScheduleEntry {
    type Error = EntryError;

    fn try_from(raw: &RawScheduleEntry) -> Result<Self, Self::Error> {
        if raw.day.trim().is_empty() {
            return Err(EntryError::MissingField("day"));
        }
        if raw.time.trim().is_empty() {
            return Err(EntryError::MissingField("time"));
        }
        let day = parse_weekday(&raw.day)?;
        let time_range = raw.time.parse()?;
        Self::new(day, time_range, raw.subject.as_str(), raw.location.clone())
    }
}

/// One row of a loaded schedule: the source record plus its validation result.
///
/// Invalid rows are kept so that alignment can still emit them, degraded,
/// in their original position.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRecord {
    raw: RawScheduleEntry,
    parsed: Result<ScheduleEntry, EntryError>,
}

impl ScheduleRecord {
    pub fn from_raw(raw: RawScheduleEntry) -> Self {
        let raw = raw.normalized();
        let parsed = ScheduleEntry::try_from(&raw);
        Self { raw, parsed }
    }

    pub fn raw(&self) -> &RawScheduleEntry {
        &self.raw
    }

    pub fn entry(&self) -> Option<&ScheduleEntry> {
        self.parsed.as_ref().ok()
    }

    pub fn error(&self) -> Option<&EntryError> {
        self.parsed.as_ref().err()
    }

    pub fn is_valid(&self) -> bool {
        self.parsed.is_ok()
    }
}

impl From<ScheduleEntry> for ScheduleRecord {
    fn from(entry: ScheduleEntry) -> Self {
        let raw = RawScheduleEntry {
            day: entry.day.to_string(),
            time: entry.time_range.to_string(),
            subject: entry.subject.clone(),
            location: entry.location.clone(),
        };
        Self {
            raw,
            parsed: Ok(entry),
        }
    }
}
