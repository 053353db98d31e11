//! Schedule/forecast alignment.
//!
//! For every record the aligner resolves the next calendar date on which the
//! weekly slot occurs, builds the slot's start instant in the forecast's zone
//! and picks the nearest hourly sample. Invalid records pass through with
//! nulls; output order always equals input order.

mod enriched;
mod nearest;
mod occurrence;

pub use enriched::{enriched_to_csv, EnrichedEntry};
pub use nearest::nearest_sample;
pub use occurrence::next_occurrence;

use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::Serialize;
use tracing::{debug, warn};

use crate::forecast::ForecastSeries;
use crate::schedule::{ScheduleEntry, ScheduleRecord};

pub const DEFAULT_WINDOW_MINUTES: i64 = 30;

/// When a nearest sample is close enough to count as a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptancePolicy {
    /// Always accept the nearest sample, however far away.
    Nearest,
    /// Accept only samples at most this far from the slot start (inclusive).
    Within(TimeDelta),
}

impl AcceptancePolicy {
    /// `0` means no window.
    pub fn from_window_minutes(minutes: u32) -> Self {
        if minutes == 0 {
            Self::Nearest
        } else {
            Self::Within(TimeDelta::minutes(i64::from(minutes)))
        }
    }

    pub fn accepts(&self, distance: TimeDelta) -> bool {
        match self {
            Self::Nearest => true,
            Self::Within(window) => distance <= *window,
        }
    }
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self::Within(TimeDelta::minutes(DEFAULT_WINDOW_MINUTES))
    }
}

/// Where the zone used to build slot instants came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneSource {
    /// Offset of the first forecast sample.
    Forecast,
    /// Offset of the reference instant; the forecast was empty.
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub entries: Vec<EnrichedEntry>,
    pub zone: FixedOffset,
    pub zone_source: ZoneSource,
}

impl Alignment {
    pub fn is_degraded(&self) -> bool {
        self.zone_source == ZoneSource::Fallback
    }

    pub fn matched_count(&self) -> usize {
        self.entries.iter().filter(|e| e.matched_sample.is_some()).count()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Aligner {
    policy: AcceptancePolicy,
}

impl Aligner {
    pub fn new(policy: AcceptancePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> AcceptancePolicy {
        self.policy
    }

    pub fn align(
        &self,
        records: &[ScheduleRecord],
        forecast: &ForecastSeries,
        reference: DateTime<FixedOffset>,
    ) -> Vec<EnrichedEntry> {
        self.align_detailed(records, forecast, reference).entries
    }

    pub fn align_detailed(
        &self,
        records: &[ScheduleRecord],
        forecast: &ForecastSeries,
        reference: DateTime<FixedOffset>,
    ) -> Alignment {
        let (zone, zone_source) = match forecast.reference_offset() {
            Some(offset) => (offset, ZoneSource::Forecast),
            None => {
                warn!(
                    offset = %reference.offset(),
                    "forecast is empty, resolving dates in the reference zone"
                );
                (*reference.offset(), ZoneSource::Fallback)
            }
        };
        let local_reference = reference.with_timezone(&zone);

        let entries = records
            .iter()
            .map(|record| match record.entry() {
                Some(entry) => self.enrich(record.clone(), entry, forecast, local_reference),
                None => EnrichedEntry::unmatched(record.clone()),
            })
            .collect();

        Alignment {
            entries,
            zone,
            zone_source,
        }
    }

    fn enrich(
        &self,
        record: ScheduleRecord,
        entry: &ScheduleEntry,
        forecast: &ForecastSeries,
        reference: DateTime<FixedOffset>,
    ) -> EnrichedEntry {
        let resolved_date = next_occurrence(entry.day, entry.start(), reference.naive_local());

        let target = resolved_date.and_then(|date| {
            date.and_time(entry.start())
                .and_local_timezone(*reference.offset())
                .single()
        });

        let matched_sample = target.and_then(|target| {
            let (sample, distance) = nearest_sample(forecast.hourly(), target)?;
            if self.policy.accepts(distance) {
                Some(sample.clone())
            } else {
                debug!(
                    subject = %entry.subject,
                    %target,
                    distance_minutes = distance.num_minutes(),
                    "nearest sample outside acceptance window"
                );
                None
            }
        });

        EnrichedEntry {
            record,
            resolved_date,
            matched_sample,
        }
    }
}
