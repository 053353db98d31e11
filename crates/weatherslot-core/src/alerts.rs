//! Rain alerts for upcoming schedule entries.
//!
//! The planner picks entries that resolve to a given date (the caller decides
//! which, usually tomorrow) and whose matched sample is rainy. The history
//! remembers what has already been announced, and the digest turns the
//! remaining alerts into a notification title and body.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::align::EnrichedEntry;
use crate::error::CoreError;
use crate::rain::{RainClassifier, RainSeverity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainAlert {
    pub date: NaiveDate,
    pub time: String,
    pub subject: String,
    pub location: Option<String>,
    pub precipitation_probability: u8,
    pub precipitation_amount: f64,
    pub severity: RainSeverity,
}

impl RainAlert {
    /// De-duplication key. Includes the date so next week's slot alerts again.
    pub fn key(&self) -> String {
        format!("{}_{}_{}", self.date, self.time, self.subject)
    }
}

#[derive(Debug, Clone)]
pub struct RainAlertPlanner {
    classifier: RainClassifier,
    alert_probability: u8,
}

impl RainAlertPlanner {
    pub fn new(classifier: RainClassifier) -> Self {
        let alert_probability = classifier.thresholds().rain_probability;
        Self {
            classifier,
            alert_probability,
        }
    }

    pub fn plan(&self, entries: &[EnrichedEntry], date: NaiveDate) -> Vec<RainAlert> {
        entries
            .iter()
            .filter(|e| e.resolved_date == Some(date))
            .filter_map(|e| {
                let sample = e.matched_sample.as_ref()?;
                let entry = e.entry()?;
                let risk = self.classifier.classify(sample);
                let notable = sample.precipitation_probability > self.alert_probability
                    || sample.precipitation_amount > 0.0;
                if !(risk.is_rainy && notable) {
                    return None;
                }
                Some(RainAlert {
                    date,
                    time: entry.time_range.to_string(),
                    subject: entry.subject.clone(),
                    location: entry.location.clone(),
                    precipitation_probability: sample.precipitation_probability,
                    precipitation_amount: sample.precipitation_amount,
                    severity: risk.severity,
                })
            })
            .collect()
    }
}

/// Keys of alerts already delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertHistory {
    delivered: BTreeSet<String>,
}

impl AlertHistory {
    /// Load from a JSON file; a missing or unreadable file yields an empty history.
    pub fn load(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "discarding corrupt alert history");
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn contains(&self, alert: &RainAlert) -> bool {
        self.delivered.contains(&alert.key())
    }

    /// Keep only alerts not seen before and remember them.
    pub fn filter_new(&mut self, alerts: Vec<RainAlert>) -> Vec<RainAlert> {
        alerts
            .into_iter()
            .filter(|alert| {
                let fresh = self.delivered.insert(alert.key());
                if !fresh {
                    debug!(key = %alert.key(), "alert already delivered");
                }
                fresh
            })
            .collect()
    }

    /// Forget keys dated before `date`. Returns how many were dropped.
    pub fn prune_before(&mut self, date: NaiveDate) -> usize {
        let before = self.delivered.len();
        self.delivered.retain(|key| {
            key.split('_')
                .next()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                .is_some_and(|d| d >= date)
        });
        let dropped = before - self.delivered.len();
        if dropped > 0 {
            debug!(dropped, %date, "pruned old alert keys");
        }
        dropped
    }

    pub fn len(&self) -> usize {
        self.delivered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delivered.is_empty()
    }

    pub fn clear(&mut self) {
        self.delivered.clear();
    }
}

/// Notification text for a batch of alerts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertDigest {
    pub title: String,
    pub lines: Vec<String>,
}

impl AlertDigest {
    /// `None` when there is nothing to announce.
    pub fn summarize(alerts: &[RainAlert]) -> Option<Self> {
        match alerts {
            [] => None,
            [alert] => Some(Self {
                title: "Rain risk".to_string(),
                lines: vec![
                    format!("{} - {}", alert.subject, alert.time),
                    format!("Rain probability: {}%", alert.precipitation_probability),
                ],
            }),
            many => Some(Self {
                title: format!("Rain risk for {} activities", many.len()),
                lines: many
                    .iter()
                    .map(|a| format!("{} - {} ({}%)", a.subject, a.time, a.precipitation_probability))
                    .collect(),
            }),
        }
    }

    pub fn message(&self) -> String {
        self.lines.join("\n")
    }
}
