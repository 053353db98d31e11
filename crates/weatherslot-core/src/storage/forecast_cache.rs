//! On-disk cache of the last fetched forecast.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::data_dir;
use crate::error::CoreError;
use crate::forecast::ForecastSeries;

/// A forecast together with when and for where it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedForecast {
    pub fetched_at: DateTime<Utc>,
    pub location: String,
    pub series: ForecastSeries,
}

impl CachedForecast {
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.fetched_at
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: TimeDelta) -> bool {
        self.age(now) <= max_age
    }
}

#[derive(Debug, Clone)]
pub struct ForecastCache {
    path: PathBuf,
}

impl ForecastCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache file in the data directory.
    pub fn open_default() -> Result<Self, CoreError> {
        Ok(Self::new(data_dir()?.join("forecast_cache.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self, cached: &CachedForecast) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(cached)?)?;
        info!(
            path = %self.path.display(),
            samples = cached.series.hourly().len(),
            "forecast cached"
        );
        Ok(())
    }

    /// The cached forecast regardless of age. Missing or corrupt files yield `None`.
    pub fn load_any(&self) -> Option<CachedForecast> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no forecast cache");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(cached) => Some(cached),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring corrupt forecast cache");
                None
            }
        }
    }

    /// The cached forecast only if it is no older than `max_age` at `now`.
    pub fn load_fresh(&self, now: DateTime<Utc>, max_age: TimeDelta) -> Option<CachedForecast> {
        let cached = self.load_any()?;
        if cached.is_fresh(now, max_age) {
            info!(age_minutes = cached.age(now).num_minutes(), "using cached forecast");
            Some(cached)
        } else {
            debug!(age_minutes = cached.age(now).num_minutes(), "forecast cache is stale");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastSample;

    fn cached(fetched_at: &str) -> CachedForecast {
        let sample = ForecastSample {
            timestamp: DateTime::parse_from_rfc3339("2025-06-02T08:00:00+03:00").unwrap(),
            temperature: 16.5,
            precipitation_probability: 30,
            precipitation_amount: 0.2,
            weather_code: 61,
            wind_speed: 12.0,
        };
        CachedForecast {
            fetched_at: DateTime::parse_from_rfc3339(fetched_at).unwrap().with_timezone(&Utc),
            location: "Bucharest".into(),
            series: ForecastSeries::new(vec![sample], vec![]).unwrap(),
        }
    }

    fn now(ts: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn store_then_load_fresh_and_stale() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ForecastCache::new(dir.path().join("nested").join("forecast.json"));
        let entry = cached("2025-06-02T06:00:00Z");
        cache.store(&entry).unwrap();

        let fresh = cache.load_fresh(now("2025-06-02T06:20:00Z"), TimeDelta::minutes(30));
        assert_eq!(fresh, Some(entry.clone()));

        let stale = cache.load_fresh(now("2025-06-02T07:00:00Z"), TimeDelta::minutes(30));
        assert!(stale.is_none());
        assert_eq!(cache.load_any(), Some(entry));
    }

    #[test]
    fn missing_or_corrupt_cache_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ForecastCache::new(dir.path().join("forecast.json"));
        assert!(cache.load_any().is_none());

        fs::write(cache.path(), "{ not json").unwrap();
        assert!(cache.load_any().is_none());
    }

    #[test]
    fn cached_series_is_revalidated_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ForecastCache::new(dir.path().join("forecast.json"));
        let body = r#"{
            "fetched_at": "2025-06-02T06:00:00Z",
            "location": "Bucharest",
            "series": {"hourly": [
                {"timestamp": "2025-06-02T09:00:00+03:00", "temperature": 1.0,
                 "precipitation_probability": 0, "precipitation_amount": 0.0,
                 "weather_code": 0, "wind_speed": 0.0},
                {"timestamp": "2025-06-02T08:00:00+03:00", "temperature": 2.0,
                 "precipitation_probability": 0, "precipitation_amount": 0.0,
                 "weather_code": 0, "wind_speed": 0.0}
            ], "daily": []}
        }"#;
        fs::write(cache.path(), body).unwrap();
        assert!(cache.load_any().is_none());
    }
}
