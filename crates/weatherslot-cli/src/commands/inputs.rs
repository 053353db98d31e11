//! Arguments and loaders shared by the commands that align a schedule.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local, TimeDelta, Utc};
use clap::Args;
use tracing::warn;
use weatherslot_core::{
    AcceptancePolicy, Aligner, Alignment, Config, ForecastCache, ForecastSeries, ScheduleStore,
};

#[derive(Args)]
pub struct InputArgs {
    /// Schedule file (.json or .csv)
    pub schedule: PathBuf,
    /// Forecast payload file; defaults to the cached forecast
    #[arg(long)]
    pub forecast: Option<PathBuf>,
    /// Reference instant (RFC 3339); defaults to now
    #[arg(long)]
    pub at: Option<String>,
    /// Acceptance window in minutes, overriding the config (0 = nearest)
    #[arg(long)]
    pub window: Option<u32>,
}

/// Everything a command needs after loading its inputs.
pub struct Loaded {
    pub config: Config,
    pub reference: DateTime<FixedOffset>,
    pub alignment: Alignment,
}

impl InputArgs {
    pub fn load(&self) -> Result<Loaded, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        config.validate()?;
        let reference = reference_instant(self.at.as_deref())?;
        let schedule = ScheduleStore::load(&self.schedule)?;
        let forecast = load_forecast(self.forecast.as_deref(), &config, reference)?;

        let aligner = match self.window {
            Some(minutes) => Aligner::new(AcceptancePolicy::from_window_minutes(minutes)),
            None => config.aligner(),
        };
        let alignment = aligner.align_detailed(schedule.records(), &forecast, reference);

        Ok(Loaded {
            config,
            reference,
            alignment,
        })
    }
}

/// Parse `--at`, or read the local clock.
pub fn reference_instant(at: Option<&str>) -> Result<DateTime<FixedOffset>, Box<dyn std::error::Error>> {
    match at {
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map_err(|e| format!("invalid --at '{value}': {e}").into()),
        None => Ok(Local::now().fixed_offset()),
    }
}

/// Forecast from an explicit file, else the cache, else an empty series.
pub fn load_forecast(
    path: Option<&Path>,
    config: &Config,
    reference: DateTime<FixedOffset>,
) -> Result<ForecastSeries, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        return Ok(ForecastSeries::from_json_str(&content, *reference.offset())?);
    }

    let cache = ForecastCache::open_default()?;
    let max_age = TimeDelta::minutes(i64::from(config.forecast.cache_minutes));
    match cache.load_any() {
        Some(cached) => {
            if !cached.is_fresh(Utc::now(), max_age) {
                warn!(
                    fetched_at = %cached.fetched_at,
                    "cached forecast is stale; run `weatherslot forecast fetch`"
                );
            }
            Ok(cached.series)
        }
        None => {
            warn!("no forecast available; entries will have no weather");
            Ok(ForecastSeries::empty())
        }
    }
}
