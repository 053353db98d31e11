//! # Weatherslot Core Library
//!
//! This library enriches a weekly recurring schedule with hourly weather
//! forecasts. It follows a CLI-first philosophy: every operation is available
//! through the standalone `weatherslot` binary, which is a thin layer over
//! this crate.
//!
//! ## Architecture
//!
//! - **Schedule**: Loading and validating weekly entries from JSON or CSV
//! - **Forecast**: Normalizing provider payloads into a time-ordered series
//! - **Alignment**: Resolving each entry's next occurrence and matching it to
//!   the nearest forecast sample
//! - **Rain / Stats / Alerts**: Classification, aggregation and notification
//!   planning over aligned entries
//! - **Storage**: TOML configuration and the forecast cache
//! - **Integrations**: Forecast providers behind a trait
//!
//! The computational core never reads the clock; every operation that depends
//! on "now" takes the reference instant as a parameter.
//!
//! ## Key Components
//!
//! - [`ScheduleStore`]: Loaded schedule records
//! - [`ForecastSeries`]: Validated hourly and daily samples
//! - [`Aligner`]: Schedule/forecast alignment
//! - [`RainClassifier`]: Rain risk classification
//! - [`Config`]: Application configuration management
//! - [`ForecastProvider`]: Trait for forecast sources

pub mod alerts;
pub mod align;
pub mod error;
pub mod forecast;
pub mod integrations;
pub mod rain;
pub mod schedule;
pub mod stats;
pub mod storage;
pub mod units;

pub use alerts::{AlertDigest, AlertHistory, RainAlert, RainAlertPlanner};
pub use align::{enriched_to_csv, AcceptancePolicy, Aligner, Alignment, EnrichedEntry, ZoneSource};
pub use error::{ConfigError, CoreError, ForecastError, ScheduleError, ValidationError};
pub use forecast::{DailySample, ForecastSample, ForecastSeries};
pub use integrations::{ForecastProvider, OpenMeteoClient};
pub use rain::{RainClassifier, RainRisk, RainSeverity, RainThresholds};
pub use schedule::{EntryError, ScheduleEntry, ScheduleRecord, ScheduleStore, TimeRange};
pub use stats::{Statistics, StatisticsAggregator, StatisticsDisplay};
pub use storage::{CachedForecast, Config, ForecastCache};
pub use units::{DisplayUnits, SampleDisplay, TemperatureUnit, WindUnit};

/// English description for a WMO weather code ("Unknown" when unlisted).
pub fn weather_description(code: u16) -> &'static str {
    forecast::wmo::describe(code)
}
