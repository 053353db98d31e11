//! Hourly/daily forecast representation and payload normalization.

mod payload;
mod series;
pub mod wmo;

pub use payload::{parse_timestamp, OpenMeteoDaily, OpenMeteoHourly, OpenMeteoResponse};
pub use series::{DailySample, ForecastSample, ForecastSeries};
