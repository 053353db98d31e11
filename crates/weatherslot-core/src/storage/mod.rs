mod config;
mod forecast_cache;

pub use config::{
    AlignmentConfig, Config, ForecastConfig, LocationConfig, NotificationsConfig, UnitsConfig,
    MAX_FORECAST_DAYS,
};
pub use forecast_cache::{CachedForecast, ForecastCache};

use std::path::PathBuf;

use crate::error::CoreError;

/// Returns `~/.config/weatherslot[-dev]/` based on WEATHERSLOT_ENV.
///
/// Set WEATHERSLOT_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, CoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("WEATHERSLOT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("weatherslot-dev")
    } else {
        base_dir.join("weatherslot")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
