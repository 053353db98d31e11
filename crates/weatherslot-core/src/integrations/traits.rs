use crate::error::CoreError;
use crate::forecast::ForecastSeries;

/// Every forecast source implements this trait.
/// Providers do network I/O only; the returned series is validated and in
/// canonical units (°C, mm, km/h).
#[allow(async_fn_in_trait)]
pub trait ForecastProvider {
    /// Unique identifier (e.g. "open-meteo").
    fn name(&self) -> &str;

    /// Fetch hourly and daily samples covering the next `days` days.
    async fn fetch(&self, days: u32) -> Result<ForecastSeries, CoreError>;
}
