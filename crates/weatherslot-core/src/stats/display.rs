use std::fmt;

use serde::Serialize;

use super::Statistics;

/// Human-readable rendering of [`Statistics`] in its display unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticsDisplay {
    pub avg_temperature: String,
    pub min_temperature: String,
    pub max_temperature: String,
    pub rainy_periods: String,
    pub total_precipitation: String,
}

impl StatisticsDisplay {
    pub fn new(stats: &Statistics) -> Self {
        let symbol = stats.display_unit.symbol();
        let temperature = |value: Option<f64>| match value {
            Some(v) => format!("{v:.1}{symbol}"),
            None => "-".to_string(),
        };
        Self {
            avg_temperature: temperature(stats.avg_in_display_unit()),
            min_temperature: temperature(stats.min_in_display_unit()),
            max_temperature: temperature(stats.max_in_display_unit()),
            rainy_periods: stats.rainy_periods.to_string(),
            total_precipitation: format!("{:.1} mm", stats.total_precipitation),
        }
    }
}

impl fmt::Display for StatisticsDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Average temperature: {}", self.avg_temperature)?;
        writeln!(
            f,
            "Temperature range:   {} .. {}",
            self.min_temperature, self.max_temperature
        )?;
        writeln!(f, "Rainy periods:       {}", self.rainy_periods)?;
        write!(f, "Total precipitation: {}", self.total_precipitation)
    }
}
