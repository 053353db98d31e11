//! WMO weather interpretation codes.

/// Drizzle, rain and rain-shower codes.
pub const RAIN_CODES: [u16; 9] = [51, 53, 55, 61, 63, 65, 80, 81, 82];
/// Codes that imply at least moderate rain.
pub const MODERATE_RAIN_CODES: [u16; 2] = [63, 81];
/// Codes that imply heavy rain.
pub const HEAVY_RAIN_CODES: [u16; 2] = [65, 82];
/// Thunderstorm codes, with and without hail.
pub const THUNDERSTORM_CODES: [u16; 3] = [95, 96, 99];

/// Human-readable description for a WMO code.
pub fn describe(code: u16) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
