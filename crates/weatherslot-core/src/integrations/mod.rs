pub mod open_meteo;
pub mod traits;

pub use open_meteo::{OpenMeteoClient, Place};
pub use traits::ForecastProvider;
