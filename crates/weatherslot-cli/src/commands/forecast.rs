use chrono::Utc;
use clap::Subcommand;
use weatherslot_core::integrations::{ForecastProvider, OpenMeteoClient};
use weatherslot_core::{CachedForecast, Config, ForecastCache, SampleDisplay};

#[derive(Subcommand)]
pub enum ForecastAction {
    /// Download a fresh forecast into the cache
    Fetch {
        /// Days ahead (1-16); defaults to the configured value
        #[arg(long)]
        days: Option<u32>,
        /// City name; defaults to the configured location
        #[arg(long)]
        city: Option<String>,
    },
    /// Print the cached forecast
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: ForecastAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let cache = ForecastCache::open_default()?;

    match action {
        ForecastAction::Fetch { days, city } => {
            let mut location = config.location.clone();
            if let Some(city) = city {
                location.name = city;
                location.latitude = None;
                location.longitude = None;
            }
            let days = days.unwrap_or(config.forecast.days);
            let label = location.name.clone();

            let client = OpenMeteoClient::new(location)?;
            let runtime = tokio::runtime::Runtime::new()?;
            let series = runtime.block_on(client.fetch(days))?;

            cache.store(&CachedForecast {
                fetched_at: Utc::now(),
                location: label.clone(),
                series,
            })?;
            println!("forecast for {label} saved to {}", cache.path().display());
        }
        ForecastAction::Show { json } => {
            let cached = cache
                .load_any()
                .ok_or("no cached forecast; run `weatherslot forecast fetch`")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&cached)?);
                return Ok(());
            }

            let age = cached.age(Utc::now()).num_minutes();
            println!("{} (fetched {age} min ago)", cached.location);
            let units = config.display_units();
            for sample in cached.series.hourly() {
                let cells = SampleDisplay::new(Some(sample), units);
                println!(
                    "{}  {:>8}  {:>4}  {:>10}  {}",
                    sample.timestamp.format("%a %Y-%m-%d %H:%M"),
                    cells.temperature,
                    cells.precipitation,
                    cells.wind,
                    cells.conditions
                );
            }
        }
    }
    Ok(())
}
