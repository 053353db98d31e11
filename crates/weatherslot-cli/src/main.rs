use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "weatherslot", version, about = "Weekly schedule with hourly weather")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule files: validate, list, convert
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Fetch or inspect the cached forecast
    Forecast {
        #[command(subcommand)]
        action: commands::forecast::ForecastAction,
    },
    /// Match each schedule entry to a forecast sample
    Align(commands::align::AlignArgs),
    /// Temperature and rain statistics for a schedule
    Stats(commands::stats::StatsArgs),
    /// Rain alerts for upcoming entries
    Alerts(commands::alerts::AlertsArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Schedule { action } => commands::schedule::run(action),
        Commands::Forecast { action } => commands::forecast::run(action),
        Commands::Align(args) => commands::align::run(args),
        Commands::Stats(args) => commands::stats::run(args),
        Commands::Alerts(args) => commands::alerts::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
