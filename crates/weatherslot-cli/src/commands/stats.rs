use clap::Args;
use serde_json::json;
use weatherslot_core::{StatisticsAggregator, StatisticsDisplay};

use super::inputs::InputArgs;

#[derive(Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: StatsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = args.input.load()?;
    let aggregator = StatisticsAggregator::new(loaded.config.classifier()?);
    let stats = aggregator.aggregate(&loaded.alignment.entries, loaded.config.units.temperature);
    let display = StatisticsDisplay::new(&stats);

    if args.json {
        let output = json!({ "statistics": stats, "display": display });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{display}");
    }
    Ok(())
}
