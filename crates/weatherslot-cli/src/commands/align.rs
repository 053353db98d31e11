use clap::Args;
use serde_json::json;
use weatherslot_core::enriched_to_csv;

use super::inputs::InputArgs;

#[derive(Args)]
pub struct AlignArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Output as JSON
    #[arg(long, conflicts_with = "csv")]
    pub json: bool,
    /// Output as CSV (day, time, subject, date, temperature)
    #[arg(long)]
    pub csv: bool,
}

pub fn run(args: AlignArgs) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = args.input.load()?;
    let alignment = &loaded.alignment;

    if args.json {
        let output = json!({
            "reference": loaded.reference.to_rfc3339(),
            "zone": alignment.zone.to_string(),
            "zone_source": alignment.zone_source,
            "entries": alignment.entries,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if args.csv {
        print!(
            "{}",
            enriched_to_csv(&alignment.entries, loaded.config.units.temperature)?
        );
        return Ok(());
    }

    let units = loaded.config.display_units();
    let classifier = loaded.config.classifier()?;
    for entry in &alignment.entries {
        let raw = entry.record.raw();
        let date = entry
            .resolved_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into());
        let cells = entry.display(units);
        let rain = entry
            .rain_risk(&classifier)
            .filter(|r| r.is_rainy)
            .map(|r| r.severity.label())
            .unwrap_or_default();
        println!(
            "{:<10} {:<11} {:<11} {:<20} {:>8} {:>4} {:>10}  {} {}",
            raw.day,
            raw.time,
            date,
            raw.subject,
            cells.temperature,
            cells.precipitation,
            cells.wind,
            cells.conditions,
            rain
        );
        if let Some(err) = entry.record.error() {
            println!("           ! {err}");
        }
    }
    Ok(())
}
