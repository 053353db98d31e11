use chrono::{DateTime, Days, FixedOffset, NaiveDate};
use clap::Args;
use weatherslot_core::storage::data_dir;
use weatherslot_core::{AlertDigest, AlertHistory, RainAlertPlanner};

use super::inputs::InputArgs;

#[derive(Args)]
pub struct AlertsArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Date to check (YYYY-MM-DD); defaults to the day after the reference
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Show alerts without recording them as delivered
    #[arg(long)]
    pub dry_run: bool,
    /// Forget previously delivered alerts first
    #[arg(long)]
    pub reset_history: bool,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: AlertsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = args.input.load()?;
    let notifications = &loaded.config.notifications;
    if !notifications.enabled || !notifications.rain_alerts {
        println!("rain alerts are disabled (notifications.enabled / notifications.rain_alerts)");
        return Ok(());
    }

    let date = match args.date {
        Some(date) => date,
        None => next_day_in_zone(loaded.reference, loaded.alignment.zone)
            .ok_or("reference date out of range")?,
    };

    let planner = RainAlertPlanner::new(loaded.config.classifier()?);
    let planned = planner.plan(&loaded.alignment.entries, date);

    let history_path = data_dir()?.join("alert_history.json");
    let mut history = if args.reset_history {
        AlertHistory::default()
    } else {
        AlertHistory::load(&history_path)
    };
    history.prune_before(date);
    let fresh = history.filter_new(planned);
    if !args.dry_run {
        history.save(&history_path)?;
    }

    let digest = AlertDigest::summarize(&fresh);
    if args.json {
        let output = serde_json::json!({ "date": date, "alerts": fresh, "digest": digest });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match digest {
        Some(digest) => {
            println!("{}", digest.title);
            println!("{}", digest.message());
        }
        None => println!("no new rain alerts for {date}"),
    }
    Ok(())
}

/// The day after `reference`, as a calendar date in `zone`.
fn next_day_in_zone(reference: DateTime<FixedOffset>, zone: FixedOffset) -> Option<NaiveDate> {
    reference
        .with_timezone(&zone)
        .date_naive()
        .checked_add_days(Days::new(1))
}
