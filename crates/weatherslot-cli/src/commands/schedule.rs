use std::path::PathBuf;

use clap::Subcommand;
use weatherslot_core::schedule::parse_weekday;
use weatherslot_core::ScheduleStore;

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Validate a schedule file and report bad rows
    Check {
        /// Schedule file (.json or .csv)
        file: PathBuf,
    },
    /// List schedule entries
    Show {
        file: PathBuf,
        /// Only entries on this day (e.g. "monday", "Marți")
        #[arg(long)]
        day: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List distinct time slots, sorted
    Slots { file: PathBuf },
    /// Convert to another format, chosen by the output extension
    Export {
        file: PathBuf,
        /// Output file (.json or .csv)
        output: PathBuf,
    },
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ScheduleAction::Check { file } => {
            let store = ScheduleStore::load(&file)?;
            let invalid: Vec<_> = store.invalid_records().collect();
            println!(
                "{} entries, {} valid, {} invalid",
                store.len(),
                store.len() - invalid.len(),
                invalid.len()
            );
            for (index, record) in &invalid {
                if let Some(err) = record.error() {
                    println!("  row {index}: {err}");
                }
            }
            store.validate_strict()?;
        }
        ScheduleAction::Show { file, day, json } => {
            let store = ScheduleStore::load(&file)?;
            let entries = match day {
                Some(name) => store.entries_for_day(parse_weekday(&name)?),
                None => store.entries().collect(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in entries {
                    println!(
                        "{:<4} {}  {}{}",
                        entry.day.to_string(),
                        entry.time_range,
                        entry.subject,
                        entry
                            .location
                            .as_deref()
                            .map(|l| format!(" @ {l}"))
                            .unwrap_or_default()
                    );
                }
            }
        }
        ScheduleAction::Slots { file } => {
            let store = ScheduleStore::load(&file)?;
            for slot in store.time_slots() {
                println!("{slot}");
            }
        }
        ScheduleAction::Export { file, output } => {
            let store = ScheduleStore::load(&file)?;
            store.export(&output)?;
            println!("exported {} entries to {}", store.len(), output.display());
        }
    }
    Ok(())
}
