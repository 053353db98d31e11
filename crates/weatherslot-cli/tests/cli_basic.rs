//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with HOME pointed at a temporary directory,
//! so config and cache files never touch the real user profile.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_weatherslot"))
        .args(args)
        .env("HOME", home)
        .env_remove("WEATHERSLOT_ENV")
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

const SCHEDULE: &str = r#"{"schedule": [
    {"day": "Monday", "time": "08:00-10:00", "subject": "Math", "location": "Room 1"},
    {"day": "Luni", "time": "11:00-12:00", "subject": "Art"},
    {"day": "Someday", "time": "11:00-12:00", "subject": "Ghost"}
]}"#;

const FORECAST: &str = r#"{
    "utc_offset_seconds": 10800,
    "hourly": [
        {"datetime": "2025-06-02T08:00", "temperature": 14.0, "precipitation_probability": 85,
         "precipitation": 1.5, "weather_code": 63, "wind_speed": 12.0},
        {"datetime": "2025-06-02T11:00", "temperature": 19.0, "precipitation_probability": 5,
         "precipitation": 0.0, "weather_code": 1, "wind_speed": 8.0}
    ]
}"#;

fn fixtures(dir: &Path) -> (String, String) {
    let schedule = dir.join("schedule.json");
    let forecast = dir.join("forecast.json");
    std::fs::write(&schedule, SCHEDULE).unwrap();
    std::fs::write(&forecast, FORECAST).unwrap();
    (
        schedule.to_string_lossy().into_owned(),
        forecast.to_string_lossy().into_owned(),
    )
}

#[test]
fn test_schedule_check_reports_invalid_rows() {
    let home = tempfile::tempdir().unwrap();
    let (schedule, _) = fixtures(home.path());

    let (stdout, stderr, code) = run_cli(home.path(), &["schedule", "check", &schedule]);
    assert_ne!(code, 0);
    assert!(stdout.contains("3 entries, 2 valid, 1 invalid"));
    assert!(stdout.contains("Someday"));
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_align_json() {
    let home = tempfile::tempdir().unwrap();
    let (schedule, forecast) = fixtures(home.path());

    let (stdout, _, code) = run_cli(
        home.path(),
        &[
            "align",
            &schedule,
            "--forecast",
            &forecast,
            "--at",
            "2025-06-02T07:00:00+03:00",
            "--json",
        ],
    );
    assert_eq!(code, 0);

    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["zone_source"], "forecast");
    let entries = parsed["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["resolved_date"], "2025-06-02");
    assert_eq!(entries[0]["matched_sample"]["temperature"], 14.0);
    assert_eq!(entries[1]["matched_sample"]["temperature"], 19.0);
    assert!(entries[2]["matched_sample"].is_null());
    assert!(entries[2]["error"].is_string());
}

#[test]
fn test_align_csv() {
    let home = tempfile::tempdir().unwrap();
    let (schedule, forecast) = fixtures(home.path());

    let (stdout, _, code) = run_cli(
        home.path(),
        &[
            "align",
            &schedule,
            "--forecast",
            &forecast,
            "--at",
            "2025-06-02T07:00:00+03:00",
            "--csv",
        ],
    );
    assert_eq!(code, 0);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "day,time,subject,date,temperature");
    assert_eq!(lines[1], "Monday,08:00-10:00,Math,2025-06-02,14.0");
    assert_eq!(lines[2], "Luni,11:00-12:00,Art,2025-06-02,19.0");
    assert_eq!(lines[3], "Someday,11:00-12:00,Ghost,,");
}

#[test]
fn test_stats_json() {
    let home = tempfile::tempdir().unwrap();
    let (schedule, forecast) = fixtures(home.path());

    let (stdout, _, code) = run_cli(
        home.path(),
        &[
            "stats",
            &schedule,
            "--forecast",
            &forecast,
            "--at",
            "2025-06-02T07:00:00+03:00",
            "--json",
        ],
    );
    assert_eq!(code, 0);

    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["statistics"]["rainy_periods"], 1);
    assert_eq!(parsed["statistics"]["avg_temperature"], 16.5);
    assert_eq!(parsed["display"]["avg_temperature"], "16.5°C");
}

#[test]
fn test_alerts_are_delivered_once() {
    let home = tempfile::tempdir().unwrap();
    let (schedule, forecast) = fixtures(home.path());
    let args = [
        "alerts",
        schedule.as_str(),
        "--forecast",
        forecast.as_str(),
        "--at",
        "2025-06-02T07:00:00+03:00",
        "--date",
        "2025-06-02",
    ];

    let (first, _, code) = run_cli(home.path(), &args);
    assert_eq!(code, 0);
    assert!(first.contains("Rain risk"));
    assert!(first.contains("Math - 08:00-10:00"));

    let (second, _, code) = run_cli(home.path(), &args);
    assert_eq!(code, 0);
    assert!(second.contains("no new rain alerts"));
}

#[test]
fn test_config_set_get_reset() {
    let home = tempfile::tempdir().unwrap();

    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "forecast.days"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "7");

    let (_, _, code) = run_cli(home.path(), &["config", "set", "units.temperature", "fahrenheit"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "units.temperature"]);
    assert_eq!(stdout.trim(), "fahrenheit");

    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "forecast.days", "99"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("forecast.days"));

    let (_, _, code) = run_cli(home.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "units.temperature"]);
    assert_eq!(stdout.trim(), "celsius");
}
