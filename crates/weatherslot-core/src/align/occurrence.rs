//! Next-occurrence date resolution for weekly entries.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};

/// Date on which a weekly slot `(day, start)` next occurs, seen from `reference`.
///
/// A slot on the reference weekday resolves to the reference date unless its
/// start is already past, compared at minute precision; then it rolls to next
/// week. The result is always within 7 days of the reference date.
pub fn next_occurrence(day: Weekday, start: NaiveTime, reference: NaiveDateTime) -> Option<NaiveDate> {
    let current = reference.weekday().num_days_from_monday();
    let target = day.num_days_from_monday();
    let mut days_ahead = (target + 7 - current) % 7;

    let reference_minute = NaiveTime::from_hms_opt(reference.hour(), reference.minute(), 0)?;
    if days_ahead == 0 && start < reference_minute {
        days_ahead = 7;
    }

    reference.date().checked_add_days(Days::new(u64::from(days_ahead)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // 2025-06-04 is a Wednesday.

    #[test]
    fn later_weekday_this_week() {
        let resolved = next_occurrence(Weekday::Fri, hm(8, 0), at("2025-06-04", "14:00:00"));
        assert_eq!(resolved, Some(date("2025-06-06")));
    }

    #[test]
    fn earlier_weekday_wraps_to_next_week() {
        let resolved = next_occurrence(Weekday::Mon, hm(8, 0), at("2025-06-04", "14:00:00"));
        assert_eq!(resolved, Some(date("2025-06-09")));
    }

    #[test]
    fn same_day_slot_already_started_rolls_a_week() {
        let resolved = next_occurrence(Weekday::Wed, hm(8, 0), at("2025-06-04", "14:00:00"));
        assert_eq!(resolved, Some(date("2025-06-11")));
    }

    #[test]
    fn same_day_slot_still_ahead_stays_today() {
        let resolved = next_occurrence(Weekday::Wed, hm(16, 0), at("2025-06-04", "14:00:00"));
        assert_eq!(resolved, Some(date("2025-06-04")));
    }

    #[test]
    fn slot_starting_this_minute_counts_as_today() {
        let resolved = next_occurrence(Weekday::Wed, hm(14, 0), at("2025-06-04", "14:00:45"));
        assert_eq!(resolved, Some(date("2025-06-04")));
    }

    #[test]
    fn week_rollover_across_month_and_year() {
        // 2025-12-31 is a Wednesday.
        let resolved = next_occurrence(Weekday::Mon, hm(9, 0), at("2025-12-31", "10:00:00"));
        assert_eq!(resolved, Some(date("2026-01-05")));
    }
}
