//! Time bucketing at the journal's fixed civil offset.
//!
//! Timestamps are stored in UTC. Every hour/day bucket is computed on the
//! wall clock at UTC-3, with no DST and no per-user zone. Entries recorded
//! between 00:00 and 02:59 UTC therefore land on the previous civil day.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike, Utc, Weekday};
use serde::Serialize;

use crate::error::{Error, Result};

/// Hours subtracted from UTC to get civil time.
pub const LOCAL_OFFSET_HOURS: i64 = 3;

/// Weekday names, Monday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Abbreviated weekday names, Monday first.
pub const WEEKDAY_SHORT: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Abbreviated month names, January first.
pub const MONTH_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Convert a UTC instant to civil wall-clock time.
///
/// `None` when the shifted instant falls before the earliest representable
/// date; callers treat such an entry as untimed.
pub fn to_local_civil(ts: DateTime<Utc>) -> Option<NaiveDateTime> {
    ts.naive_utc().checked_sub_signed(TimeDelta::hours(LOCAL_OFFSET_HOURS))
}

/// Civil date of a UTC instant (e.g., "today" for report callers).
pub fn local_date_of(ts: DateTime<Utc>) -> Option<NaiveDate> {
    to_local_civil(ts).map(|t| t.date())
}

/// `date` moved by `days`, or `None` past the representable calendar.
pub fn checked_offset_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    TimeDelta::try_days(days).and_then(|delta| date.checked_add_signed(delta))
}

/// `date` moved by `days`, saturating at the ends of the calendar.
pub fn offset_days(date: NaiveDate, days: i64) -> NaiveDate {
    checked_offset_days(date, days).unwrap_or(if days < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

/// Hour of day (0-23) of a civil time.
pub fn hour_of_day(local: NaiveDateTime) -> usize {
    local.hour() as usize
}

/// Hour with minutes as a fraction, for point plotting (e.g., 14:30 -> 14.5).
pub fn fractional_hour(local: NaiveDateTime) -> f64 {
    local.hour() as f64 + local.minute() as f64 / 60.0
}

/// ISO weekday of a date.
pub fn day_of_week(date: NaiveDate) -> Weekday {
    date.weekday()
}

/// Bucket index of a date's weekday (Monday = 0, Sunday = 6).
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

/// Full English name of a month (1-12).
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

/// Chart label for an hour bucket ("07:00").
pub fn hour_label(hour: usize) -> String {
    format!("{:02}:00", hour)
}

/// Labels for all 24 hour buckets.
pub fn hour_labels() -> Vec<String> {
    (0..24).map(hour_label).collect()
}

/// Monday and Sunday of the ISO week containing `date`.
pub fn iso_week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = offset_days(date, -(weekday_index(date) as i64));
    (start, offset_days(start, 6))
}

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::InvalidPeriod(format!("{}-{:02} is not a month", year, month)))?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or_else(|| Error::InvalidPeriod(format!("{}-{:02} is not a month", year, month)))?;
    let last = next_first
        .pred_opt()
        .ok_or_else(|| Error::InvalidPeriod(format!("{}-{:02} is not a month", year, month)))?;
    Ok((first, last))
}

/// Legacy week-of-month addressing.
///
/// Week 1 starts on the first Monday of the month; week N starts N-1 weeks
/// later. The end is clipped to the month's last day. Fails if the week
/// does not start inside the month.
pub fn week_of_month_bounds(year: i32, month: u32, week: u32) -> Result<(NaiveDate, NaiveDate)> {
    let (first_day, last_day) = month_bounds(year, month)?;
    if week == 0 {
        return Err(Error::InvalidPeriod("week numbers start at 1".to_string()));
    }

    let missing = || {
        Error::InvalidPeriod(format!(
            "week {} does not exist in {} {}",
            week,
            month_name(month),
            year
        ))
    };

    let days_to_first_monday = (7 - weekday_index(first_day) as i64) % 7;
    let week_start = TimeDelta::try_weeks(week as i64 - 1)
        .and_then(|delta| first_day.checked_add_signed(delta))
        .and_then(|d| checked_offset_days(d, days_to_first_monday))
        .ok_or_else(missing)?;

    if week_start.month() != month || week_start.year() != year {
        return Err(missing());
    }

    let week_end = offset_days(week_start, 6).min(last_day);
    Ok((week_start, week_end))
}

/// Parse a caller-supplied `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate(s.to_string()))
}

/// Parse a stored timestamp leniently.
///
/// Accepts RFC 3339 (including a trailing `Z`) and naive
/// `YYYY-MM-DD HH:MM:SS[.fff]` / `YYYY-MM-DDTHH:MM:SS[.fff]`, which are
/// taken as UTC. Anything else yields `None`.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Inclusive range of civil dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `[today - days, today]`, the window shape used by "last N days" reports.
    ///
    /// A window reaching past the start of the calendar is clamped to it; a
    /// negative `days` gives an empty window.
    pub fn last_days(today: NaiveDate, days: i64) -> Self {
        let start = match days.checked_neg() {
            Some(back) => offset_days(today, back),
            None => NaiveDate::MAX,
        };
        Self { start, end: today }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// "Mar 04 - Mar 10" style label.
    pub fn short_label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%b %d"),
            self.end.format("%b %d")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_early_utc_hours_fall_on_previous_day() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 2, 59, 0).unwrap();
        let local = to_local_civil(ts).unwrap();
        assert_eq!(local.date(), date(2023, 12, 31));
        assert_eq!(hour_of_day(local), 23);

        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 3, 0, 0).unwrap();
        assert_eq!(local_date_of(ts), Some(date(2024, 1, 1)));
        assert_eq!(hour_of_day(to_local_civil(ts).unwrap()), 0);
    }

    #[test]
    fn test_fractional_hour() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 2, 17, 45, 0).unwrap();
        assert_eq!(fractional_hour(to_local_civil(ts).unwrap()), 14.75);
    }

    #[test]
    fn test_weekday_index_is_monday_first() {
        // 2024-03-04 is a Monday
        assert_eq!(weekday_index(date(2024, 3, 4)), 0);
        assert_eq!(weekday_index(date(2024, 3, 10)), 6);
        assert_eq!(day_of_week(date(2024, 3, 10)), Weekday::Sun);
    }

    #[test]
    fn test_iso_week_bounds() {
        let (start, end) = iso_week_bounds(date(2024, 3, 7));
        assert_eq!(start, date(2024, 3, 4));
        assert_eq!(end, date(2024, 3, 10));

        let (start, end) = iso_week_bounds(date(2024, 3, 4));
        assert_eq!(start, date(2024, 3, 4));
        assert_eq!(end, date(2024, 3, 10));
    }

    #[test]
    fn test_month_bounds_handles_month_lengths() {
        assert_eq!(
            month_bounds(2024, 2).unwrap(),
            (date(2024, 2, 1), date(2024, 2, 29))
        );
        assert_eq!(
            month_bounds(2023, 2).unwrap(),
            (date(2023, 2, 1), date(2023, 2, 28))
        );
        assert_eq!(
            month_bounds(2024, 12).unwrap(),
            (date(2024, 12, 1), date(2024, 12, 31))
        );
        assert_eq!(month_bounds(2024, 4).unwrap().1, date(2024, 4, 30));
        assert!(month_bounds(2024, 13).is_err());
    }

    #[test]
    fn test_week_of_month_bounds() {
        // October 2025 starts on a Wednesday; first Monday is the 6th
        assert_eq!(
            week_of_month_bounds(2025, 10, 1).unwrap(),
            (date(2025, 10, 6), date(2025, 10, 12))
        );
        // Week 4 starts on the 27th and is clipped to the 31st
        assert_eq!(
            week_of_month_bounds(2025, 10, 4).unwrap(),
            (date(2025, 10, 27), date(2025, 10, 31))
        );
        assert!(matches!(
            week_of_month_bounds(2025, 10, 5),
            Err(Error::InvalidPeriod(_))
        ));
        assert!(week_of_month_bounds(2025, 10, 0).is_err());
    }

    #[test]
    fn test_parse_date_errors_are_invalid_date() {
        assert_eq!(parse_date("2024-02-29").unwrap(), date(2024, 2, 29));
        assert!(matches!(parse_date("2023-02-29"), Err(Error::InvalidDate(_))));
        assert!(matches!(parse_date("yesterday"), Err(Error::InvalidDate(_))));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-06-01T12:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-01T09:30:00-03:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-01 12:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-01T12:30:00.000"), Some(expected));
        assert_eq!(parse_timestamp("garbage"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::last_days(date(2024, 3, 10), 7);
        assert_eq!(range.start, date(2024, 3, 3));
        assert!(range.contains(date(2024, 3, 3)));
        assert!(range.contains(date(2024, 3, 10)));
        assert!(!range.contains(date(2024, 3, 11)));
        assert_eq!(range.short_label(), "Mar 03 - Mar 10");
    }

    #[test]
    fn test_hour_labels() {
        let labels = hour_labels();
        assert_eq!(labels.len(), 24);
        assert_eq!(labels[0], "00:00");
        assert_eq!(labels[23], "23:00");
    }

    #[test]
    fn test_earliest_instant_has_no_civil_time() {
        let earliest = NaiveDate::MIN.and_hms_opt(0, 0, 0).unwrap().and_utc();
        assert_eq!(to_local_civil(earliest), None);
        assert_eq!(local_date_of(earliest), None);

        let later = earliest + TimeDelta::hours(LOCAL_OFFSET_HOURS);
        assert_eq!(local_date_of(later), Some(NaiveDate::MIN));
    }

    #[test]
    fn test_huge_windows_are_clamped() {
        let today = date(2024, 3, 21);
        let range = DateRange::last_days(today, 200_000_000);
        assert_eq!(range.start, NaiveDate::MIN);
        assert_eq!(range.end, today);

        let range = DateRange::last_days(today, i64::MAX);
        assert_eq!(range.start, NaiveDate::MIN);

        let empty = DateRange::last_days(today, -3);
        assert!(!empty.contains(today));
        assert!(!DateRange::last_days(today, i64::MIN).contains(today));
    }

    #[test]
    fn test_huge_week_numbers_are_invalid() {
        assert!(matches!(
            week_of_month_bounds(2024, 3, 20_000_000),
            Err(Error::InvalidPeriod(_))
        ));
        assert!(matches!(
            week_of_month_bounds(2024, 3, u32::MAX),
            Err(Error::InvalidPeriod(_))
        ));
    }

    #[test]
    fn test_offset_days_saturates() {
        assert_eq!(offset_days(date(2024, 3, 1), -1), date(2024, 2, 29));
        assert_eq!(offset_days(NaiveDate::MAX, 1), NaiveDate::MAX);
        assert_eq!(offset_days(NaiveDate::MIN, -7), NaiveDate::MIN);
        assert_eq!(checked_offset_days(NaiveDate::MIN, -1), None);
        assert_eq!(iso_week_bounds(NaiveDate::MAX).1, NaiveDate::MAX);
    }
}
