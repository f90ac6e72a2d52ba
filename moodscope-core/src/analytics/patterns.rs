//! Chart-ready pattern reports.
//!
//! Each report carries fixed `labels` plus a `data` series of the same
//! length. Weekly, hourly and daily reports leave empty buckets as gaps;
//! the monthly-for-year and weeks-of-month reports fill them with zero.
//! See [`super::report`] for the shared bucket rules.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::in_range;
use super::report::{gap_series, Buckets};
use super::trend::{analyze_series, TrendAnalysis};
use crate::error::Result;
use crate::time::{self, DateRange, MONTH_SHORT, WEEKDAY_NAMES};
use crate::types::{MoodLabel, MoodObservation};

/// Safety bound on Monday-aligned weeks in one month.
const MAX_WEEKS_PER_MONTH: usize = 6;

// ============================================
// Weekly (7 buckets, Monday first)
// ============================================

/// Average mood per weekday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyPattern {
    /// Weekday names, Monday first
    pub labels: Vec<String>,
    /// Same as `labels`, kept for chart consumers that read `days`
    pub days: Vec<String>,
    /// Average per weekday (2 decimals), `None` where no entry fell
    pub data: Vec<Option<f64>>,
    /// Entries per weekday
    pub counts: Vec<usize>,
    /// Human-readable period label
    pub period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

fn weekday_labels() -> Vec<String> {
    WEEKDAY_NAMES.iter().map(|d| d.to_string()).collect()
}

fn bucket_by_weekday<'a, I>(observations: I) -> Buckets
where
    I: IntoIterator<Item = &'a MoodObservation>,
{
    let mut buckets = Buckets::new(7);
    for obs in observations {
        buckets.add(time::weekday_index(obs.local_date()), obs.mood_value() as f64);
    }
    buckets
}

fn weekly_from_buckets(buckets: Buckets, period: String, range: Option<DateRange>) -> WeeklyPattern {
    WeeklyPattern {
        labels: weekday_labels(),
        days: weekday_labels(),
        data: buckets.gapped_means(2),
        counts: buckets.counts(),
        period,
        start_date: range.map(|r| r.start),
        end_date: range.map(|r| r.end),
    }
}

/// Weekday averages for entries inside `range`.
pub fn weekly_pattern(
    observations: &[MoodObservation],
    range: DateRange,
    period: impl Into<String>,
) -> WeeklyPattern {
    let buckets = bucket_by_weekday(in_range(observations, range));
    tracing::debug!(
        start = %range.start,
        end = %range.end,
        entries = buckets.total(),
        "Built weekly pattern"
    );
    weekly_from_buckets(buckets, period.into(), Some(range))
}

/// The seven days starting at `start`, labelled "Oct 21 - Oct 27, 2025".
pub fn weekly_pattern_for_week(observations: &[MoodObservation], start: NaiveDate) -> WeeklyPattern {
    let end = time::offset_days(start, 6);
    let label = format!("{} - {}", start.format("%b %d"), end.format("%b %d, %Y"));
    weekly_pattern(observations, DateRange::new(start, end), label)
}

/// Legacy week-of-month addressing, see [`time::week_of_month_bounds`].
pub fn weekly_pattern_for_week_of_month(
    observations: &[MoodObservation],
    year: i32,
    month: u32,
    week: u32,
) -> Result<WeeklyPattern> {
    let (start, end) = time::week_of_month_bounds(year, month, week)?;
    let label = format!("Week {} of {} {}", week, time::month_name(month), year);
    Ok(weekly_pattern(observations, DateRange::new(start, end), label))
}

/// Weekday averages over every observation.
pub fn weekly_pattern_all_time(observations: &[MoodObservation]) -> WeeklyPattern {
    let buckets = bucket_by_weekday(observations);
    weekly_from_buckets(buckets, "Average Mood by Day of Week (All Time)".to_string(), None)
}

// ============================================
// Monthly (12 buckets, zero for empty)
// ============================================

/// Average mood per calendar month of one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPattern {
    /// "Jan".."Dec"
    pub labels: Vec<String>,
    /// Average per month (1 decimal); `0.0` for months without entries
    pub data: Vec<f64>,
    pub period: String,
    pub year: i32,
}

pub fn monthly_pattern(observations: &[MoodObservation], year: i32) -> MonthlyPattern {
    let mut buckets = Buckets::new(12);
    for obs in observations {
        let date = obs.local_date();
        if date.year() == year {
            buckets.add(date.month0() as usize, obs.mood_value() as f64);
        }
    }

    MonthlyPattern {
        labels: MONTH_SHORT.iter().map(|m| m.to_string()).collect(),
        data: buckets.zeroed_means(1),
        period: format!("Monthly Mood Averages for {}", year),
        year,
    }
}

/// Monthly pattern with its fitted trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrends {
    #[serde(flatten)]
    pub pattern: MonthlyPattern,
    pub trend_analysis: TrendAnalysis,
}

/// Trend analysis of a monthly pattern.
///
/// A `0.0` slot means "no entries" (no mood maps to zero), so it is fitted
/// as a gap rather than as a reading.
pub fn monthly_trend_analysis(pattern: &MonthlyPattern) -> TrendAnalysis {
    let series: Vec<Option<f64>> = pattern
        .data
        .iter()
        .map(|v| if *v == 0.0 { None } else { Some(*v) })
        .collect();
    analyze_series(&series)
}

pub fn monthly_trends(observations: &[MoodObservation], year: i32) -> MonthlyTrends {
    let pattern = monthly_pattern(observations, year);
    let trend_analysis = monthly_trend_analysis(&pattern);
    MonthlyTrends {
        pattern,
        trend_analysis,
    }
}

// ============================================
// Weeks of a month (zero for empty)
// ============================================

/// Average mood per week of one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthWeeklyTrends {
    /// "Week 1".."Week N"
    pub labels: Vec<String>,
    /// Average per week (1 decimal); `0.0` for weeks without entries
    pub data: Vec<f64>,
    pub period: String,
    pub year: i32,
    pub month: u32,
}

/// Week boundaries used by [`weekly_trends_for_month`].
///
/// The first week runs from the 1st to the first Sunday (it may be a
/// single day); every later week starts on a Monday and is clipped to the
/// month's last day.
pub fn month_week_ranges(year: i32, month: u32) -> Result<Vec<DateRange>> {
    let (first_day, last_day) = time::month_bounds(year, month)?;

    let mut ranges = Vec::new();
    let mut start = first_day;
    while start <= last_day && ranges.len() < MAX_WEEKS_PER_MONTH {
        let (_, sunday) = time::iso_week_bounds(start);
        let end = sunday.min(last_day);
        ranges.push(DateRange::new(start, end));
        match end.succ_opt() {
            Some(next) => start = next,
            None => break,
        }
    }
    Ok(ranges)
}

pub fn weekly_trends_for_month(
    observations: &[MoodObservation],
    year: i32,
    month: u32,
) -> Result<MonthWeeklyTrends> {
    let ranges = month_week_ranges(year, month)?;

    let mut buckets = Buckets::new(ranges.len());
    for obs in observations {
        let date = obs.local_date();
        if let Some(index) = ranges.iter().position(|r| r.contains(date)) {
            buckets.add(index, obs.mood_value() as f64);
        }
    }

    Ok(MonthWeeklyTrends {
        labels: (1..=ranges.len()).map(|n| format!("Week {}", n)).collect(),
        data: buckets.zeroed_means(1),
        period: format!(
            "Weekly Mood Averages for {} {}",
            time::month_name(month),
            year
        ),
        year,
        month,
    })
}

// ============================================
// Hourly (24 buckets, gaps)
// ============================================

/// Average mood per civil hour of day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPattern {
    /// "00:00".."23:00"
    pub labels: Vec<String>,
    /// Average per hour (2 decimals), `None` where no entry fell
    pub data: Vec<Option<f64>>,
    pub counts: Vec<usize>,
    /// UTC dates of the earliest and latest bucketed entries
    pub date_range: Option<DateRange>,
    pub period: String,
}

fn hourly_from<'a, I>(observations: I, period: String) -> HourlyPattern
where
    I: IntoIterator<Item = &'a MoodObservation>,
{
    let mut buckets = Buckets::new(24);
    let mut earliest = None;
    let mut latest = None;
    let mut skipped = 0usize;

    for obs in observations {
        let (Some(ts), Some(local)) = (obs.timestamp, obs.local_time()) else {
            skipped += 1;
            continue;
        };
        let day = ts.date_naive();
        earliest = Some(earliest.map_or(day, |e: NaiveDate| e.min(day)));
        latest = Some(latest.map_or(day, |l: NaiveDate| l.max(day)));
        buckets.add(time::hour_of_day(local), obs.mood_value() as f64);
    }

    if skipped > 0 {
        tracing::debug!(skipped, "Skipped observations without timestamp in hourly pattern");
    }

    HourlyPattern {
        labels: time::hour_labels(),
        data: buckets.gapped_means(2),
        counts: buckets.counts(),
        date_range: earliest.zip(latest).map(|(s, e)| DateRange::new(s, e)),
        period,
    }
}

/// Hour-of-day averages over every observation.
pub fn hourly_pattern(observations: &[MoodObservation]) -> HourlyPattern {
    hourly_from(observations, "Average Mood Per Hour (All Time)".to_string())
}

/// Hour-of-day averages over the last `days` days.
pub fn hourly_pattern_window(
    observations: &[MoodObservation],
    today: NaiveDate,
    days: i64,
) -> HourlyPattern {
    hourly_from(
        in_range(observations, DateRange::last_days(today, days)),
        format!("Average Mood Per Hour (Last {} Days)", days),
    )
}

// ============================================
// Single day with minute precision
// ============================================

/// One entry positioned on the day's time axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodPoint {
    /// Civil hour with minutes as a fraction (14:30 -> 14.5)
    pub x: f64,
    /// Mood value
    pub y: u8,
    /// "HH:MM"
    pub time: String,
    pub mood: MoodLabel,
    pub notes: String,
    /// Civil timestamp
    pub timestamp: NaiveDateTime,
}

/// Every entry of one civil day, for point plotting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPattern {
    /// "00:00".."23:00" axis labels
    pub labels: Vec<String>,
    /// Hourly skeleton; always all gaps in this mode
    pub data: Vec<Option<f64>>,
    /// Entries in chronological order
    pub mood_points: Vec<MoodPoint>,
    pub period: String,
    pub total_entries: usize,
}

/// Parse `date` (`YYYY-MM-DD`) and build its daily pattern.
///
/// An unparsable date is an [`crate::Error::InvalidDate`], distinct from a
/// valid date with no entries.
pub fn daily_pattern(observations: &[MoodObservation], date: &str) -> Result<DailyPattern> {
    let date = time::parse_date(date)?;
    Ok(daily_pattern_on(observations, date))
}

pub fn daily_pattern_on(observations: &[MoodObservation], date: NaiveDate) -> DailyPattern {
    let mut points: Vec<MoodPoint> = observations
        .iter()
        .filter_map(|obs| {
            let local = obs.local_time()?;
            (local.date() == date).then(|| MoodPoint {
                x: time::fractional_hour(local),
                y: obs.mood_value(),
                time: local.format("%H:%M").to_string(),
                mood: obs.mood,
                notes: obs.notes.clone().unwrap_or_default(),
                timestamp: local,
            })
        })
        .collect();
    points.sort_by_key(|p| p.timestamp);

    let day = date.format("%Y-%m-%d");
    let period = if points.is_empty() {
        format!("Daily Patterns for {} (No data)", day)
    } else {
        format!("Daily Patterns for {}", day)
    };

    DailyPattern {
        labels: time::hour_labels(),
        data: gap_series(24),
        total_entries: points.len(),
        mood_points: points,
        period,
    }
}
