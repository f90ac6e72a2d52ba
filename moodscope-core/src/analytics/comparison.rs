//! Week-over-week comparisons.

use chrono::NaiveDate;
use serde::Serialize;

use super::aggregate::logging_streak_days;
use super::report::{mean, Buckets};
use super::{in_range, newest_first};
use crate::scale::round_to;
use crate::time::{self, DateRange, WEEKDAY_SHORT};
use crate::types::{MoodLabel, MoodObservation};

/// Number of calendar weeks in the four-week view.
const FOUR_WEEK_WINDOWS: i64 = 4;

/// Week-over-week changes smaller than this count as stable.
const QUICK_STATS_STABLE_BAND: f64 = 0.3;

fn values_in(observations: &[MoodObservation], range: DateRange) -> Vec<f64> {
    in_range(observations, range)
        .map(|o| o.mood_value() as f64)
        .collect()
}

/// The full calendar week before the one starting on `monday`.
fn previous_week_of(monday: NaiveDate) -> DateRange {
    DateRange::new(time::offset_days(monday, -7), time::offset_days(monday, -1))
}

// ============================================
// Four-week comparison
// ============================================

/// One calendar week of the four-week view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekWindow {
    /// "Mar 04 - Mar 10"
    pub label: String,
    /// Per-day average, Monday first; `None` for days without entries
    pub data: Vec<Option<f64>>,
    /// Window average (1 decimal), `None` when the week is empty
    pub average: Option<f64>,
    pub entries_count: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// The last four calendar weeks, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FourWeekComparison {
    /// "Mon".."Sun"
    pub labels: Vec<String>,
    pub weeks: Vec<WeekWindow>,
}

/// Split the four Monday-aligned weeks ending with the week of `today`.
///
/// Days of the current week after `today` are simply empty.
pub fn four_week_comparison(observations: &[MoodObservation], today: NaiveDate) -> FourWeekComparison {
    let (current_monday, _) = time::iso_week_bounds(today);

    let weeks = (0..FOUR_WEEK_WINDOWS)
        .rev()
        .map(|offset| {
            let start = time::offset_days(current_monday, -7 * offset);
            let range = DateRange::new(start, time::offset_days(start, 6));

            let mut days = Buckets::new(7);
            for obs in in_range(observations, range) {
                days.add(time::weekday_index(obs.local_date()), obs.mood_value() as f64);
            }
            let values = values_in(observations, range);

            WeekWindow {
                label: range.short_label(),
                data: days.gapped_means(2),
                average: mean(&values).map(|m| round_to(m, 1)),
                entries_count: values.len(),
                start_date: range.start,
                end_date: range.end,
            }
        })
        .collect();

    FourWeekComparison {
        labels: WEEKDAY_SHORT.iter().map(|d| d.to_string()).collect(),
        weeks,
    }
}

// ============================================
// Calendar week vs previous calendar week
// ============================================

/// Average and count for one side of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodStats {
    /// `0.0` when `count` is zero
    pub average: f64,
    pub count: usize,
}

impl PeriodStats {
    fn from_values(values: &[f64]) -> Self {
        Self {
            average: mean(values).map(|m| round_to(m, 2)).unwrap_or(0.0),
            count: values.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekComparison {
    pub current_week: PeriodStats,
    pub previous_week: PeriodStats,
    /// `0.0` unless both weeks have entries
    pub change: f64,
}

/// Monday..today against the whole previous calendar week.
pub fn week_comparison(observations: &[MoodObservation], today: NaiveDate) -> WeekComparison {
    let (monday, _) = time::iso_week_bounds(today);
    let current = values_in(observations, DateRange::new(monday, today));
    let previous = values_in(observations, previous_week_of(monday));

    let change = match (mean(&current), mean(&previous)) {
        (Some(c), Some(p)) => round_to(c - p, 2),
        _ => 0.0,
    };

    WeekComparison {
        current_week: PeriodStats::from_values(&current),
        previous_week: PeriodStats::from_values(&previous),
        change,
    }
}

// ============================================
// Dashboard quick stats
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodayStat {
    pub mood: MoodLabel,
    pub value: u8,
    /// Local "HH:MM", or "Unknown" for an entry without a timestamp
    pub time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekDirection {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendStat {
    pub direction: WeekDirection,
    pub change: f64,
}

/// Dashboard cards. Each part is `None` when it has nothing to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickStats {
    pub today: Option<TodayStat>,
    pub week: Option<PeriodStats>,
    pub trend: Option<TrendStat>,
}

pub fn quick_stats(observations: &[MoodObservation], today: NaiveDate) -> QuickStats {
    let today_stat = newest_first(observations)
        .into_iter()
        .find(|o| o.local_date() == today)
        .map(|latest| TodayStat {
            mood: latest.mood,
            value: latest.mood_value(),
            time: latest
                .local_time()
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
        });

    let (monday, _) = time::iso_week_bounds(today);
    let this_week = values_in(observations, DateRange::new(monday, today));
    let last_week = values_in(observations, previous_week_of(monday));

    let week = (!this_week.is_empty()).then(|| PeriodStats::from_values(&this_week));

    let trend = match (mean(&this_week), mean(&last_week)) {
        (Some(current), Some(previous)) => {
            let change = current - previous;
            let direction = if change.abs() < QUICK_STATS_STABLE_BAND {
                WeekDirection::Stable
            } else if change > 0.0 {
                WeekDirection::Up
            } else {
                WeekDirection::Down
            };
            Some(TrendStat {
                direction,
                change: round_to(change, 2),
            })
        }
        _ => None,
    };

    QuickStats {
        today: today_stat,
        week,
        trend,
    }
}

// ============================================
// Rolling seven days
// ============================================

/// Last seven days against the seven before, plus the logging streak.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingWeekComparison {
    /// Average over `[today - 7, today]`, `0.0` when empty
    pub this_week: f64,
    /// Average over `[today - 14, today - 8]`, `0.0` when empty
    pub last_week: f64,
    /// Consecutive logged days
    pub streak: usize,
}

/// Rolling windows of the last seven days and the seven before.
pub fn rolling_week_windows(today: NaiveDate) -> (DateRange, DateRange) {
    (
        DateRange::last_days(today, 7),
        DateRange::new(time::offset_days(today, -14), time::offset_days(today, -8)),
    )
}

pub fn rolling_week_comparison(
    observations: &[MoodObservation],
    today: NaiveDate,
) -> RollingWeekComparison {
    let (this_range, last_range) = rolling_week_windows(today);
    let average = |range| {
        mean(&values_in(observations, range))
            .map(|m| round_to(m, 2))
            .unwrap_or(0.0)
    };

    RollingWeekComparison {
        this_week: average(this_range),
        last_week: average(last_range),
        streak: logging_streak_days(observations),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testutil::{at, obs_at, obs_on};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_four_week_windows_oldest_first() {
        // Thursday 2024-03-28; current week starts Monday 2024-03-25
        let today = date(2024, 3, 28);
        let observations = vec![
            obs_on(date(2024, 3, 4), MoodLabel::VeryBad),
            obs_on(date(2024, 3, 25), MoodLabel::Well),
            obs_on(date(2024, 3, 25), MoodLabel::VeryWell),
            obs_on(date(2024, 3, 27), MoodLabel::Neutral),
        ];
        let report = four_week_comparison(&observations, today);

        assert_eq!(report.labels, vec!["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
        assert_eq!(report.weeks.len(), 4);
        assert_eq!(report.weeks[0].label, "Mar 04 - Mar 10");
        assert_eq!(report.weeks[0].data[0], Some(1.0));
        assert_eq!(report.weeks[3].label, "Mar 25 - Mar 31");

        let current = &report.weeks[3];
        // Two entries on Monday average instead of overwriting
        assert_eq!(current.data[0], Some(6.5));
        assert_eq!(current.data[1], None);
        assert_eq!(current.data[2], Some(4.0));
        assert_eq!(current.entries_count, 3);
        assert_eq!(current.average, Some(5.7));

        let empty = &report.weeks[1];
        assert_eq!(empty.average, None);
        assert_eq!(empty.entries_count, 0);
        assert!(empty.data.iter().all(Option::is_none));
    }

    #[test]
    fn test_week_comparison_zero_when_empty() {
        let today = date(2024, 3, 28);
        let observations = vec![obs_on(date(2024, 3, 26), MoodLabel::Well)];
        let report = week_comparison(&observations, today);
        assert_eq!(report.current_week.average, 6.0);
        assert_eq!(report.previous_week.average, 0.0);
        assert_eq!(report.previous_week.count, 0);
        assert_eq!(report.change, 0.0);

        let observations = vec![
            obs_on(date(2024, 3, 26), MoodLabel::Well),
            obs_on(date(2024, 3, 18), MoodLabel::SlightlyBad),
            obs_on(date(2024, 3, 24), MoodLabel::Neutral),
        ];
        let report = week_comparison(&observations, today);
        assert_eq!(report.previous_week.average, 3.5);
        assert_eq!(report.change, 2.5);
    }

    #[test]
    fn test_quick_stats_empty() {
        let stats = quick_stats(&[], date(2024, 3, 28));
        assert_eq!(stats.today, None);
        assert_eq!(stats.week, None);
        assert_eq!(stats.trend, None);

        let json = serde_json::to_value(&stats).unwrap();
        assert!(json["today"].is_null());
    }

    #[test]
    fn test_quick_stats_latest_today_and_trend() {
        let today = date(2024, 3, 28);
        let observations = vec![
            obs_at(at(2024, 3, 28, 12, 0), MoodLabel::Neutral),
            obs_at(at(2024, 3, 28, 21, 30), MoodLabel::Well),
            obs_at(at(2024, 3, 19, 12, 0), MoodLabel::Bad),
        ];
        let stats = quick_stats(&observations, today);

        let today_stat = stats.today.unwrap();
        assert_eq!(today_stat.mood, MoodLabel::Well);
        assert_eq!(today_stat.value, 6);
        assert_eq!(today_stat.time, "18:30");

        let week = stats.week.unwrap();
        assert_eq!(week.average, 5.0);
        assert_eq!(week.count, 2);

        let trend = stats.trend.unwrap();
        assert_eq!(trend.direction, WeekDirection::Up);
        assert_eq!(trend.change, 3.0);
    }

    #[test]
    fn test_quick_stats_small_change_is_stable() {
        let today = date(2024, 3, 28);
        let observations = vec![
            obs_on(date(2024, 3, 26), MoodLabel::Neutral),
            obs_on(date(2024, 3, 27), MoodLabel::Neutral),
            obs_on(date(2024, 3, 28), MoodLabel::SlightlyWell),
            obs_on(date(2024, 3, 20), MoodLabel::Neutral),
        ];
        let stats = quick_stats(&observations, today);
        let trend = stats.trend.unwrap();
        assert_eq!(trend.direction, WeekDirection::Stable);
        assert_eq!(trend.change, 0.33);
        assert_eq!(stats.today.unwrap().time, "Unknown");
    }

    #[test]
    fn test_quick_stats_decline_is_down() {
        let today = date(2024, 3, 28);
        let observations = vec![
            obs_on(date(2024, 3, 26), MoodLabel::Bad),
            obs_on(date(2024, 3, 20), MoodLabel::Well),
        ];
        let trend = quick_stats(&observations, today).trend.unwrap();
        assert_eq!(trend.direction, WeekDirection::Down);
        assert_eq!(trend.change, -4.0);
    }

    #[test]
    fn test_rolling_week_comparison() {
        let today = date(2024, 3, 28);
        let observations = vec![
            obs_on(date(2024, 3, 28), MoodLabel::Well),
            obs_on(date(2024, 3, 27), MoodLabel::VeryWell),
            obs_on(date(2024, 3, 18), MoodLabel::Bad),
        ];
        let report = rolling_week_comparison(&observations, today);
        assert_eq!(report.this_week, 6.5);
        assert_eq!(report.last_week, 2.0);
        assert_eq!(report.streak, 2);

        let empty = rolling_week_comparison(&[], today);
        assert_eq!(empty.this_week, 0.0);
        assert_eq!(empty.last_week, 0.0);
        assert_eq!(empty.streak, 0);
    }
}
