//! Scalar statistics over observation lists: streaks, averages, stability,
//! distributions, and the windowed pattern/summary reports built on them.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::correlation::{self, ContextPattern, DayPattern};
use super::patterns::{self, WeeklyPattern};
use super::report::mean;
use super::trend::linear_regression;
use super::{in_range, newest_first};
use crate::scale::{self, round_to, MoodClass, TrendDirection};
use crate::time::DateRange;
use crate::types::{MoodLabel, MoodObservation};

/// Number of consecutive good entries, scanning from the first one given.
///
/// Callers pass observations newest first; the order is not changed here.
/// Stops at the first entry below "slightly well".
pub fn streak<'a, I>(observations_newest_first: I) -> usize
where
    I: IntoIterator<Item = &'a MoodObservation>,
{
    observations_newest_first
        .into_iter()
        .take_while(|obs| scale::is_good(obs.mood_value()))
        .count()
}

/// Consecutive calendar days with at least one entry, counted back from
/// the most recent entry day.
pub fn logging_streak_days(observations: &[MoodObservation]) -> usize {
    let days: BTreeSet<NaiveDate> = observations.iter().map(|o| o.local_date()).collect();

    let mut streak = 0;
    let mut expected: Option<NaiveDate> = None;
    for day in days.iter().rev() {
        match expected {
            Some(e) if *day != e => break,
            _ => {}
        }
        streak += 1;
        expected = day.pred_opt();
        if expected.is_none() {
            break;
        }
    }
    streak
}

/// Per-day averaged mood statistics.
///
/// `total_entries` counts observations, so two entries on one day count
/// twice. Use `total_days` for the number of logged days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAverages {
    /// Mean of the per-day averages
    pub daily: f64,
    /// Mean of the per-day averages that are good (`>= 5`)
    pub good_days: f64,
    /// Mean of the per-day averages that are bad (`<= 3`)
    pub bad_days: f64,
    /// Number of observations, not days
    pub total_entries: usize,
    /// Number of distinct days
    pub total_days: usize,
}

/// Average per day first, then average the day averages.
pub fn daily_averages(observations: &[MoodObservation]) -> DailyAverages {
    let mut by_day: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for obs in observations {
        by_day
            .entry(obs.local_date())
            .or_default()
            .push(obs.mood_value() as f64);
    }

    let day_means: Vec<f64> = by_day.values().filter_map(|v| mean(v)).collect();
    let good: Vec<f64> = day_means
        .iter()
        .copied()
        .filter(|m| scale::classify(*m) == MoodClass::Good)
        .collect();
    let bad: Vec<f64> = day_means
        .iter()
        .copied()
        .filter(|m| scale::classify(*m) == MoodClass::Bad)
        .collect();

    let rounded = |values: &[f64]| mean(values).map(|m| round_to(m, 2)).unwrap_or(0.0);

    DailyAverages {
        daily: rounded(&day_means),
        good_days: rounded(&good),
        bad_days: rounded(&bad),
        total_entries: observations.len(),
        total_days: by_day.len(),
    }
}

/// Count of observations per label. Labels with no entries are absent.
pub fn distribution(observations: &[MoodObservation]) -> BTreeMap<MoodLabel, usize> {
    let mut counts = BTreeMap::new();
    for obs in observations {
        *counts.entry(obs.mood).or_insert(0) += 1;
    }
    counts
}

/// Sample variance (`n - 1` denominator); 0 with fewer than two values.
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// `10 - variance`, higher is steadier.
pub fn mood_stability(values: &[f64]) -> f64 {
    round_to(10.0 - round_to(sample_variance(values), 2), 2)
}

/// Mean mood and count over a date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodAverage {
    /// `None` when no observation fell in the range
    pub average: Option<f64>,
    pub count: usize,
}

/// Average mood over an inclusive civil-date range.
pub fn period_average(observations: &[MoodObservation], range: DateRange) -> PeriodAverage {
    let values: Vec<f64> = in_range(observations, range)
        .map(|o| o.mood_value() as f64)
        .collect();
    PeriodAverage {
        average: mean(&values).map(|m| round_to(m, 2)),
        count: values.len(),
    }
}

/// Average mood over the last `days` days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageMoodReport {
    pub average: Option<f64>,
    pub count: usize,
    pub period_days: i64,
}

pub fn average_mood(
    observations: &[MoodObservation],
    today: NaiveDate,
    days: i64,
) -> AverageMoodReport {
    let PeriodAverage { average, count } =
        period_average(observations, DateRange::last_days(today, days));
    AverageMoodReport {
        average,
        count,
        period_days: days,
    }
}

/// Label counts over the last `days` days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSummary {
    pub distribution: BTreeMap<MoodLabel, usize>,
    pub total: usize,
    pub period_days: i64,
}

pub fn distribution_summary(
    observations: &[MoodObservation],
    today: NaiveDate,
    days: i64,
) -> DistributionSummary {
    let window: Vec<MoodObservation> = in_range(observations, DateRange::last_days(today, days))
        .cloned()
        .collect();
    DistributionSummary {
        distribution: distribution(&window),
        total: window.len(),
        period_days: days,
    }
}

/// Trend label of the entry-indexed regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionTrendLabel {
    Improving,
    Stable,
    Declining,
    InsufficientData,
}

impl From<TrendDirection> for DistributionTrendLabel {
    fn from(direction: TrendDirection) -> Self {
        match direction {
            TrendDirection::Improving => DistributionTrendLabel::Improving,
            TrendDirection::Stable => DistributionTrendLabel::Stable,
            TrendDirection::Declining => DistributionTrendLabel::Declining,
        }
    }
}

/// Regression over the window's entries in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionTrend {
    pub trend: DistributionTrendLabel,
    pub slope: f64,
    pub period_days: i64,
}

/// Fit a line through the window's entries, one index per entry.
///
/// Uses the tighter `±0.05` slope threshold.
pub fn distribution_trend(
    observations: &[MoodObservation],
    today: NaiveDate,
    days: i64,
) -> DistributionTrend {
    let mut window: Vec<&MoodObservation> =
        in_range(observations, DateRange::last_days(today, days)).collect();

    if window.len() < 2 {
        return DistributionTrend {
            trend: DistributionTrendLabel::InsufficientData,
            slope: 0.0,
            period_days: days,
        };
    }

    window.sort_by_key(|o| (o.local_date(), o.timestamp));
    let series: Vec<Option<f64>> = window
        .iter()
        .map(|o| Some(o.mood_value() as f64))
        .collect();
    let regression = linear_regression(&series);

    DistributionTrend {
        trend: TrendDirection::from_distribution_slope(regression.slope).into(),
        slope: regression.slope,
        period_days: days,
    }
}

/// Windowed mood pattern analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodPatternAnalysis {
    pub period_days: i64,
    pub total_entries: usize,
    pub average_mood: f64,
    pub mood_stability: f64,
    pub day_patterns: Vec<DayPattern>,
    pub location_patterns: Vec<ContextPattern>,
    pub activity_patterns: Vec<ContextPattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MoodPatternAnalysis {
    fn empty(days: i64) -> Self {
        Self {
            period_days: days,
            total_entries: 0,
            average_mood: 0.0,
            mood_stability: 0.0,
            day_patterns: Vec::new(),
            location_patterns: Vec::new(),
            activity_patterns: Vec::new(),
            message: Some("No mood data found for analysis".to_string()),
        }
    }
}

/// Average, stability and weekday/location/activity patterns over the last `days` days.
pub fn analyze_mood_patterns(
    observations: &[MoodObservation],
    today: NaiveDate,
    days: i64,
) -> MoodPatternAnalysis {
    let window: Vec<MoodObservation> = in_range(observations, DateRange::last_days(today, days))
        .cloned()
        .collect();

    if window.is_empty() {
        return MoodPatternAnalysis::empty(days);
    }

    let values: Vec<f64> = window.iter().map(|o| o.mood_value() as f64).collect();
    let average_mood = mean(&values).map(|m| round_to(m, 2)).unwrap_or(0.0);

    tracing::debug!(entries = window.len(), days, "Analyzed mood patterns");

    MoodPatternAnalysis {
        period_days: days,
        total_entries: window.len(),
        average_mood,
        mood_stability: mood_stability(&values),
        day_patterns: correlation::day_of_week_patterns(&window),
        location_patterns: correlation::location_patterns(&window),
        activity_patterns: correlation::activity_patterns(&window),
        message: None,
    }
}

/// Dashboard summary across all observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub current_streak: usize,
    pub daily_average: f64,
    pub good_days_average: f64,
    pub bad_days_average: f64,
    pub total_entries: usize,
    /// Weekday with the highest average, `"N/A"` without data
    pub best_day: String,
    pub weekly_patterns: WeeklyPattern,
}

pub fn summary(observations: &[MoodObservation]) -> Summary {
    let averages = daily_averages(observations);
    let weekly = patterns::weekly_pattern_all_time(observations);

    let mut best_day = "N/A".to_string();
    let mut best_avg = 0.0;
    for (label, value) in weekly.labels.iter().zip(&weekly.data) {
        if let Some(v) = value {
            if *v > best_avg {
                best_avg = *v;
                best_day = label.clone();
            }
        }
    }

    Summary {
        current_streak: streak(newest_first(observations)),
        daily_average: averages.daily,
        good_days_average: averages.good_days,
        bad_days_average: averages.bad_days,
        total_entries: averages.total_entries,
        best_day,
        weekly_patterns: weekly,
    }
}

/// One point of the month-by-month series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    /// `YYYY-MM`
    pub month: String,
    pub mood: f64,
}

/// Chronological monthly averages for every month that has entries.
pub fn monthly_series(observations: &[MoodObservation]) -> Vec<MonthlyPoint> {
    let mut by_month: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for obs in observations {
        let date = obs.local_date();
        by_month
            .entry((date.year(), date.month()))
            .or_default()
            .push(obs.mood_value() as f64);
    }

    by_month
        .into_iter()
        .filter_map(|((year, month), values)| {
            mean(&values).map(|m| MonthlyPoint {
                month: format!("{:04}-{:02}", year, month),
                mood: round_to(m, 1),
            })
        })
        .collect()
}
