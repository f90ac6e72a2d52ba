//! Analytics over mood observations
//!
//! Every function here is a pure computation over a slice of
//! [`MoodObservation`]: nothing is cached, nothing reads the clock, and
//! the input is never reordered or mutated. Callers that need "today"
//! pass it in (see [`crate::time::local_date_of`]).
//!
//! - [`aggregate`]: streaks, averages, stability, distributions
//! - [`trend`]: least-squares regression and trend lines
//! - [`patterns`]: weekly/monthly/hourly/daily chart reports
//! - [`comparison`]: week-over-week and four-week views
//! - [`correlation`]: tag, context, weekday and trigger breakdowns
//! - [`insights`]: human-readable insights built on the above
//!
//! Empty-bucket handling for every chart lives in [`report`].

pub mod aggregate;
pub mod comparison;
pub mod correlation;
pub mod insights;
pub mod patterns;
pub mod report;
pub mod trend;

pub use aggregate::{
    analyze_mood_patterns, average_mood, daily_averages, distribution, distribution_summary,
    distribution_trend, logging_streak_days, monthly_series, mood_stability, period_average,
    streak, summary, AverageMoodReport, DailyAverages, DistributionSummary, DistributionTrend,
    DistributionTrendLabel, MonthlyPoint, MoodPatternAnalysis, PeriodAverage, Summary,
};
pub use comparison::{
    four_week_comparison, quick_stats, rolling_week_comparison, week_comparison,
    FourWeekComparison, PeriodStats, QuickStats, RollingWeekComparison, TodayStat, TrendStat,
    WeekComparison, WeekDirection, WeekWindow,
};
pub use correlation::{
    activity_patterns, day_contrast, day_of_week_patterns, insight_tag_correlations,
    location_patterns, tag_correlations, trigger_averages, trigger_counts, weather_patterns,
    ContextPattern, DayContrast, DayPattern, Impact, TagCorrelation, TriggerAverage, TriggerCount,
};
pub use insights::{
    generate_insights, mood_trends, quick_insights, Insight, InsightCategory, InsightKind,
    MoodTrendDirection, MoodTrends, Priority, QuickInsight, TrendPeriod, DEFAULT_INSIGHT_LIMIT,
};
pub use patterns::{
    daily_pattern, daily_pattern_on, hourly_pattern, hourly_pattern_window, month_week_ranges,
    monthly_pattern, monthly_trend_analysis, monthly_trends, weekly_pattern,
    weekly_pattern_all_time, weekly_pattern_for_week, weekly_pattern_for_week_of_month,
    weekly_trends_for_month, DailyPattern, HourlyPattern, MonthWeeklyTrends, MonthlyPattern,
    MonthlyTrends, MoodPoint, WeeklyPattern,
};
pub use trend::{
    analyze_series, linear_regression, trend_line, RegressionResult, TrendAnalysis,
    TrendDescriptor,
};

use crate::time::DateRange;
use crate::types::MoodObservation;

/// Observations whose canonical day falls inside `range`.
pub(crate) fn in_range(
    observations: &[MoodObservation],
    range: DateRange,
) -> impl Iterator<Item = &MoodObservation> {
    observations
        .iter()
        .filter(move |o| range.contains(o.local_date()))
}

/// References ordered most recent first, without touching the input.
///
/// Entries are ordered by canonical day, then by timestamp; entries
/// without a timestamp sort before timed entries of the same day.
pub(crate) fn newest_first(observations: &[MoodObservation]) -> Vec<&MoodObservation> {
    let mut refs: Vec<&MoodObservation> = observations.iter().collect();
    refs.sort_by(|a, b| (b.local_date(), b.timestamp).cmp(&(a.local_date(), a.timestamp)));
    refs
}
