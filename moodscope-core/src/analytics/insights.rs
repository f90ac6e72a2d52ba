//! Human-readable insights derived from the other reports.
//!
//! Nothing here computes new statistics: each insight is a threshold
//! check over a pattern, correlation or comparison report.

use chrono::NaiveDate;
use serde::Serialize;

use super::aggregate::{analyze_mood_patterns, logging_streak_days, MoodPatternAnalysis};
use super::comparison::rolling_week_windows;
use super::correlation::{day_contrast, insight_tag_correlations, trigger_averages, Impact};
use super::in_range;
use super::report::{mean, Buckets};
use crate::time::{self, DateRange};
use crate::types::MoodObservation;

/// Days of history the insight generator looks at.
pub const INSIGHT_WINDOW_DAYS: i64 = 30;

/// Default cap on the number of insights returned.
pub const DEFAULT_INSIGHT_LIMIT: usize = 10;

/// Stability at or above this is praised.
const HIGH_STABILITY: f64 = 8.0;

/// Stability at or below this suggests tracking triggers.
const LOW_STABILITY: f64 = 4.0;

/// Recent-vs-window average difference that counts as a trend.
const TREND_BAND: f64 = 0.3;

/// Entries in the window that earn the consistency insight.
const CONSISTENT_ENTRIES: usize = 20;

/// Window averages at or above this are called positive.
const POSITIVE_AVERAGE: f64 = 5.5;

/// Window averages below this get the support message.
const LOW_AVERAGE: f64 = 3.5;

/// Logging streak (days) that earns the streak insight.
const STREAK_DAYS: usize = 7;

/// Week-over-week change (percent) worth mentioning.
const QUICK_CHANGE_PERCENT: f64 = 2.0;

/// Logging streak (days) worth mentioning.
const QUICK_STREAK_DAYS: usize = 3;

/// Uses of a trigger before it can be called the best one.
const QUICK_TRIGGER_MIN_USES: usize = 3;

/// Total entries before the entry count is mentioned.
const QUICK_TOTAL_ENTRIES: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Positive,
    Suggestion,
    Pattern,
    Warning,
    /// Encouragement to reach out while mood is low
    Support,
    /// Placeholder shown when there is nothing to analyze
    NoData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Stability,
    Mood,
    Consistency,
    Timing,
    Weekly,
    Triggers,
    Location,
    Activity,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// One actionable observation about the user's mood.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub category: InsightCategory,
    pub title: String,
    pub message: String,
    pub priority: Priority,
}

impl Insight {
    fn new(
        kind: InsightKind,
        category: InsightCategory,
        title: String,
        message: String,
        priority: Priority,
    ) -> Self {
        Self {
            kind,
            category,
            title,
            message,
            priority,
        }
    }

    fn no_data() -> Self {
        Self::new(
            InsightKind::NoData,
            InsightCategory::General,
            "No mood data yet".to_string(),
            "Unable to generate insights - no mood data available".to_string(),
            Priority::High,
        )
    }
}

/// Capitalize the first letter of every word ("morning run" -> "Morning Run").
fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn stability_insight(patterns: &MoodPatternAnalysis) -> Option<Insight> {
    let stability = patterns.mood_stability;
    if stability >= HIGH_STABILITY {
        Some(Insight::new(
            InsightKind::Positive,
            InsightCategory::Stability,
            "Great Mood Stability!".to_string(),
            format!(
                "Your mood has been very consistent (stability: {}/10). Keep up the great routine!",
                stability
            ),
            Priority::High,
        ))
    } else if stability <= LOW_STABILITY {
        Some(Insight::new(
            InsightKind::Suggestion,
            InsightCategory::Stability,
            "Mood Fluctuations Detected".to_string(),
            format!(
                "Your mood varies quite a bit (stability: {}/10). Consider tracking triggers more consistently.",
                stability
            ),
            Priority::Medium,
        ))
    } else {
        None
    }
}

fn average_insight(window: &[MoodObservation]) -> Option<Insight> {
    let values: Vec<f64> = window.iter().map(|o| o.mood_value() as f64).collect();
    let average = mean(&values)?;
    if average >= POSITIVE_AVERAGE {
        Some(Insight::new(
            InsightKind::Positive,
            InsightCategory::Mood,
            "Positive Outlook".to_string(),
            "Your average mood has been quite positive lately!".to_string(),
            Priority::High,
        ))
    } else if average < LOW_AVERAGE {
        Some(Insight::new(
            InsightKind::Support,
            InsightCategory::Mood,
            "Lower Mood Lately".to_string(),
            "Your mood has been lower lately. Consider reaching out to someone you trust."
                .to_string(),
            Priority::High,
        ))
    } else {
        None
    }
}

fn consistency_insight(window: &[MoodObservation]) -> Option<Insight> {
    if window.len() < CONSISTENT_ENTRIES {
        return None;
    }
    Some(Insight::new(
        InsightKind::Positive,
        InsightCategory::Consistency,
        "Consistent Tracking".to_string(),
        format!(
            "Great job! You've logged {} moods in the last {} days.",
            window.len(),
            INSIGHT_WINDOW_DAYS
        ),
        Priority::Medium,
    ))
}

fn streak_insight(window: &[MoodObservation]) -> Option<Insight> {
    let streak = logging_streak_days(window);
    if streak < STREAK_DAYS {
        return None;
    }
    Some(Insight::new(
        InsightKind::Positive,
        InsightCategory::Consistency,
        "Tracking Streak".to_string(),
        format!("You're on a {}-day tracking streak! Keep it up!", streak),
        Priority::Medium,
    ))
}

/// Local hour with the highest average mood. Ties go to the earlier hour.
fn best_hour_insight(window: &[MoodObservation]) -> Option<Insight> {
    let mut buckets = Buckets::new(24);
    for obs in window {
        if let Some(local) = obs.local_time() {
            buckets.add(time::hour_of_day(local), obs.mood_value() as f64);
        }
    }

    let mut best: Option<(usize, f64)> = None;
    for hour in 0..buckets.len() {
        let Some(average) = buckets.mean(hour) else {
            continue;
        };
        match best {
            Some((_, top)) if average <= top => {}
            _ => best = Some((hour, average)),
        }
    }

    let (hour, _) = best?;
    Some(Insight::new(
        InsightKind::Pattern,
        InsightCategory::Timing,
        format!("{:02}:00 is your best hour", hour),
        format!("Your mood tends to be better around {:02}:00.", hour),
        Priority::Low,
    ))
}

fn day_insight(patterns: &MoodPatternAnalysis) -> Option<Insight> {
    let contrast = day_contrast(&patterns.day_patterns)?;
    Some(Insight::new(
        InsightKind::Pattern,
        InsightCategory::Weekly,
        format!("{}s are your best days!", contrast.best.day),
        format!(
            "You feel {:.1}/7 on {}s vs {:.1}/7 on {}s.",
            contrast.best.average_mood, contrast.best.day, contrast.worst.average_mood, contrast.worst.day
        ),
        Priority::Medium,
    ))
}

fn tag_insights(window: &[MoodObservation]) -> Vec<Insight> {
    let correlations = insight_tag_correlations(window);
    let mut insights = Vec::new();

    // Sorted best first, so the first positive is the strongest
    if let Some(top) = correlations.iter().find(|t| t.impact == Impact::Positive) {
        insights.push(Insight::new(
            InsightKind::Positive,
            InsightCategory::Triggers,
            format!("{} boosts your mood!", title_case(&top.tag)),
            format!(
                "When you engage with {}, your average mood is {:.1}/7.",
                top.tag, top.average_mood
            ),
            Priority::High,
        ));
    }

    if let Some(worst) = correlations.iter().rev().find(|t| t.impact == Impact::Negative) {
        insights.push(Insight::new(
            InsightKind::Warning,
            InsightCategory::Triggers,
            format!("Watch out for {}", worst.tag),
            format!(
                "{} tends to lower your mood to {:.1}/7.",
                title_case(&worst.tag),
                worst.average_mood
            ),
            Priority::High,
        ));
    }

    insights
}

fn location_insight(patterns: &MoodPatternAnalysis) -> Option<Insight> {
    if patterns.location_patterns.len() < 2 {
        return None;
    }
    let best = patterns.location_patterns.first()?;
    Some(Insight::new(
        InsightKind::Suggestion,
        InsightCategory::Location,
        format!("{} is your happy place!", best.value),
        format!(
            "Your mood averages {:.1}/7 when you're at {}.",
            best.average_mood, best.value
        ),
        Priority::Low,
    ))
}

fn activity_insight(patterns: &MoodPatternAnalysis) -> Option<Insight> {
    if patterns.activity_patterns.len() < 2 {
        return None;
    }
    let best = patterns.activity_patterns.first()?;
    Some(Insight::new(
        InsightKind::Suggestion,
        InsightCategory::Activity,
        format!("{} makes you feel great!", title_case(&best.value)),
        format!(
            "Your mood averages {:.1}/7 during {}.",
            best.average_mood, best.value
        ),
        Priority::Medium,
    ))
}

/// Insights over the last [`INSIGHT_WINDOW_DAYS`] days, at most `limit`.
///
/// An empty window yields exactly one "no data" insight.
pub fn generate_insights(
    observations: &[MoodObservation],
    today: NaiveDate,
    limit: usize,
) -> Vec<Insight> {
    let patterns = analyze_mood_patterns(observations, today, INSIGHT_WINDOW_DAYS);
    if patterns.total_entries == 0 {
        return vec![Insight::no_data()];
    }

    let window: Vec<MoodObservation> =
        in_range(observations, DateRange::last_days(today, INSIGHT_WINDOW_DAYS))
            .cloned()
            .collect();

    let mut insights = Vec::new();
    insights.extend(stability_insight(&patterns));
    insights.extend(average_insight(&window));
    insights.extend(day_insight(&patterns));
    insights.extend(tag_insights(&window));
    insights.extend(consistency_insight(&window));
    insights.extend(streak_insight(&window));
    insights.extend(location_insight(&patterns));
    insights.extend(activity_insight(&patterns));
    insights.extend(best_hour_insight(&window));
    insights.truncate(limit);

    tracing::debug!(count = insights.len(), "Generated insights");
    insights
}

// ============================================
// Period trends
// ============================================

/// Look-back period for [`mood_trends`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendPeriod {
    Week,
    Month,
    Quarter,
}

impl TrendPeriod {
    pub fn days(&self) -> i64 {
        match self {
            TrendPeriod::Week => 7,
            TrendPeriod::Month => 30,
            TrendPeriod::Quarter => 90,
        }
    }

    /// Parse a period name; anything unrecognized is a month.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "week" => TrendPeriod::Week,
            "quarter" => TrendPeriod::Quarter,
            _ => TrendPeriod::Month,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodTrendDirection {
    Improving,
    Stable,
    Declining,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodTrends {
    pub period: TrendPeriod,
    pub average_mood: f64,
    pub stability: f64,
    pub trend_direction: MoodTrendDirection,
    pub total_entries: usize,
    pub insights_count: usize,
}

/// Average and stability over the period, with the recent half compared
/// against the whole period for direction.
pub fn mood_trends(observations: &[MoodObservation], today: NaiveDate, period: TrendPeriod) -> MoodTrends {
    let days = period.days();
    let full = analyze_mood_patterns(observations, today, days);
    let recent = analyze_mood_patterns(observations, today, days / 2);

    let trend_direction = if full.total_entries == 0 || recent.total_entries == 0 {
        MoodTrendDirection::Unknown
    } else if recent.average_mood > full.average_mood + TREND_BAND {
        MoodTrendDirection::Improving
    } else if recent.average_mood < full.average_mood - TREND_BAND {
        MoodTrendDirection::Declining
    } else {
        MoodTrendDirection::Stable
    };

    MoodTrends {
        period,
        average_mood: full.average_mood,
        stability: full.mood_stability,
        trend_direction,
        total_entries: full.total_entries,
        insights_count: generate_insights(observations, today, DEFAULT_INSIGHT_LIMIT).len(),
    }
}

// ============================================
// Quick insights
// ============================================

/// Short dashboard tip with an icon name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickInsight {
    pub icon: String,
    pub text: String,
}

impl QuickInsight {
    fn new(icon: &str, text: String) -> Self {
        Self {
            icon: icon.to_string(),
            text,
        }
    }

    fn defaults() -> Vec<Self> {
        vec![
            Self::new(
                "fa-heart",
                "Start logging moods regularly to see personalized insights".to_string(),
            ),
            Self::new(
                "fa-tags",
                "Add triggers to your mood entries to discover patterns".to_string(),
            ),
            Self::new(
                "fa-chart-line",
                "Track for a week to see your mood trends and improvements".to_string(),
            ),
        ]
    }
}

pub fn quick_insights(observations: &[MoodObservation], today: NaiveDate) -> Vec<QuickInsight> {
    let mut insights = Vec::new();

    let (this_range, last_range) = rolling_week_windows(today);
    let average = |range| {
        let values: Vec<f64> = in_range(observations, range)
            .map(|o| o.mood_value() as f64)
            .collect();
        mean(&values)
    };
    if let (Some(this_week), Some(last_week)) = (average(this_range), average(last_range)) {
        let change = (this_week - last_week) / last_week * 100.0;
        if change.abs() > QUICK_CHANGE_PERCENT {
            let direction = if change > 0.0 { "improved" } else { "declined" };
            insights.push(QuickInsight::new(
                "fa-chart-line",
                format!(
                    "Your mood has {} {:.1}% this week compared to last week",
                    direction,
                    change.abs()
                ),
            ));
        }
    }

    let streak = logging_streak_days(observations);
    if streak >= QUICK_STREAK_DAYS {
        insights.push(QuickInsight::new(
            "fa-calendar-check",
            format!(
                "You've logged moods for {} consecutive days - great streak!",
                streak
            ),
        ));
    }

    if let Some(best) = trigger_averages(observations, QUICK_TRIGGER_MIN_USES).first() {
        insights.push(QuickInsight::new(
            "fa-lightbulb",
            format!(
                "{} days show {:.1}/7 average mood - your best trigger!",
                title_case(&best.name),
                best.average_mood
            ),
        ));
    }

    if observations.len() >= QUICK_TOTAL_ENTRIES {
        insights.push(QuickInsight::new(
            "fa-database",
            format!(
                "You've tracked {} mood entries - building great self-awareness!",
                observations.len()
            ),
        ));
    }

    if insights.is_empty() {
        return QuickInsight::defaults();
    }
    insights
}
