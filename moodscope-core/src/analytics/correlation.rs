//! Mood broken down by tag, context, weekday and trigger.
//!
//! Two tag consumers exist with different confidence requirements:
//! [`tag_correlations`] reports every tag seen at least once, ordered by
//! frequency, while [`insight_tag_correlations`] only surfaces tags with
//! three or more entries, ordered by average mood.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use super::report::mean;
use crate::scale::round_to;
use crate::time::{self, WEEKDAY_NAMES};
use crate::types::MoodObservation;

/// Minimum entries per tag for the correlations listing.
pub const TAG_MIN_SAMPLES: usize = 1;

/// Minimum entries per tag before it may drive an insight.
pub const INSIGHT_TAG_MIN_SAMPLES: usize = 3;

/// Minimum entries per location/activity/weather value.
pub const CONTEXT_MIN_SAMPLES: usize = 2;

/// Best-minus-worst weekday gap that counts as a real pattern.
pub const SIGNIFICANT_DAY_GAP: f64 = 1.5;

/// How an attribute relates to mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Impact {
    Positive,
    Neutral,
    Negative,
}

impl Impact {
    /// `>= 5.5` positive, `<= 3.5` negative.
    pub fn from_average(average: f64) -> Self {
        if average >= 5.5 {
            Impact::Positive
        } else if average <= 3.5 {
            Impact::Negative
        } else {
            Impact::Neutral
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Impact::Positive => "Positive",
            Impact::Neutral => "Neutral",
            Impact::Negative => "Negative",
        };
        write!(f, "{}", s)
    }
}

// ============================================
// Tags
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagCorrelation {
    pub tag: String,
    pub category: String,
    /// Average mood of entries carrying the tag (2 decimals)
    pub average_mood: f64,
    /// Number of entries carrying the tag
    pub count: usize,
    pub impact: Impact,
}

struct TagSamples {
    category: String,
    values: Vec<f64>,
}

fn collect_tags(observations: &[MoodObservation], min_samples: usize) -> Vec<TagCorrelation> {
    let mut by_tag: BTreeMap<&str, TagSamples> = BTreeMap::new();

    for obs in observations {
        // A tag attached twice to one entry still counts once
        let mut seen = BTreeSet::new();
        for tag in &obs.tags {
            if !seen.insert(tag.name.as_str()) {
                continue;
            }
            by_tag
                .entry(tag.name.as_str())
                .or_insert_with(|| TagSamples {
                    category: tag.category.clone(),
                    values: Vec::new(),
                })
                .values
                .push(obs.mood_value() as f64);
        }
    }

    by_tag
        .into_iter()
        .filter(|(_, samples)| samples.values.len() >= min_samples)
        .filter_map(|(name, samples)| {
            let average = mean(&samples.values)?;
            Some(TagCorrelation {
                tag: name.to_string(),
                category: samples.category,
                average_mood: round_to(average, 2),
                count: samples.values.len(),
                impact: Impact::from_average(average),
            })
        })
        .collect()
}

/// Every tag, most frequent first (ties: higher average first).
pub fn tag_correlations(observations: &[MoodObservation]) -> Vec<TagCorrelation> {
    let mut result = collect_tags(observations, TAG_MIN_SAMPLES);
    result.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(b.average_mood.total_cmp(&a.average_mood))
            .then_with(|| a.tag.cmp(&b.tag))
    });
    result
}

/// Tags with at least three entries, highest average first.
pub fn insight_tag_correlations(observations: &[MoodObservation]) -> Vec<TagCorrelation> {
    let mut result = collect_tags(observations, INSIGHT_TAG_MIN_SAMPLES);
    result.sort_by(|a, b| {
        b.average_mood
            .total_cmp(&a.average_mood)
            .then_with(|| a.tag.cmp(&b.tag))
    });
    result
}

// ============================================
// Context
// ============================================

/// Average mood for one free-text context value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextPattern {
    pub value: String,
    pub average_mood: f64,
    pub count: usize,
}

fn context_patterns<F>(observations: &[MoodObservation], field: F) -> Vec<ContextPattern>
where
    F: Fn(&MoodObservation) -> Option<&str>,
{
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for obs in observations {
        if let Some(value) = field(obs) {
            groups
                .entry(value.trim())
                .or_default()
                .push(obs.mood_value() as f64);
        }
    }

    let mut patterns: Vec<ContextPattern> = groups
        .into_iter()
        .filter(|(_, values)| values.len() >= CONTEXT_MIN_SAMPLES)
        .filter_map(|(value, values)| {
            Some(ContextPattern {
                value: value.to_string(),
                average_mood: round_to(mean(&values)?, 2),
                count: values.len(),
            })
        })
        .collect();
    patterns.sort_by(|a, b| {
        b.average_mood
            .total_cmp(&a.average_mood)
            .then_with(|| a.value.cmp(&b.value))
    });
    patterns
}

/// Locations seen at least twice, best first.
pub fn location_patterns(observations: &[MoodObservation]) -> Vec<ContextPattern> {
    context_patterns(observations, |o| o.context.location())
}

/// Activities seen at least twice, best first.
pub fn activity_patterns(observations: &[MoodObservation]) -> Vec<ContextPattern> {
    context_patterns(observations, |o| o.context.activity())
}

/// Weather values seen at least twice, best first.
pub fn weather_patterns(observations: &[MoodObservation]) -> Vec<ContextPattern> {
    context_patterns(observations, |o| o.context.weather())
}

// ============================================
// Weekdays
// ============================================

/// Average mood on one weekday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPattern {
    pub day: String,
    pub average_mood: f64,
    pub count: usize,
}

/// Weekdays that have entries, Monday first.
pub fn day_of_week_patterns(observations: &[MoodObservation]) -> Vec<DayPattern> {
    let mut days: [Vec<f64>; 7] = Default::default();
    for obs in observations {
        days[time::weekday_index(obs.local_date())].push(obs.mood_value() as f64);
    }

    days.iter()
        .zip(WEEKDAY_NAMES)
        .filter_map(|(values, name)| {
            Some(DayPattern {
                day: name.to_string(),
                average_mood: round_to(mean(values)?, 2),
                count: values.len(),
            })
        })
        .collect()
}

/// Best and worst weekday when they differ enough to matter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayContrast {
    pub best: DayPattern,
    pub worst: DayPattern,
    pub difference: f64,
}

/// `None` unless best minus worst is at least [`SIGNIFICANT_DAY_GAP`].
///
/// Ties keep the earliest weekday.
pub fn day_contrast(patterns: &[DayPattern]) -> Option<DayContrast> {
    let mut iter = patterns.iter();
    let first = iter.next()?;
    let (mut best, mut worst) = (first, first);
    for pattern in iter {
        if pattern.average_mood > best.average_mood {
            best = pattern;
        }
        if pattern.average_mood < worst.average_mood {
            worst = pattern;
        }
    }

    let difference = round_to(best.average_mood - worst.average_mood, 2);
    (difference >= SIGNIFICANT_DAY_GAP).then(|| DayContrast {
        best: best.clone(),
        worst: worst.clone(),
        difference,
    })
}

// ============================================
// Triggers
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerAverage {
    pub name: String,
    pub count: usize,
    pub average_mood: f64,
}

fn group_triggers(observations: &[MoodObservation]) -> BTreeMap<&str, Vec<f64>> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for obs in observations {
        for trigger in &obs.triggers {
            let name = trigger.trim();
            if name.is_empty() {
                continue;
            }
            groups.entry(name).or_default().push(obs.mood_value() as f64);
        }
    }
    groups
}

/// Most used triggers, at most `limit`.
pub fn trigger_counts(observations: &[MoodObservation], limit: usize) -> Vec<TriggerCount> {
    let mut counts: Vec<TriggerCount> = group_triggers(observations)
        .into_iter()
        .map(|(name, values)| TriggerCount {
            name: name.to_string(),
            count: values.len(),
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    counts.truncate(limit);
    counts
}

/// Average mood per trigger used at least `min_count` times, best first.
pub fn trigger_averages(observations: &[MoodObservation], min_count: usize) -> Vec<TriggerAverage> {
    let mut averages: Vec<TriggerAverage> = group_triggers(observations)
        .into_iter()
        .filter(|(_, values)| values.len() >= min_count)
        .filter_map(|(name, values)| {
            Some(TriggerAverage {
                name: name.to_string(),
                count: values.len(),
                average_mood: round_to(mean(&values)?, 2),
            })
        })
        .collect();
    averages.sort_by(|a, b| {
        b.average_mood
            .total_cmp(&a.average_mood)
            .then_with(|| a.name.cmp(&b.name))
    });
    averages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testutil::obs_on;
    use crate::types::{MoodContext, MoodLabel, Tag};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn tagged(day: u32, mood: MoodLabel, tags: &[&str]) -> MoodObservation {
        obs_on(date(day), mood).with_tags(tags.iter().map(|t| Tag::new(*t, "activity")).collect())
    }

    fn at_location(day: u32, mood: MoodLabel, location: &str) -> MoodObservation {
        obs_on(date(day), mood).with_context(MoodContext {
            location: Some(location.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_impact_thresholds() {
        assert_eq!(Impact::from_average(5.5), Impact::Positive);
        assert_eq!(Impact::from_average(5.49), Impact::Neutral);
        assert_eq!(Impact::from_average(3.5), Impact::Negative);
        assert_eq!(Impact::from_average(3.51), Impact::Neutral);
        assert_eq!(Impact::Positive.to_string(), "Positive");
    }

    #[test]
    fn test_three_sample_tag_is_positive_and_surfaces_in_insights() {
        let observations = vec![
            tagged(1, MoodLabel::Well, &["exercise"]),
            tagged(2, MoodLabel::Well, &["exercise"]),
            tagged(3, MoodLabel::VeryWell, &["exercise"]),
        ];
        let all = tag_correlations(&observations);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].average_mood, 6.33);
        assert_eq!(all[0].impact, Impact::Positive);
        assert_eq!(all[0].category, "activity");

        let insight = insight_tag_correlations(&observations);
        assert_eq!(insight.len(), 1);
        assert_eq!(insight[0].tag, "exercise");
    }

    #[test]
    fn test_two_sample_tag_excluded_from_insights_only() {
        let observations = vec![
            tagged(1, MoodLabel::Well, &["exercise"]),
            tagged(2, MoodLabel::VeryWell, &["exercise"]),
        ];
        assert_eq!(tag_correlations(&observations).len(), 1);
        assert!(insight_tag_correlations(&observations).is_empty());
    }

    #[test]
    fn test_tag_orderings_differ_by_consumer() {
        let observations = vec![
            tagged(1, MoodLabel::Bad, &["work", "coffee"]),
            tagged(2, MoodLabel::SlightlyBad, &["work", "coffee"]),
            tagged(3, MoodLabel::Neutral, &["work", "coffee"]),
            tagged(4, MoodLabel::Neutral, &["work"]),
            tagged(5, MoodLabel::VeryWell, &["friends"]),
            tagged(6, MoodLabel::VeryWell, &["friends"]),
            tagged(7, MoodLabel::Well, &["friends"]),
        ];

        let by_frequency = tag_correlations(&observations);
        let names: Vec<&str> = by_frequency.iter().map(|t| t.tag.as_str()).collect();
        // work: 4 entries; friends 3 @ 6.67; coffee 3 @ 3.0
        assert_eq!(names, vec!["work", "friends", "coffee"]);
        assert_eq!(by_frequency[2].impact, Impact::Negative);

        let by_average = insight_tag_correlations(&observations);
        let names: Vec<&str> = by_average.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(names, vec!["friends", "work", "coffee"]);
    }

    #[test]
    fn test_duplicate_tag_on_one_entry_counts_once() {
        let observations = vec![tagged(1, MoodLabel::Well, &["walk", "walk"])];
        assert_eq!(tag_correlations(&observations)[0].count, 1);
    }

    #[test]
    fn test_context_patterns_need_two_samples() {
        let observations = vec![
            at_location(1, MoodLabel::Well, "home"),
            at_location(2, MoodLabel::VeryWell, "home "),
            at_location(3, MoodLabel::Bad, "office"),
            at_location(4, MoodLabel::Bad, "  "),
        ];
        let patterns = location_patterns(&observations);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].value, "home");
        assert_eq!(patterns[0].average_mood, 6.5);
        assert_eq!(patterns[0].count, 2);

        assert!(activity_patterns(&observations).is_empty());
        assert!(weather_patterns(&observations).is_empty());
    }

    #[test]
    fn test_day_patterns_and_contrast_gate() {
        // 2024-03-04 Monday, 03-05 Tuesday
        let observations = vec![
            obs_on(date(4), MoodLabel::VeryWell),
            obs_on(date(11), MoodLabel::Well),
            obs_on(date(5), MoodLabel::Neutral),
        ];
        let patterns = day_of_week_patterns(&observations);
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].day, "Monday");
        assert_eq!(patterns[0].average_mood, 6.5);
        assert_eq!(patterns[0].count, 2);

        let contrast = day_contrast(&patterns).unwrap();
        assert_eq!(contrast.best.day, "Monday");
        assert_eq!(contrast.worst.day, "Tuesday");
        assert_eq!(contrast.difference, 2.5);

        let close = vec![
            obs_on(date(4), MoodLabel::Well),
            obs_on(date(5), MoodLabel::SlightlyWell),
        ];
        assert!(day_contrast(&day_of_week_patterns(&close)).is_none());
        assert!(day_contrast(&[]).is_none());
    }

    #[test]
    fn test_trigger_counts_and_averages() {
        let observations = vec![
            obs_on(date(1), MoodLabel::Bad).with_triggers(["work", " sleep "]),
            obs_on(date(2), MoodLabel::SlightlyBad).with_triggers(["work", ""]),
            obs_on(date(3), MoodLabel::Well).with_triggers(["sleep", "work"]),
            obs_on(date(4), MoodLabel::VeryWell).with_triggers(["sleep"]),
        ];

        let counts = trigger_counts(&observations, 10);
        assert_eq!(
            counts,
            vec![
                TriggerCount { name: "sleep".into(), count: 3 },
                TriggerCount { name: "work".into(), count: 3 },
            ]
        );
        assert_eq!(trigger_counts(&observations, 1).len(), 1);

        let averages = trigger_averages(&observations, 3);
        assert_eq!(averages[0].name, "sleep");
        assert_eq!(averages[0].average_mood, 5.0);
        assert_eq!(averages[1].average_mood, 3.67);
        assert!(trigger_averages(&observations, 4).is_empty());
    }
}
