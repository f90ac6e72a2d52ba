//! Export shapes handed to CSV/JSON encoders.
//!
//! The core only flattens observations; encoding to a file format is the
//! caller's job.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::analytics::aggregate::distribution;
use crate::analytics::in_range;
use crate::analytics::report::mean;
use crate::scale::round_to;
use crate::time::DateRange;
use crate::types::{MoodLabel, MoodObservation};

/// One observation flattened with its computed mood value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord {
    pub id: Option<i64>,
    pub user_id: String,
    pub date: NaiveDate,
    /// UTC instant, if the entry has one
    pub timestamp: Option<DateTime<Utc>>,
    /// Civil "HH:MM:SS", if the entry has a timestamp
    pub local_time: Option<String>,
    pub mood: MoodLabel,
    pub mood_value: u8,
    pub notes: String,
    pub triggers: Vec<String>,
    pub tags: Vec<String>,
    pub location: Option<String>,
    pub activity: Option<String>,
    pub weather: Option<String>,
}

impl ExportRecord {
    pub fn from_observation(obs: &MoodObservation) -> Self {
        Self {
            id: obs.id,
            user_id: obs.user_id.clone(),
            date: obs.local_date(),
            timestamp: obs.timestamp,
            local_time: obs.local_time().map(|t| t.format("%H:%M:%S").to_string()),
            mood: obs.mood,
            mood_value: obs.mood_value(),
            notes: obs.notes.clone().unwrap_or_default(),
            triggers: obs.triggers.clone(),
            tags: obs.tags.iter().map(|t| t.name.clone()).collect(),
            location: obs.context.location().map(str::to_string),
            activity: obs.context.activity().map(str::to_string),
            weather: obs.context.weather().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i64,
}

/// Everything an encoder needs for one export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportDocument {
    pub export_date: NaiveDate,
    pub period: ExportPeriod,
    pub total_entries: usize,
    pub moods: Vec<ExportRecord>,
}

/// Flatten the observations of the last `days` days, in input order.
pub fn export_document(observations: &[MoodObservation], today: NaiveDate, days: i64) -> ExportDocument {
    let range = DateRange::last_days(today, days);
    let moods: Vec<ExportRecord> = in_range(observations, range)
        .map(ExportRecord::from_observation)
        .collect();

    ExportDocument {
        export_date: today,
        period: ExportPeriod {
            start: range.start,
            end: range.end,
            days,
        },
        total_entries: moods.len(),
        moods,
    }
}

/// Headline numbers printed alongside an export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSummary {
    pub total_entries: usize,
    pub average_mood: Option<f64>,
    /// Most frequent label; ties go to the lower label
    pub most_common_mood: Option<MoodLabel>,
    pub mood_distribution: BTreeMap<MoodLabel, usize>,
}

pub fn export_summary(observations: &[MoodObservation], today: NaiveDate, days: i64) -> ExportSummary {
    let window: Vec<MoodObservation> = in_range(observations, DateRange::last_days(today, days))
        .cloned()
        .collect();
    let values: Vec<f64> = window.iter().map(|o| o.mood_value() as f64).collect();
    let counts = distribution(&window);

    let mut most_common: Option<(MoodLabel, usize)> = None;
    for (label, count) in &counts {
        if most_common.map_or(true, |(_, best)| *count > best) {
            most_common = Some((*label, *count));
        }
    }

    ExportSummary {
        total_entries: window.len(),
        average_mood: mean(&values).map(|m| round_to(m, 2)),
        most_common_mood: most_common.map(|(label, _)| label),
        mood_distribution: counts,
    }
}
