//! Core domain types for moodscope
//!
//! These types represent the journal data the analytics consume. Every
//! report in [`crate::analytics`] takes a slice of [`MoodObservation`] and
//! never mutates it.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Observation** | One journal entry: a mood label recorded at an instant |
//! | **Civil date/time** | Wall-clock date/time at the fixed UTC-3 offset |
//! | **Tag** | A categorized label attached to an observation |
//! | **Trigger** | A free-text cause the user typed next to the entry |
//! | **Context** | Optional location, activity and weather strings |

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{scale, time};

// ============================================
// Mood labels
// ============================================

/// The seven ordinal mood labels, worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MoodLabel {
    VeryBad,
    Bad,
    SlightlyBad,
    Neutral,
    SlightlyWell,
    Well,
    VeryWell,
}

impl MoodLabel {
    /// All labels in scale order.
    pub const ALL: [MoodLabel; 7] = [
        MoodLabel::VeryBad,
        MoodLabel::Bad,
        MoodLabel::SlightlyBad,
        MoodLabel::Neutral,
        MoodLabel::SlightlyWell,
        MoodLabel::Well,
        MoodLabel::VeryWell,
    ];

    /// Returns the label as stored in the journal
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLabel::VeryBad => "very bad",
            MoodLabel::Bad => "bad",
            MoodLabel::SlightlyBad => "slightly bad",
            MoodLabel::Neutral => "neutral",
            MoodLabel::SlightlyWell => "slightly well",
            MoodLabel::Well => "well",
            MoodLabel::VeryWell => "very well",
        }
    }

    /// Numeric value on the 1-7 scale.
    pub fn value(&self) -> u8 {
        scale::value_of(self.as_str())
    }

    /// Parse a label, mapping anything unrecognized to [`MoodLabel::Neutral`].
    ///
    /// Legacy rows carry labels in mixed case and with stray whitespace;
    /// those are accepted. Analytics never reject an observation over its label.
    pub fn parse_lenient(s: &str) -> MoodLabel {
        match s.parse() {
            Ok(label) => label,
            Err(_) => {
                tracing::warn!(label = %s, "Unknown mood label, treating as neutral");
                MoodLabel::Neutral
            }
        }
    }
}

impl std::str::FromStr for MoodLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        MoodLabel::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == normalized)
            .ok_or_else(|| format!("unknown mood label: {}", s))
    }
}

impl std::fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for MoodLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MoodLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(MoodLabel::parse_lenient(&raw))
    }
}

// ============================================
// Tags and context
// ============================================

/// A categorized tag attached to an observation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name (e.g., "exercise")
    pub name: String,
    /// Category the tag belongs to (e.g., "activity")
    #[serde(default)]
    pub category: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }
}

/// Free-form context recorded alongside an observation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodContext {
    pub location: Option<String>,
    pub activity: Option<String>,
    pub weather: Option<String>,
}

impl MoodContext {
    /// Location if present and not blank.
    pub fn location(&self) -> Option<&str> {
        non_blank(self.location.as_deref())
    }

    /// Activity if present and not blank.
    pub fn activity(&self) -> Option<&str> {
        non_blank(self.activity.as_deref())
    }

    /// Weather if present and not blank.
    pub fn weather(&self) -> Option<&str> {
        non_blank(self.weather.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================
// Observation
// ============================================

/// A single mood journal entry.
///
/// Observations are immutable inputs. `timestamp` is `None` when the stored
/// instant was missing or unparsable; such entries still count for
/// date-based reports (through `civil_date`) but are skipped by every
/// hour-based bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodObservation {
    /// Journal row ID (if the source has one)
    #[serde(default)]
    pub id: Option<i64>,
    /// Owner of the entry; all reports are scoped to one user
    pub user_id: String,
    /// When the entry was recorded (UTC)
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Calendar date the journal attributed the entry to
    #[serde(rename = "date")]
    pub civil_date: NaiveDate,
    /// Mood label
    pub mood: MoodLabel,
    /// Free text, never analyzed
    #[serde(default)]
    pub notes: Option<String>,
    /// Categorized tags
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Free-text triggers
    #[serde(default)]
    pub triggers: Vec<String>,
    /// Optional location/activity/weather
    #[serde(default)]
    pub context: MoodContext,
}

impl MoodObservation {
    /// Create an observation recorded at `timestamp`.
    ///
    /// The civil date is derived from the timestamp at the fixed offset.
    pub fn new(user_id: impl Into<String>, timestamp: DateTime<Utc>, mood: MoodLabel) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            timestamp: Some(timestamp),
            civil_date: time::local_date_of(timestamp).unwrap_or_else(|| timestamp.date_naive()),
            mood,
            notes: None,
            tags: Vec::new(),
            triggers: Vec::new(),
            context: MoodContext::default(),
        }
    }

    /// Create an observation that only carries a calendar date.
    pub fn dated(user_id: impl Into<String>, civil_date: NaiveDate, mood: MoodLabel) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            timestamp: None,
            civil_date,
            mood,
            notes: None,
            tags: Vec::new(),
            triggers: Vec::new(),
            context: MoodContext::default(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_triggers<I, S>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.triggers = triggers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_context(mut self, context: MoodContext) -> Self {
        self.context = context;
        self
    }

    /// Override the stored civil date (legacy rows may disagree with the timestamp).
    pub fn with_civil_date(mut self, civil_date: NaiveDate) -> Self {
        self.civil_date = civil_date;
        self
    }

    /// Numeric mood value (1-7).
    pub fn mood_value(&self) -> u8 {
        self.mood.value()
    }

    /// Local civil time of the entry, if it has a timestamp.
    pub fn local_time(&self) -> Option<NaiveDateTime> {
        self.timestamp.and_then(time::to_local_civil)
    }

    /// The day this entry belongs to for every date-bucketed report.
    ///
    /// The shifted timestamp wins when present; the stored civil date is the
    /// fallback for entries without a usable timestamp.
    pub fn local_date(&self) -> NaiveDate {
        self.local_time()
            .map(|t| t.date())
            .unwrap_or(self.civil_date)
    }
}

/// Accepts RFC 3339 strings (or null) and degrades anything else to `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        serde_json::Value::String(s) => time::parse_timestamp(&s),
        _ => None,
    }))
}
