//! Journal repository
//!
//! Reads and writes mood entries in the journal's SQLite store.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

use crate::error::{Error, Result};
use crate::source::ObservationSource;
use crate::time::{self, DateRange};
use crate::types::{MoodContext, MoodLabel, MoodObservation, Tag};

/// Journal database handle (single connection behind a mutex)
pub struct JournalDatabase {
    conn: Mutex<Connection>,
}

impl JournalDatabase {
    /// Open or create a journal at the given path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        tracing::info!(path = %path.display(), "Opened journal database");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory journal (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::LockPoisoned)
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        super::schema::run_migrations(&conn)
    }

    // ============================================
    // Writes
    // ============================================

    /// Insert an observation with its tags. Returns the new row ID.
    pub fn insert_observation(&self, obs: &MoodObservation) -> Result<i64> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO moods (user_id, date, mood, notes, triggers, timestamp,
                               context_location, context_activity, context_weather)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                obs.user_id,
                obs.civil_date.format("%Y-%m-%d").to_string(),
                obs.mood.as_str(),
                obs.notes,
                encode_triggers(&obs.triggers)?,
                obs.timestamp.map(|t| t.to_rfc3339()),
                obs.context.location,
                obs.context.activity,
                obs.context.weather,
            ],
        )?;
        let mood_id = tx.last_insert_rowid();

        for tag in &obs.tags {
            tx.execute(
                "INSERT INTO tags (name, category) VALUES (?1, ?2) ON CONFLICT(name) DO NOTHING",
                params![tag.name, tag.category],
            )?;
            let tag_id: i64 =
                tx.query_row("SELECT id FROM tags WHERE name = ?", [&tag.name], |r| r.get(0))?;
            tx.execute(
                "INSERT OR IGNORE INTO mood_tags (mood_id, tag_id) VALUES (?1, ?2)",
                params![mood_id, tag_id],
            )?;
        }

        tx.commit()?;
        Ok(mood_id)
    }

    // ============================================
    // Reads
    // ============================================

    /// Number of entries stored for a user
    pub fn count_for_user(&self, user_id: &str) -> Result<i64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM moods WHERE user_id = ?",
            [user_id],
            |r| r.get(0),
        )?;
        Ok(count)
    }

    /// Load a user's observations, newest first.
    ///
    /// The stored date can be a day off from the canonical one, so the SQL
    /// window is widened by a day on each side and trimmed afterwards.
    pub fn load_observations(
        &self,
        user_id: &str,
        window: Option<DateRange>,
    ) -> Result<Vec<MoodObservation>> {
        let conn = self.lock()?;

        let mut observations = match window {
            Some(range) => {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT * FROM moods
                    WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
                    ORDER BY date DESC, timestamp DESC, id DESC
                    "#,
                )?;
                let start = time::offset_days(range.start, -1).format("%Y-%m-%d").to_string();
                let end = time::offset_days(range.end, 1).format("%Y-%m-%d").to_string();
                let rows = stmt.query_map(params![user_id, start, end], Self::row_to_observation)?;
                rows.filter_map(|r| r.transpose())
                    .collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT * FROM moods
                    WHERE user_id = ?1
                    ORDER BY date DESC, timestamp DESC, id DESC
                    "#,
                )?;
                let rows = stmt.query_map([user_id], Self::row_to_observation)?;
                rows.filter_map(|r| r.transpose())
                    .collect::<rusqlite::Result<Vec<_>>>()?
            }
        };

        if let Some(range) = window {
            observations.retain(|o| range.contains(o.local_date()));
        }

        let mut tags = Self::tags_for_user(&conn, user_id)?;
        for obs in &mut observations {
            if let Some(id) = obs.id {
                obs.tags = tags.remove(&id).unwrap_or_default();
            }
        }

        let untimed = observations.iter().filter(|o| o.timestamp.is_none()).count();
        tracing::debug!(
            user_id,
            count = observations.len(),
            untimed,
            "Loaded observations from journal"
        );

        Ok(observations)
    }

    fn tags_for_user(conn: &Connection, user_id: &str) -> Result<HashMap<i64, Vec<Tag>>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT mt.mood_id, t.name, t.category
            FROM mood_tags mt
            JOIN tags t ON mt.tag_id = t.id
            JOIN moods m ON mt.mood_id = m.id
            WHERE m.user_id = ?
            ORDER BY mt.id
            "#,
        )?;
        let rows = stmt.query_map([user_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                Tag::new(row.get::<_, String>(1)?, row.get::<_, String>(2)?),
            ))
        })?;

        let mut by_mood: HashMap<i64, Vec<Tag>> = HashMap::new();
        for row in rows {
            let (mood_id, tag) = row?;
            by_mood.entry(mood_id).or_default().push(tag);
        }
        Ok(by_mood)
    }

    /// Map a row, or `None` for a row whose date cannot be read.
    fn row_to_observation(row: &Row) -> rusqlite::Result<Option<MoodObservation>> {
        let id: i64 = row.get("id")?;
        let date_str: String = row.get("date")?;
        let civil_date = match NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d") {
            Ok(date) => date,
            Err(e) => {
                tracing::warn!(
                    id,
                    date = %date_str,
                    error = %e,
                    "Skipping row with unreadable date"
                );
                return Ok(None);
            }
        };
        let mood_str: String = row.get("mood")?;
        let timestamp_str: Option<String> = row.get("timestamp")?;
        let triggers_str: Option<String> = row.get("triggers")?;

        Ok(Some(MoodObservation {
            id: Some(id),
            user_id: row.get("user_id")?,
            timestamp: timestamp_str.as_deref().and_then(time::parse_timestamp),
            civil_date,
            mood: MoodLabel::parse_lenient(&mood_str),
            notes: row.get("notes")?,
            tags: Vec::new(),
            triggers: decode_triggers(triggers_str.as_deref()),
            context: MoodContext {
                location: row.get("context_location")?,
                activity: row.get("context_activity")?,
                weather: row.get("context_weather")?,
            },
        }))
    }
}

impl ObservationSource for JournalDatabase {
    fn observations(&self, user_id: &str, window: Option<DateRange>) -> Result<Vec<MoodObservation>> {
        self.load_observations(user_id, window)
    }
}

/// Triggers are stored as a JSON array of strings.
fn encode_triggers(triggers: &[String]) -> Result<Option<String>> {
    if triggers.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string(triggers)?))
}

/// Read a JSON trigger array, falling back to the legacy comma-separated text.
fn decode_triggers(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    if raw.trim_start().starts_with('[') {
        if let Ok(triggers) = serde_json::from_str::<Vec<String>>(raw) {
            return triggers
                .into_iter()
                .filter(|t| !t.trim().is_empty())
                .collect();
        }
    }

    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
