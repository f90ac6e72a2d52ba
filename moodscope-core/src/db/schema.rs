//! Journal schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: entries and tags
    r#"
    CREATE TABLE IF NOT EXISTS moods (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id          TEXT NOT NULL,
        date             TEXT NOT NULL,      -- civil date, YYYY-MM-DD
        mood             TEXT NOT NULL,      -- label as typed, normalized on read
        notes            TEXT,
        triggers         TEXT,               -- comma-separated free text
        timestamp        TEXT                -- RFC 3339 UTC, may be NULL on legacy rows
    );

    CREATE INDEX IF NOT EXISTS idx_moods_user_date ON moods(user_id, date);

    CREATE TABLE IF NOT EXISTS tags (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        name             TEXT NOT NULL UNIQUE,
        category         TEXT NOT NULL DEFAULT ''
    );

    CREATE TABLE IF NOT EXISTS mood_tags (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        mood_id          INTEGER NOT NULL REFERENCES moods(id) ON DELETE CASCADE,
        tag_id           INTEGER NOT NULL REFERENCES tags(id),
        UNIQUE(mood_id, tag_id)
    );

    CREATE INDEX IF NOT EXISTS idx_mood_tags_mood ON mood_tags(mood_id);
    "#,
    // Version 2: free-form context
    r#"
    ALTER TABLE moods ADD COLUMN context_location TEXT;
    ALTER TABLE moods ADD COLUMN context_activity TEXT;
    ALTER TABLE moods ADD COLUMN context_weather TEXT;
    "#,
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;

    tracing::info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking journal migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running migration");
            conn.execute_batch(migration)?;
            conn.execute(&format!("PRAGMA user_version = {}", version), [])?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Migrations complete"
        );
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}
