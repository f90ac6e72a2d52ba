//! Integration tests for the journal store and the analytics pipeline
//!
//! These tests write observations to an on-disk journal, load them back
//! through `ObservationSource`, and check report-level properties.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use moodscope_core::analytics;
use moodscope_core::logging;
use moodscope_core::db::schema;
use moodscope_core::time::DateRange;
use moodscope_core::{
    JournalDatabase, MemorySource, MoodContext, MoodLabel, MoodObservation, ObservationSource, Tag,
};
use tempfile::TempDir;

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Three weeks of entries for "alice" in March 2024, plus one for "bob".
fn fixture() -> Vec<MoodObservation> {
    let mut observations = Vec::new();
    let labels = [
        MoodLabel::Well,
        MoodLabel::SlightlyWell,
        MoodLabel::Neutral,
        MoodLabel::Bad,
        MoodLabel::VeryWell,
    ];
    for day in 1..=21u32 {
        let label = labels[(day as usize) % labels.len()];
        let mut obs = MoodObservation::new("alice", at(2024, 3, day, 15), label)
            .with_triggers(if day % 2 == 0 { vec!["work"] } else { vec!["sleep"] });
        if day % 3 == 0 {
            obs = obs
                .with_tags(vec![Tag::new("exercise", "activity")])
                .with_context(MoodContext {
                    location: Some("park".into()),
                    activity: Some("running".into()),
                    weather: None,
                });
        } else {
            obs = obs.with_context(MoodContext {
                location: Some("office".into()),
                activity: Some("meetings".into()),
                weather: Some("rainy".into()),
            });
        }
        observations.push(obs);
    }
    observations.push(MoodObservation::new("bob", at(2024, 3, 5, 12), MoodLabel::VeryBad));
    observations
}

fn journal_with_fixture(dir: &TempDir) -> JournalDatabase {
    logging::init_test();
    let db = JournalDatabase::open(&dir.path().join("journal.db")).expect("open journal");
    db.migrate().expect("migrate journal");
    for obs in fixture() {
        db.insert_observation(&obs).expect("insert observation");
    }
    db
}

// ============================================
// Journal Round Trip
// ============================================

#[test]
fn test_on_disk_journal_round_trip() {
    logging::init_test();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/journal.db");

    {
        let db = JournalDatabase::open(&path).unwrap();
        db.migrate().unwrap();
        for obs in fixture() {
            db.insert_observation(&obs).unwrap();
        }
    }

    // Reopen and migrate again
    let db = JournalDatabase::open(&path).unwrap();
    db.migrate().unwrap();

    let alice = db.observations("alice", None).unwrap();
    let bob = db.observations("bob", None).unwrap();
    assert_eq!(alice.len(), 21);
    assert_eq!(bob.len(), 1);
    assert_eq!(db.count_for_user("alice").unwrap(), 21);

    // Newest first
    assert_eq!(alice[0].local_date(), date(2024, 3, 21));
    assert_eq!(alice[20].local_date(), date(2024, 3, 1));

    let tagged = alice.iter().filter(|o| !o.tags.is_empty()).count();
    assert_eq!(tagged, 7);
}

#[test]
fn test_schema_version_after_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("journal.db");
    let db = JournalDatabase::open(&path).unwrap();
    db.migrate().unwrap();
    drop(db);

    let conn = rusqlite::Connection::open(&path).unwrap();
    assert_eq!(schema::get_schema_version(&conn).unwrap(), schema::SCHEMA_VERSION);
}

#[test]
fn test_journal_and_memory_sources_agree() {
    let dir = TempDir::new().unwrap();
    let db = journal_with_fixture(&dir);
    let memory = MemorySource::new(fixture());

    let window = Some(DateRange::new(date(2024, 3, 4), date(2024, 3, 10)));
    let from_db = db.observations("alice", window).unwrap();
    let from_memory = memory.observations("alice", window).unwrap();
    assert_eq!(from_db.len(), 7);
    assert_eq!(from_memory.len(), 7);

    let db_report = analytics::weekly_pattern_for_week(&from_db, date(2024, 3, 4));
    let memory_report = analytics::weekly_pattern_for_week(&from_memory, date(2024, 3, 4));
    assert_eq!(db_report.data, memory_report.data);
    assert_eq!(db_report.counts, memory_report.counts);
}

// ============================================
// Report Properties
// ============================================

#[test]
fn test_reports_are_idempotent_and_do_not_mutate_input() {
    logging::init_test();
    let observations = fixture();
    let before = observations.clone();
    let today = date(2024, 3, 21);

    let first = serde_json::to_value(analytics::summary(&observations)).unwrap();
    let second = serde_json::to_value(analytics::summary(&observations)).unwrap();
    assert_eq!(first, second);

    let insights_a = analytics::generate_insights(&observations, today, 10);
    let insights_b = analytics::generate_insights(&observations, today, 10);
    assert_eq!(insights_a, insights_b);

    let _ = analytics::four_week_comparison(&observations, today);
    let _ = analytics::tag_correlations(&observations);
    let _ = analytics::hourly_pattern(&observations);

    assert_eq!(observations, before);
}

#[test]
fn test_chart_shapes() {
    let observations = fixture();

    let weekly = analytics::weekly_pattern_all_time(&observations);
    assert_eq!(weekly.labels.len(), 7);
    assert_eq!(weekly.data.len(), 7);

    let hourly = analytics::hourly_pattern(&observations);
    assert_eq!(hourly.data.len(), 24);
    // 15:00 UTC is noon locally, bob's 12:00 UTC entry lands at 09:00
    assert!(hourly.data[12].is_some());
    assert_eq!(hourly.data[9], Some(1.0));
    assert_eq!(hourly.data.iter().filter(|v| v.is_some()).count(), 2);

    let monthly = analytics::monthly_pattern(&observations, 2024);
    assert_eq!(monthly.data.len(), 12);
    assert!(monthly.data[2] > 0.0);
    assert_eq!(monthly.data[0], 0.0);

    let month_weeks = analytics::weekly_trends_for_month(&observations, 2024, 3).unwrap();
    assert_eq!(month_weeks.labels.len(), month_weeks.data.len());
    assert_eq!(month_weeks.labels[0], "Week 1");
}

#[test]
fn test_values_stay_on_scale() {
    let observations = fixture();
    let analysis = analytics::monthly_trends(&observations, 2024);
    for value in analysis.trend_analysis.trend_line.iter().flatten() {
        assert!((1.0..=7.0).contains(value));
    }

    let weekly = analytics::weekly_pattern_all_time(&observations);
    for value in weekly.data.iter().flatten() {
        assert!((1.0..=7.0).contains(value));
    }
}

#[test]
fn test_correlations_over_journal_data() {
    let dir = TempDir::new().unwrap();
    let db = journal_with_fixture(&dir);
    let alice = db.observations("alice", None).unwrap();

    let tags = analytics::tag_correlations(&alice);
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].tag, "exercise");
    assert_eq!(tags[0].count, 7);

    let locations = analytics::location_patterns(&alice);
    let total: usize = locations.iter().map(|p| p.count).sum();
    assert_eq!(total, 21);

    let triggers = analytics::trigger_counts(&alice, 10);
    assert_eq!(triggers.len(), 2);
    assert_eq!(triggers[0].name, "sleep");
    assert_eq!(triggers[0].count, 11);
}

#[test]
fn test_insights_and_trends_over_window() {
    let observations = fixture();
    let today = date(2024, 3, 21);

    let insights = analytics::generate_insights(&observations, today, 10);
    assert!(!insights.is_empty());
    assert!(insights.len() <= 10);

    let empty = analytics::generate_insights(&observations, today + Duration::days(365), 10);
    assert_eq!(empty.len(), 1);
    assert_eq!(empty[0].kind, analytics::InsightKind::NoData);

    let trends = analytics::mood_trends(&observations, today, analytics::TrendPeriod::Week);
    // Seven days back plus today
    assert_eq!(trends.total_entries, 8);
}
