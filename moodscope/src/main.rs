//! moodscope - mood journal analytics
//!
//! Loads one user's observations from the journal database (or a JSON
//! file) and prints analytics reports as pretty JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use moodscope_core::analytics::{self, TrendPeriod};
use moodscope_core::{
    export, time, Config, JournalDatabase, MemorySource, MoodObservation, ObservationSource,
};
use serde::Serialize;
use serde_json::json;

#[derive(Parser)]
#[command(name = "moodscope")]
#[command(about = "Analytics over a personal mood journal")]
#[command(version)]
struct Args {
    /// Read observations from a JSON array instead of the journal database
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Journal database path (defaults to the configured path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// User whose observations are analyzed
    #[arg(short, long, global = true, default_value = "default")]
    user: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Streaks, averages and the month-by-month series
    Summary,
    /// Average mood per weekday
    Weekly {
        /// First day of a seven-day week (YYYY-MM-DD)
        #[arg(long, conflicts_with_all = ["year", "month", "week"])]
        start: Option<String>,
        #[arg(long, requires_all = ["month", "week"])]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        /// Week of the month, counted from its first Monday
        #[arg(long)]
        week: Option<u32>,
    },
    /// Monthly averages and trend for a year
    Monthly {
        #[arg(long)]
        year: i32,
    },
    /// Weekly averages within a month
    MonthWeeks {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
    },
    /// Average mood per hour of day
    Hourly {
        /// Limit to the last N days
        #[arg(long)]
        days: Option<i64>,
    },
    /// Every entry of one day, placed on a 24-hour axis
    Daily {
        /// Day to report (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
    /// This week and the three before it, day by day
    FourWeek,
    /// This calendar week against the previous one
    WeekComparison,
    /// Today's entry, this week's average and the weekly direction
    QuickStats,
    /// Tag, context, weekday and trigger breakdowns
    Correlations,
    /// Stability and weekday/location/activity patterns for a window
    Patterns {
        #[arg(long)]
        days: Option<i64>,
    },
    /// Generated insights for the last 30 days
    Insights,
    /// Mood trend over a week, month or quarter
    Trends {
        #[arg(long, default_value = "month")]
        period: String,
    },
    /// Flattened entries and headline numbers for an export
    Export {
        #[arg(long)]
        days: Option<i64>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        moodscope_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let source = open_source(&args, &config)?;
    let observations = source
        .observations(&args.user, None)
        .with_context(|| format!("failed to load observations for '{}'", args.user))?;

    let today = time::local_date_of(Utc::now())
        .context("current time is outside the supported calendar")?;
    tracing::info!(
        user = %args.user,
        count = observations.len(),
        %today,
        "Running report"
    );

    run(&args.command, &observations, today, &config)
}

/// Pick the observation source: `--input` wins over the journal database.
fn open_source(args: &Args, config: &Config) -> Result<Box<dyn ObservationSource>> {
    if let Some(ref input) = args.input {
        let source = MemorySource::from_json_file(input)
            .with_context(|| format!("failed to read observations from {}", input.display()))?;
        return Ok(Box::new(source));
    }

    let db_path = args
        .db
        .clone()
        .unwrap_or_else(|| config.resolved_database_path());
    tracing::info!(path = %db_path.display(), "Opening journal");

    let db = JournalDatabase::open(&db_path).context("failed to open journal database")?;
    db.migrate().context("failed to run journal migrations")?;
    Ok(Box::new(db))
}

fn run(
    command: &Command,
    observations: &[MoodObservation],
    today: chrono::NaiveDate,
    config: &Config,
) -> Result<()> {
    let window_days = config.analytics.default_window_days;

    match command {
        Command::Summary => print_json(&json!({
            "summary": analytics::summary(observations),
            "average": analytics::average_mood(observations, today, window_days),
            "rolling_week": analytics::rolling_week_comparison(observations, today),
            "monthly": analytics::monthly_series(observations),
        })),
        Command::Weekly {
            start,
            year,
            month,
            week,
        } => {
            let pattern = match (start, year, month, week) {
                (Some(start), _, _, _) => {
                    let start = time::parse_date(start).context("invalid --start")?;
                    analytics::weekly_pattern_for_week(observations, start)
                }
                (None, Some(year), Some(month), Some(week)) => {
                    analytics::weekly_pattern_for_week_of_month(observations, *year, *month, *week)
                        .context("invalid week of month")?
                }
                _ => analytics::weekly_pattern(
                    observations,
                    time::DateRange::last_days(today, window_days),
                    format!("Average Mood by Day of Week (Last {} Days)", window_days),
                ),
            };
            print_json(&pattern)
        }
        Command::Monthly { year } => print_json(&analytics::monthly_trends(observations, *year)),
        Command::MonthWeeks { year, month } => {
            let report = analytics::weekly_trends_for_month(observations, *year, *month)
                .context("invalid month")?;
            print_json(&report)
        }
        Command::Hourly { days } => {
            let report = match days {
                Some(days) => analytics::hourly_pattern_window(observations, today, *days),
                None => analytics::hourly_pattern(observations),
            };
            print_json(&report)
        }
        Command::Daily { date } => {
            let report = analytics::daily_pattern(observations, date).context("invalid --date")?;
            print_json(&report)
        }
        Command::FourWeek => print_json(&analytics::four_week_comparison(observations, today)),
        Command::WeekComparison => print_json(&analytics::week_comparison(observations, today)),
        Command::QuickStats => print_json(&analytics::quick_stats(observations, today)),
        Command::Correlations => {
            let days = analytics::day_of_week_patterns(observations);
            print_json(&json!({
                "tags": analytics::tag_correlations(observations),
                "locations": analytics::location_patterns(observations),
                "activities": analytics::activity_patterns(observations),
                "weather": analytics::weather_patterns(observations),
                "day_contrast": analytics::day_contrast(&days),
                "days": days,
                "triggers": analytics::trigger_counts(
                    observations,
                    config.analytics.top_triggers_limit,
                ),
            }))
        }
        Command::Patterns { days } => {
            let days = days.unwrap_or(window_days);
            print_json(&json!({
                "analysis": analytics::analyze_mood_patterns(observations, today, days),
                "distribution": analytics::distribution_summary(observations, today, days),
                "trend": analytics::distribution_trend(observations, today, days),
            }))
        }
        Command::Insights => print_json(&json!({
            "insights": analytics::generate_insights(
                observations,
                today,
                config.analytics.insight_limit,
            ),
            "quick": analytics::quick_insights(observations, today),
        })),
        Command::Trends { period } => {
            let period = TrendPeriod::parse_lenient(period);
            print_json(&analytics::mood_trends(observations, today, period))
        }
        Command::Export { days } => {
            let days = days.unwrap_or(window_days);
            print_json(&json!({
                "document": export::export_document(observations, today, days),
                "summary": export::export_summary(observations, today, days),
            }))
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to serialize report")?;
    println!("{}", rendered);
    Ok(())
}
