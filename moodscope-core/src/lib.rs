//! # moodscope-core
//!
//! Core library for moodscope - analytics over a personal mood journal.
//!
//! This library provides:
//! - Domain types for mood observations, tags and context
//! - The 1-7 mood scale and fixed civil-time bucketing
//! - Pure analytics: aggregates, trends, chart reports, correlations, insights
//! - A SQLite journal store and a JSON observation source
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! Data flows one way:
//! - **Sources:** [`JournalDatabase`] or [`MemorySource`] yield one user's observations
//! - **Analytics:** functions in [`analytics`] compute reports from a slice of observations
//! - **Presentation:** reports are plain serde structs, serialized by the caller
//!
//! ## Example
//!
//! ```rust,no_run
//! use moodscope_core::{analytics, time, Config, JournalDatabase, ObservationSource};
//!
//! let config = Config::load().expect("failed to load config");
//! let db = JournalDatabase::open(&config.resolved_database_path()).expect("failed to open journal");
//! db.migrate().expect("failed to run migrations");
//!
//! let observations = db.observations("alice", None).expect("failed to load");
//! let today = time::local_date_of(chrono::Utc::now()).expect("clock out of range");
//! let insights = analytics::generate_insights(&observations, today, config.analytics.insight_limit);
//! println!("{} insights", insights.len());
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::JournalDatabase;
pub use error::{Error, Result};
pub use source::{load_json_observations, MemorySource, ObservationSource};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod logging;
pub mod scale;
pub mod source;
pub mod time;
pub mod types;
