//! Journal storage
//!
//! SQLite-backed store for mood entries:
//! - Schema migrations
//! - Repository for inserts and per-user loads

pub mod repo;
pub mod schema;

pub use repo::JournalDatabase;
