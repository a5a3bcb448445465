//! Persistent download queue (SQLite via sqlx).
//!
//! Stores one row per queued video: its link, resolved title, progress,
//! status and, once known, the audio file it produced.

mod db;
mod items;
mod types;

pub use db::QueueDb;
pub use types::*;

#[cfg(test)]
pub(crate) use db::open_memory;
