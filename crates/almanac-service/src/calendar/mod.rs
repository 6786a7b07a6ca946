//! Calendar operations on top of the store.
//!
//! `events` and `tasks` are the write paths; `query`, `agenda` and `digest`
//! read stored events back through the date engine.

pub mod agenda;
pub mod digest;
pub mod events;
pub mod format;
pub mod query;
pub mod tasks;

pub use agenda::{Agenda, AgendaDay, month_agenda, week_agenda};
pub use digest::{DailyDigest, WeeklyDigest, daily_digest, weekly_digest};
pub use format::describe_time;
pub use query::{OccurrenceQuery, SkippedEvent, occurrences_in_range};
