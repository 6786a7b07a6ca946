//! Date computation engine behind the calendar views.
//!
//! Three pure components, all synchronous and free of shared state:
//! - [`grid`] builds the month/week cell sequences for a reference date
//! - [`recurrence`] expands a base event into concrete occurrences in a window
//! - [`layout`] positions timed entries on a day column's time axis

pub mod date;
pub mod error;
pub mod event;
pub mod grid;
pub mod layout;
pub mod recurrence;

pub use error::{EngineError, EngineResult};
pub use event::{BaseEvent, EventOccurrence, TimedInterval};
pub use grid::{GridCell, build_month_grid, build_week_grid};
pub use layout::{EventBox, LayoutOptions, TimedEntry, layout_timed_events};
pub use recurrence::{Frequency, Occurrences, RecurrenceRule, expand_recurrence};
