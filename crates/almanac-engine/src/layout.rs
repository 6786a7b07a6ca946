//! Vertical placement of timed entries on a day column.
//!
//! Overlapping entries are not split into columns; they receive identical
//! geometry and the renderer decides how to stack them.

use std::collections::BTreeMap;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use almanac_core::constants::{DEFAULT_MIN_EVENT_HEIGHT, DEFAULT_PIXELS_PER_HOUR};

use crate::error::{EngineError, EngineResult};
use crate::event::{EventOccurrence, TimedInterval, wall_clock};

/// Duration given to an entry whose end is not after its start: one minute.
pub const MIN_DURATION_HOURS: f64 = 1.0 / 60.0;

/// An entry to place on the time axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEntry {
    pub id: String,
    #[serde(with = "wall_clock")]
    pub start: NaiveTime,
    #[serde(with = "wall_clock")]
    pub end: NaiveTime,
}

impl TimedEntry {
    #[must_use]
    pub fn new(id: impl Into<String>, interval: TimedInterval) -> Self {
        Self {
            id: id.into(),
            start: interval.start,
            end: interval.end,
        }
    }

    /// Keyed by the occurrence key; `None` for all-day occurrences.
    #[must_use]
    pub fn from_occurrence(occurrence: &EventOccurrence) -> Option<Self> {
        occurrence
            .time
            .filter(|_| !occurrence.all_day)
            .map(|interval| Self::new(occurrence.key(), interval))
    }
}

/// Pixel geometry of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EventBox {
    pub top: f64,
    pub height: f64,
}

/// Scale of the time axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pixels_per_hour: f64,
    min_height: f64,
}

impl LayoutOptions {
    /// ## Errors
    /// Returns `InvalidLayout` unless both values are finite and positive.
    pub fn new(pixels_per_hour: f64, min_height: f64) -> EngineResult<Self> {
        if !(pixels_per_hour.is_finite() && pixels_per_hour > 0.0) {
            return Err(EngineError::InvalidLayout(format!(
                "pixels per hour must be finite and positive, got {pixels_per_hour}"
            )));
        }
        if !(min_height.is_finite() && min_height > 0.0) {
            return Err(EngineError::InvalidLayout(format!(
                "minimum height must be finite and positive, got {min_height}"
            )));
        }
        Ok(Self {
            pixels_per_hour,
            min_height,
        })
    }

    #[must_use]
    pub const fn pixels_per_hour(&self) -> f64 {
        self.pixels_per_hour
    }

    #[must_use]
    pub const fn min_height(&self) -> f64 {
        self.min_height
    }

    /// Geometry of a single start/end pair.
    #[must_use]
    pub fn place(&self, start: NaiveTime, end: NaiveTime) -> EventBox {
        let start_hours = fractional_hours(start);
        let mut duration = fractional_hours(end) - start_hours;
        if duration <= 0.0 {
            tracing::debug!(%start, %end, "Clamping degenerate interval to one minute");
            duration = MIN_DURATION_HOURS;
        }

        EventBox {
            top: start_hours * self.pixels_per_hour,
            height: (duration * self.pixels_per_hour).max(self.min_height),
        }
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            pixels_per_hour: DEFAULT_PIXELS_PER_HOUR,
            min_height: DEFAULT_MIN_EVENT_HEIGHT,
        }
    }
}

fn fractional_hours(time: NaiveTime) -> f64 {
    f64::from(time.hour()) + f64::from(time.minute()) / 60.0
}

/// ## Summary
/// Computes the box of every entry. A repeated id keeps the last entry's box.
#[must_use]
pub fn layout_timed_events(
    entries: &[TimedEntry],
    options: &LayoutOptions,
) -> BTreeMap<String, EventBox> {
    entries
        .iter()
        .map(|entry| (entry.id.clone(), options.place(entry.start, entry.end)))
        .collect()
}
