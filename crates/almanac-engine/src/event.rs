use chrono::{Days, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use almanac_core::types::EventCategory;

use crate::error::{EngineError, EngineResult};
use crate::recurrence::RecurrenceRule;

/// `"HH:MM"` wall-clock (de)serialization. Seconds are accepted on input and
/// dropped on output.
pub mod wall_clock {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    /// ## Errors
    /// Propagates serializer failures.
    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    /// ## Errors
    /// Fails when the string is neither `HH:MM` nor `HH:MM:SS`.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// ## Errors
    /// Fails when the string is neither `HH:MM` nor `HH:MM:SS`.
    pub fn parse(raw: &str) -> Result<NaiveTime, String> {
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .map_err(|e| format!("invalid wall-clock time '{raw}': {e}"))
    }

    /// The same format for optional fields; `null` maps to `None`.
    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        /// ## Errors
        /// Propagates serializer failures.
        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => super::serialize(time, serializer),
                None => serializer.serialize_none(),
            }
        }

        /// ## Errors
        /// Fails when a present value is neither `HH:MM` nor `HH:MM:SS`.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| super::parse(&raw))
                .transpose()
                .map_err(serde::de::Error::custom)
        }
    }
}

/// Start and end wall-clock times of a non-all-day event.
///
/// `end <= start` is representable; the layout engine treats it as degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimedInterval {
    #[serde(with = "wall_clock")]
    pub start: NaiveTime,
    #[serde(with = "wall_clock")]
    pub end: NaiveTime,
}

impl TimedInterval {
    #[must_use]
    pub const fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Builds an interval from hour/minute pairs; `None` if either is out of range.
    #[must_use]
    pub fn from_hm(start: (u32, u32), end: (u32, u32)) -> Option<Self> {
        Some(Self {
            start: NaiveTime::from_hms_opt(start.0, start.1, 0)?,
            end: NaiveTime::from_hms_opt(end.0, end.1, 0)?,
        })
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.end <= self.start
    }

    /// Minutes from start to end, negative or zero when degenerate.
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        minutes_of_day(self.end) - minutes_of_day(self.start)
    }
}

pub(crate) fn minutes_of_day(time: NaiveTime) -> i64 {
    i64::from(time.hour() * 60 + time.minute())
}

/// The authored event as handed to the engine by the store. Never mutated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseEvent {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimedInterval>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub category: EventCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
}

impl BaseEvent {
    /// Whole days between `start_date` and `end_date`.
    #[must_use]
    pub fn span_days(&self) -> u64 {
        u64::try_from((self.end_date - self.start_date).num_days()).unwrap_or(0)
    }

    /// The wall-clock interval, ignored for all-day events.
    #[must_use]
    pub fn timed_interval(&self) -> Option<TimedInterval> {
        if self.all_day { None } else { self.time }
    }

    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// ## Summary
    /// Checks the date order and the recurrence rule, if any.
    ///
    /// ## Errors
    /// `InvalidEvent` when `end_date` precedes `start_date`; `InvalidRule`
    /// from [`RecurrenceRule::validate`].
    pub fn validate(&self) -> EngineResult<()> {
        if self.end_date < self.start_date {
            tracing::debug!(event_id = %self.id, "Rejected event ending before it starts");
            return Err(EngineError::InvalidEvent(format!(
                "end date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }
        if let Some(rule) = &self.recurrence {
            rule.validate()?;
        }
        Ok(())
    }

    /// Materializes the instance of this event that starts on `instance_date`,
    /// keeping the original span.
    #[must_use]
    pub fn occurrence_on(&self, instance_date: NaiveDate) -> EventOccurrence {
        let end_date = instance_date
            .checked_add_days(Days::new(self.span_days()))
            .unwrap_or(NaiveDate::MAX);

        EventOccurrence {
            event_id: self.id,
            instance_date,
            start_date: instance_date,
            end_date,
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            all_day: self.all_day,
            time: self.timed_interval(),
            recurring: self.is_recurring(),
        }
    }
}

/// One concrete dated instance of an event. Recomputed per query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventOccurrence {
    pub event_id: Uuid,
    pub instance_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: EventCategory,
    pub all_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<TimedInterval>,
    pub recurring: bool,
}

impl EventOccurrence {
    /// Stable identifier of this instance, `"{event_id}:{YYYYMMDD}"`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}", self.event_id, self.instance_date.format("%Y%m%d"))
    }

    /// Whether the instance's span includes `date`.
    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}
