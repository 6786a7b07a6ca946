use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use almanac_core::types::EventCategory;
use almanac_engine::{BaseEvent, RecurrenceRule, TimedInterval};

use super::deserialize_some;

/// An event as kept by the store: the engine's view plus ownership and
/// bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub owner_id: Uuid,
    #[serde(flatten)]
    pub event: BaseEvent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    /// Defaults to `start_date`.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub time: Option<TimedInterval>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub category: EventCategory,
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
}

impl NewEvent {
    #[must_use]
    pub fn into_stored(self, owner_id: Uuid) -> StoredEvent {
        let now = Utc::now();
        StoredEvent {
            owner_id,
            event: BaseEvent {
                id: Uuid::now_v7(),
                title: self.title.trim().to_string(),
                description: self.description,
                start_date: self.start_date,
                end_date: self.end_date.unwrap_or(self.start_date),
                time: self.time,
                all_day: self.all_day,
                category: self.category,
                recurrence: self.recurrence,
            },
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. For the nullable fields, an explicit `null` clears the
/// value while an absent key leaves it alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub time: Option<Option<TimedInterval>>,
    #[serde(default)]
    pub all_day: Option<bool>,
    #[serde(default)]
    pub category: Option<EventCategory>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub recurrence: Option<Option<RecurrenceRule>>,
}

impl EventPatch {
    pub fn apply(self, event: &mut BaseEvent) {
        if let Some(title) = self.title {
            event.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(start_date) = self.start_date {
            event.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            event.end_date = end_date;
        }
        if let Some(time) = self.time {
            event.time = time;
        }
        if let Some(all_day) = self.all_day {
            event.all_day = all_day;
        }
        if let Some(category) = self.category {
            event.category = category;
        }
        if let Some(recurrence) = self.recurrence {
            event.recurrence = recurrence;
        }
    }
}
