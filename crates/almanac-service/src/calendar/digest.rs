//! Daily and weekly summaries of what is coming up.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use almanac_core::types::WeekStart;
use almanac_engine::EventOccurrence;
use almanac_engine::date::week_bounds;

use super::query::occurrences_in_range;
use super::tasks::{tasks_due_between, tasks_due_on};
use crate::error::{ServiceError, ServiceResult};
use crate::model::task::Task;
use crate::store::{EventStore, TaskStore};

/// What the day after `today` holds.
#[derive(Debug, Clone, Serialize)]
pub struct DailyDigest {
    pub date: NaiveDate,
    pub occurrences: Vec<EventOccurrence>,
    pub tasks: Vec<Task>,
}

impl DailyDigest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty() && self.tasks.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DigestDay {
    pub date: NaiveDate,
    pub occurrences: Vec<EventOccurrence>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyDigest {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// One entry per day of the week, empty days included.
    pub days: Vec<DigestDay>,
    pub pending_tasks: Vec<Task>,
}

impl WeeklyDigest {
    #[must_use]
    pub fn occurrence_count(&self) -> usize {
        self.days.iter().map(|day| day.occurrences.len()).sum()
    }
}

/// ## Summary
/// Occurrences and tasks due on the day after `today`.
///
/// ## Errors
/// `InvariantViolation` at the end of the calendar; storage errors.
#[tracing::instrument(skip(store))]
pub fn daily_digest<S: EventStore + TaskStore + ?Sized>(
    store: &S,
    owner: Uuid,
    today: NaiveDate,
) -> ServiceResult<DailyDigest> {
    let tomorrow = today
        .checked_add_days(Days::new(1))
        .ok_or(ServiceError::InvariantViolation("no day after the last representable date"))?;

    Ok(DailyDigest {
        date: tomorrow,
        occurrences: occurrences_in_range(store, owner, tomorrow, tomorrow)?.occurrences,
        tasks: tasks_due_on(store, owner, tomorrow)?,
    })
}

/// ## Summary
/// The week containing `date`: occurrences grouped by day and the pending
/// tasks due within the week.
///
/// ## Errors
/// Storage errors only.
#[tracing::instrument(skip(store))]
pub fn weekly_digest<S: EventStore + TaskStore + ?Sized>(
    store: &S,
    owner: Uuid,
    date: NaiveDate,
    week_start: WeekStart,
) -> ServiceResult<WeeklyDigest> {
    let (start, end) = week_bounds(date, week_start);
    let query = occurrences_in_range(store, owner, start, end)?;

    let days = start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|day| DigestDay {
            date: day,
            occurrences: query.on(day).cloned().collect(),
        })
        .collect();

    Ok(WeeklyDigest {
        start,
        end,
        days,
        pending_tasks: tasks_due_between(store, owner, start, end, true)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use almanac_engine::RecurrenceRule;

    use crate::calendar::events::create_event;
    use crate::calendar::tasks::{create_task, toggle_task};
    use crate::store::InMemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn seed(store: &InMemoryStore, owner: Uuid) {
        let mut gym: crate::model::event::NewEvent = serde_json::from_str(
            r#"{"title": "Gym", "start_date": "2024-12-16", "time": {"start": "07:00", "end": "08:00"}}"#,
        )
        .expect("event");
        gym.recurrence = Some(RecurrenceRule::daily().with_interval(2));
        create_event(store, owner, gym).expect("gym");

        for json in [
            r#"{"title": "Pay rent", "due_date": "2024-12-17"}"#,
            r#"{"title": "Book flights", "due_date": "2024-12-20"}"#,
            r#"{"title": "Next week", "due_date": "2024-12-23"}"#,
        ] {
            create_task(store, owner, serde_json::from_str(json).expect("task")).expect("task");
        }
    }

    #[test_log::test]
    fn test_daily_digest_covers_tomorrow() {
        let store = InMemoryStore::new();
        let owner = Uuid::now_v7();
        seed(&store, owner);

        let digest = daily_digest(&store, owner, date(2024, 12, 17)).expect("digest");
        assert_eq!(digest.date, date(2024, 12, 18));
        assert_eq!(digest.occurrences.len(), 1);
        assert!(digest.tasks.is_empty());

        let digest = daily_digest(&store, owner, date(2024, 12, 16)).expect("digest");
        assert!(digest.occurrences.is_empty());
        assert_eq!(digest.tasks[0].title, "Pay rent");
        assert!(!digest.is_empty());
    }

    #[test]
    fn test_weekly_digest_groups_days_and_pending_tasks() {
        let store = InMemoryStore::new();
        let owner = Uuid::now_v7();
        seed(&store, owner);

        let rent = crate::calendar::tasks::tasks_due_on(&store, owner, date(2024, 12, 17))
            .expect("tasks")
            .remove(0);
        toggle_task(&store, owner, rent.id).expect("toggle");

        let digest = weekly_digest(&store, owner, date(2024, 12, 18), WeekStart::Monday).expect("digest");
        assert_eq!((digest.start, digest.end), (date(2024, 12, 16), date(2024, 12, 22)));
        assert_eq!(digest.days.len(), 7);
        // Every other day from the 16th: 16, 18, 20, 22.
        assert_eq!(digest.occurrence_count(), 4);
        assert!(digest.days[1].occurrences.is_empty());

        let pending: Vec<_> = digest.pending_tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(pending, ["Book flights"]);
    }
}
