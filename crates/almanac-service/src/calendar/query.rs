use std::cmp::Ordering;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use almanac_engine::{EngineError, EventOccurrence, expand_recurrence};

use crate::error::ServiceResult;
use crate::store::EventStore;

/// A stored event left out of a query because the engine rejected it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEvent {
    pub event_id: Uuid,
    pub title: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OccurrenceQuery {
    pub occurrences: Vec<EventOccurrence>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedEvent>,
}

impl OccurrenceQuery {
    /// Occurrences whose span covers `date`, in query order.
    pub fn on(&self, date: NaiveDate) -> impl Iterator<Item = &EventOccurrence> {
        self.occurrences
            .iter()
            .filter(move |occurrence| occurrence.covers(date))
    }
}

/// ## Summary
/// Expands every event of `owner` that can reach `[from, to]` and returns the
/// occurrences overlapping that range. Multi-day occurrences that started
/// before `from` but are still running are included.
///
/// Events the engine rejects are reported in `skipped` rather than failing the
/// whole query.
///
/// ## Errors
/// `InvalidQuery` if `from > to`; storage errors.
#[tracing::instrument(skip(store))]
pub fn occurrences_in_range<S: EventStore + ?Sized>(
    store: &S,
    owner: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> ServiceResult<OccurrenceQuery> {
    if from > to {
        return Err(EngineError::InvalidQuery(format!(
            "range start {from} is after range end {to}"
        ))
        .into());
    }

    let mut result = OccurrenceQuery::default();
    for stored in store.events_in_range(owner, from, to)? {
        let event = &stored.event;
        let window_start = from
            .checked_sub_days(Days::new(event.span_days()))
            .unwrap_or(NaiveDate::MIN);

        match expand_recurrence(event, window_start, Some(to)) {
            Ok(occurrences) => result
                .occurrences
                .extend(occurrences.filter(|occurrence| occurrence.end_date >= from)),
            Err(e) => {
                tracing::warn!(event_id = %event.id, error = %e, "Skipping event the engine rejected");
                result.skipped.push(SkippedEvent {
                    event_id: event.id,
                    title: event.title.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    result.occurrences.sort_by(compare_occurrences);
    tracing::debug!(
        occurrences = result.occurrences.len(),
        skipped = result.skipped.len(),
        "Range expanded"
    );
    Ok(result)
}

/// Date, then all-day before timed, then start time, then title.
pub(crate) fn compare_occurrences(a: &EventOccurrence, b: &EventOccurrence) -> Ordering {
    a.start_date
        .cmp(&b.start_date)
        .then_with(|| b.all_day.cmp(&a.all_day))
        .then_with(|| {
            let start = |o: &EventOccurrence| o.time.map(|interval| interval.start);
            start(a).cmp(&start(b))
        })
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.event_id.cmp(&b.event_id))
}
