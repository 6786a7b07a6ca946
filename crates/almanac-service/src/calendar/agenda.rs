//! Grid views populated with occurrences and due tasks.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use almanac_core::types::WeekStart;
use almanac_engine::date::{day_hour_labels, week_number};
use almanac_engine::grid::{DAYS_PER_ROW, rows};
use almanac_engine::{
    EventBox, EventOccurrence, GridCell, LayoutOptions, TimedEntry, build_month_grid,
    build_week_grid, layout_timed_events,
};

use super::query::{SkippedEvent, occurrences_in_range};
use super::tasks::tasks_due_between;
use crate::error::{ServiceError, ServiceResult};
use crate::model::task::Task;
use crate::store::{EventStore, TaskStore};

#[derive(Debug, Clone, Serialize)]
pub struct AgendaDay {
    #[serde(flatten)]
    pub cell: GridCell,
    pub occurrences: Vec<EventOccurrence>,
    pub tasks: Vec<Task>,
    /// Boxes of the day's timed occurrences keyed by occurrence key. Week view only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<BTreeMap<String, EventBox>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Agenda {
    pub reference: NaiveDate,
    pub week_start: WeekStart,
    pub days: Vec<AgendaDay>,
    /// Week number of the first day of each row.
    pub week_numbers: Vec<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hour_labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedEvent>,
}

impl Agenda {
    #[must_use]
    pub fn day(&self, date: NaiveDate) -> Option<&AgendaDay> {
        self.days.iter().find(|day| day.cell.date == date)
    }
}

fn populate<S: EventStore + TaskStore + ?Sized>(
    store: &S,
    owner: Uuid,
    reference: NaiveDate,
    week_start: WeekStart,
    cells: &[GridCell],
) -> ServiceResult<Agenda> {
    let (Some(first), Some(last)) = (cells.first(), cells.last()) else {
        return Err(ServiceError::InvariantViolation("grid produced no cells"));
    };

    let query = occurrences_in_range(store, owner, first.date, last.date)?;
    let tasks = tasks_due_between(store, owner, first.date, last.date, false)?;

    let days = cells
        .iter()
        .map(|cell| AgendaDay {
            cell: *cell,
            occurrences: query.on(cell.date).cloned().collect(),
            tasks: tasks
                .iter()
                .filter(|task| task.is_due_on(cell.date))
                .cloned()
                .collect(),
            layout: None,
        })
        .collect();

    Ok(Agenda {
        reference,
        week_start,
        days,
        week_numbers: rows(cells).map(|row| week_number(row[0].date)).collect(),
        hour_labels: Vec::new(),
        skipped: query.skipped,
    })
}

/// ## Summary
/// The month grid around `reference`, each cell carrying its occurrences and
/// the tasks due that day.
///
/// ## Errors
/// Storage errors only.
#[tracing::instrument(skip(store))]
pub fn month_agenda<S: EventStore + TaskStore + ?Sized>(
    store: &S,
    owner: Uuid,
    reference: NaiveDate,
    week_start: WeekStart,
) -> ServiceResult<Agenda> {
    let cells = build_month_grid(reference, week_start);
    populate(store, owner, reference, week_start, &cells)
}

/// ## Summary
/// Like [`month_agenda`] for the week around `reference`, plus hour labels and
/// the time-axis layout of the timed occurrences starting on each day.
///
/// ## Errors
/// Storage errors only.
#[tracing::instrument(skip(store, options))]
pub fn week_agenda<S: EventStore + TaskStore + ?Sized>(
    store: &S,
    owner: Uuid,
    reference: NaiveDate,
    week_start: WeekStart,
    options: &LayoutOptions,
) -> ServiceResult<Agenda> {
    let cells = build_week_grid(reference, week_start);
    debug_assert_eq!(cells.len(), DAYS_PER_ROW);

    let mut agenda = populate(store, owner, reference, week_start, &cells)?;
    for day in &mut agenda.days {
        let entries: Vec<TimedEntry> = day
            .occurrences
            .iter()
            .filter(|occurrence| occurrence.start_date == day.cell.date)
            .filter_map(TimedEntry::from_occurrence)
            .collect();
        day.layout = Some(layout_timed_events(&entries, options));
    }
    agenda.hour_labels = day_hour_labels();
    Ok(agenda)
}
