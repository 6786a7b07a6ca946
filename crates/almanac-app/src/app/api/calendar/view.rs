//! Response shapes that decorate engine output for display.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use almanac_core::config::CategoryPalette;
use almanac_core::types::WeekStart;
use almanac_engine::{EventBox, EventOccurrence, GridCell};
use almanac_service::calendar::{
    Agenda, AgendaDay, DailyDigest, SkippedEvent, WeeklyDigest, describe_time,
};
use almanac_service::model::task::Task;

/// An occurrence with its stable key, category colour and time label.
#[derive(Debug, Clone, Serialize)]
pub struct OccurrenceView {
    pub key: String,
    #[serde(flatten)]
    pub occurrence: EventOccurrence,
    pub color: String,
    pub time_label: String,
}

impl OccurrenceView {
    pub fn new(occurrence: EventOccurrence, palette: &CategoryPalette) -> Self {
        Self {
            key: occurrence.key(),
            color: palette.color_for(occurrence.category).to_string(),
            time_label: describe_time(&occurrence),
            occurrence,
        }
    }

    pub fn all(occurrences: Vec<EventOccurrence>, palette: &CategoryPalette) -> Vec<Self> {
        occurrences
            .into_iter()
            .map(|occurrence| Self::new(occurrence, palette))
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct OccurrencesResponse {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub occurrences: Vec<OccurrenceView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedEvent>,
}

#[derive(Debug, Serialize)]
pub struct AgendaDayView {
    #[serde(flatten)]
    pub cell: GridCell,
    pub occurrences: Vec<OccurrenceView>,
    pub tasks: Vec<Task>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<BTreeMap<String, EventBox>>,
}

#[derive(Debug, Serialize)]
pub struct AgendaView {
    pub reference: NaiveDate,
    pub week_start: WeekStart,
    pub days: Vec<AgendaDayView>,
    pub week_numbers: Vec<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hour_labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedEvent>,
}

impl AgendaView {
    pub fn new(agenda: Agenda, palette: &CategoryPalette) -> Self {
        let days = agenda
            .days
            .into_iter()
            .map(|AgendaDay { cell, occurrences, tasks, layout }| AgendaDayView {
                cell,
                occurrences: OccurrenceView::all(occurrences, palette),
                tasks,
                layout,
            })
            .collect();

        Self {
            reference: agenda.reference,
            week_start: agenda.week_start,
            days,
            week_numbers: agenda.week_numbers,
            hour_labels: agenda.hour_labels,
            skipped: agenda.skipped,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DailyDigestView {
    pub date: NaiveDate,
    pub occurrences: Vec<OccurrenceView>,
    pub tasks: Vec<Task>,
}

impl DailyDigestView {
    pub fn new(digest: DailyDigest, palette: &CategoryPalette) -> Self {
        Self {
            date: digest.date,
            occurrences: OccurrenceView::all(digest.occurrences, palette),
            tasks: digest.tasks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DigestDayView {
    pub date: NaiveDate,
    pub occurrences: Vec<OccurrenceView>,
}

#[derive(Debug, Serialize)]
pub struct WeeklyDigestView {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<DigestDayView>,
    pub pending_tasks: Vec<Task>,
}

impl WeeklyDigestView {
    pub fn new(digest: WeeklyDigest, palette: &CategoryPalette) -> Self {
        Self {
            start: digest.start,
            end: digest.end,
            days: digest
                .days
                .into_iter()
                .map(|day| DigestDayView {
                    date: day.date,
                    occurrences: OccurrenceView::all(day.occurrences, palette),
                })
                .collect(),
            pending_tasks: digest.pending_tasks,
        }
    }
}
