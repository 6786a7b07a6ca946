//! Month and week grids.
//!
//! A month grid always holds whole rows of seven days starting on the chosen
//! week start, padded with filler days from the neighbouring months.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use almanac_core::types::WeekStart;

use crate::date::{first_of_month, last_of_month, same_month, start_of_week};

pub const DAYS_PER_ROW: usize = 7;

/// One day slot in a rendered grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridCell {
    pub date: NaiveDate,
    /// False for filler days borrowed from the adjacent month.
    pub in_focus_period: bool,
}

impl GridCell {
    #[must_use]
    pub const fn is_filler(&self) -> bool {
        !self.in_focus_period
    }
}

/// ## Summary
/// Builds the cells of the month containing `reference`.
///
/// The result has `7 × W` cells where `W` is the smallest number of rows,
/// each beginning on `week_start`, that covers every day of the month.
#[must_use]
pub fn build_month_grid(reference: NaiveDate, week_start: WeekStart) -> Vec<GridCell> {
    let first = first_of_month(reference);
    let last = last_of_month(reference);
    let leading = week_start.offset_of(first.weekday());
    let grid_start = first
        .checked_sub_days(Days::new(u64::from(leading)))
        .unwrap_or(first);

    let mut cells = Vec::with_capacity(6 * DAYS_PER_ROW);
    let mut days = grid_start.iter_days();

    loop {
        let row_len_before = cells.len();
        cells.extend(days.by_ref().take(DAYS_PER_ROW).map(|date| GridCell {
            date,
            in_focus_period: same_month(date, reference),
        }));

        let Some(row_end) = cells.last().map(|cell| cell.date) else {
            break;
        };
        if cells.len() - row_len_before < DAYS_PER_ROW {
            // Ran into the end of the representable calendar.
            break;
        }

        // Both must hold before stopping: the next day is outside the month,
        // and the row just emitted reached the month's final day.
        let running_day_left = row_end.succ_opt().is_none_or(|next| !same_month(next, reference));
        if running_day_left && row_end >= last {
            break;
        }
    }

    tracing::trace!(
        year = reference.year(),
        month = reference.month(),
        %week_start,
        cells = cells.len(),
        "Built month grid"
    );
    cells
}

/// ## Summary
/// Builds the seven cells of the week containing `reference`. Every cell is in
/// focus; `cells[0]` falls on `week_start`.
#[must_use]
pub fn build_week_grid(reference: NaiveDate, week_start: WeekStart) -> Vec<GridCell> {
    start_of_week(reference, week_start)
        .iter_days()
        .take(DAYS_PER_ROW)
        .map(|date| GridCell {
            date,
            in_focus_period: true,
        })
        .collect()
}

/// Splits a grid into its display rows.
pub fn rows(cells: &[GridCell]) -> impl Iterator<Item = &[GridCell]> {
    cells.chunks(DAYS_PER_ROW)
}
