use std::iter::FusedIterator;

use chrono::{Datelike, Days, NaiveDate};

use super::{Frequency, RecurrenceRule};
use crate::date::month_offset_date;
use crate::error::{EngineError, EngineResult};
use crate::event::{BaseEvent, EventOccurrence};

/// ## Summary
/// Expands `event` into the occurrences whose instance date lies in the
/// inclusive window `[window_start, window_end]`, in ascending date order.
///
/// The returned iterator is lazy. An event without a rule yields at most one
/// occurrence, on its `start_date`. A rule with neither `until` nor `count`
/// only ends at `window_end`, which is then mandatory.
///
/// ## Errors
/// - `InvalidQuery` if `window_start > window_end`, or if the rule is
///   unbounded and no `window_end` was given.
/// - `InvalidRule` / `InvalidEvent` if the event fails validation.
pub fn expand_recurrence(
    event: &BaseEvent,
    window_start: NaiveDate,
    window_end: Option<NaiveDate>,
) -> EngineResult<Occurrences<'_>> {
    if let Some(end) = window_end {
        if window_start > end {
            return Err(EngineError::InvalidQuery(format!(
                "window start {window_start} is after window end {end}"
            )));
        }
    }
    event.validate()?;

    let state = match &event.recurrence {
        None => State::Single,
        Some(rule) => {
            if !rule.is_bounded() && window_end.is_none() {
                return Err(EngineError::InvalidQuery(
                    "a rule without until or count needs a window end".to_string(),
                ));
            }
            State::Series(Series {
                cursor: DateCursor::new(rule, event.start_date),
                rule,
                generated: 0,
            })
        }
    };

    tracing::trace!(
        event_id = %event.id,
        %window_start,
        window_end = ?window_end,
        frequency = ?event.recurrence.as_ref().map(|rule| rule.frequency),
        "Expanding event"
    );

    Ok(Occurrences {
        event,
        window_start,
        window_end,
        state,
    })
}

/// Lazy, ascending sequence of the occurrences of one event.
#[derive(Debug)]
pub struct Occurrences<'a> {
    event: &'a BaseEvent,
    window_start: NaiveDate,
    window_end: Option<NaiveDate>,
    state: State<'a>,
}

#[derive(Debug)]
enum State<'a> {
    Single,
    Series(Series<'a>),
    Done,
}

impl Occurrences<'_> {
    fn in_window(&self, date: NaiveDate) -> bool {
        date >= self.window_start && self.window_end.is_none_or(|end| date <= end)
    }
}

impl Iterator for Occurrences<'_> {
    type Item = EventOccurrence;

    fn next(&mut self) -> Option<Self::Item> {
        let date = match &mut self.state {
            State::Done => return None,
            State::Single => {
                self.state = State::Done;
                let date = self.event.start_date;
                return self
                    .in_window(date)
                    .then(|| self.event.occurrence_on(date));
            }
            State::Series(series) => series.next_date(self.window_start, self.window_end),
        };

        if date.is_none() {
            self.state = State::Done;
        }
        date.map(|date| self.event.occurrence_on(date))
    }
}

impl FusedIterator for Occurrences<'_> {}

#[derive(Debug)]
struct Series<'a> {
    cursor: DateCursor,
    rule: &'a RecurrenceRule,
    /// Non-exception dates produced so far, in view or not.
    generated: u32,
}

impl Series<'_> {
    fn next_date(
        &mut self,
        window_start: NaiveDate,
        window_end: Option<NaiveDate>,
    ) -> Option<NaiveDate> {
        loop {
            if self.rule.count.is_some_and(|limit| self.generated >= limit) {
                return None;
            }

            let date = self.cursor.next()?;
            if self.rule.until.is_some_and(|until| date > until)
                || window_end.is_some_and(|end| date > end)
            {
                return None;
            }
            if self.rule.exceptions.contains(&date) {
                continue;
            }

            self.generated += 1;
            if date >= window_start {
                return Some(date);
            }
        }
    }
}

/// Candidate dates of a rule, ascending, never before the event's start.
/// `None` once chrono's date range is exhausted.
#[derive(Debug)]
struct DateCursor {
    step: Step,
    origin: NaiveDate,
    floor: NaiveDate,
    index: u64,
}

#[derive(Debug)]
enum Step {
    /// `origin + index × stride` days.
    Days { stride: u64 },
    /// Every masked weekday of every `week_stride`-th week; `origin` is a Sunday.
    Weekdays { mask: [bool; 7], week_stride: u64 },
    /// `index × stride` months after (`year`, `month`), day clamped into the month.
    Months {
        year: i32,
        month: u32,
        day: u32,
        stride: i64,
    },
}

impl DateCursor {
    fn new(rule: &RecurrenceRule, start: NaiveDate) -> Self {
        let interval = u64::from(rule.interval.max(1).unsigned_abs());
        let mut origin = start;

        let step = match rule.frequency {
            Frequency::Daily => Step::Days { stride: interval },
            Frequency::Weekly => match rule.weekday_mask() {
                Some(mask) => {
                    let back = u64::from(start.weekday().num_days_from_sunday());
                    origin = start.checked_sub_days(Days::new(back)).unwrap_or(start);
                    Step::Weekdays {
                        mask,
                        week_stride: interval,
                    }
                }
                None => Step::Days {
                    stride: interval.saturating_mul(7),
                },
            },
            Frequency::Monthly => Step::Months {
                year: start.year(),
                month: start.month(),
                day: rule.day_of_month.unwrap_or_else(|| start.day()),
                stride: i64::from(rule.interval.max(1)),
            },
            Frequency::Yearly => Step::Months {
                year: start.year(),
                month: rule.month_of_year.unwrap_or_else(|| start.month()),
                day: rule.day_of_month.unwrap_or_else(|| start.day()),
                stride: i64::from(rule.interval.max(1)).saturating_mul(12),
            },
        };

        Self {
            step,
            origin,
            floor: start,
            index: 0,
        }
    }

    fn next(&mut self) -> Option<NaiveDate> {
        loop {
            let index = self.index;
            self.index = index.checked_add(1)?;

            let candidate = match &self.step {
                Step::Days { stride } => self
                    .origin
                    .checked_add_days(Days::new(index.checked_mul(*stride)?))?,
                Step::Weekdays { mask, week_stride } => {
                    let day_of_week = index % 7;
                    let wanted = usize::try_from(day_of_week)
                        .ok()
                        .and_then(|slot| mask.get(slot).copied())
                        .unwrap_or(false);
                    if !wanted {
                        continue;
                    }
                    let offset = (index / 7)
                        .checked_mul(*week_stride)?
                        .checked_mul(7)?
                        .checked_add(day_of_week)?;
                    self.origin.checked_add_days(Days::new(offset))?
                }
                Step::Months {
                    year,
                    month,
                    day,
                    stride,
                } => {
                    let months = i64::try_from(index).ok()?.checked_mul(*stride)?;
                    month_offset_date(*year, *month, months, *day)?
                }
            };

            if candidate >= self.floor {
                return Some(candidate);
            }
        }
    }
}

#[cfg(test)]
#[path = "expand_tests.rs"]
mod tests;
