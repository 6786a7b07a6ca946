//! Calendar-day arithmetic shared by the grid and the recurrence expander.

use chrono::{Datelike, Days, Months, NaiveDate};

use almanac_core::types::WeekStart;

#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-based) of `year`; 0 for an invalid month.
#[must_use]
pub const fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Builds a date, pulling `day` back to the last day of a shorter month.
#[must_use]
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)))
}

/// Adds `months` to a (year, month) pair and clamps `day` into the result.
#[must_use]
pub fn month_offset_date(year: i32, month: u32, months: i64, day: u32) -> Option<NaiveDate> {
    let total = i64::from(year)
        .checked_mul(12)?
        .checked_add(i64::from(month) - 1)?
        .checked_add(months)?;
    let target_year = i32::try_from(total.div_euclid(12)).ok()?;
    let target_month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
    clamped_date(target_year, target_month, day)
}

/// Moves by whole months for navigation, keeping the day where the target
/// month allows it.
#[must_use]
pub fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let magnitude = Months::new(months.unsigned_abs());
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

#[must_use]
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[must_use]
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(days_in_month(date.year(), date.month()))
        .unwrap_or(date)
}

#[must_use]
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// First day of the week containing `date`.
#[must_use]
pub fn start_of_week(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let offset = week_start.offset_of(date.weekday());
    date.checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(NaiveDate::MIN)
}

/// Inclusive first and last day of the week containing `date`.
#[must_use]
pub fn week_bounds(date: NaiveDate, week_start: WeekStart) -> (NaiveDate, NaiveDate) {
    let start = start_of_week(date, week_start);
    let end = start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
    (start, end)
}

/// Sunday-anchored week-of-year: week 1 is the row holding January 1st.
#[must_use]
pub fn week_number(date: NaiveDate) -> u32 {
    let jan_first = date.with_ordinal(1).unwrap_or(date);
    (date.ordinal0() + jan_first.weekday().num_days_from_sunday()) / 7 + 1
}

/// Hour labels for the time axis, `"00:00"` through `"23:00"`.
#[must_use]
pub fn day_hour_labels() -> Vec<String> {
    (0..24).map(|hour| format!("{hour:02}:00")).collect()
}
