//! Recurrence rules and their expansion into occurrences.

mod expand;

use std::collections::BTreeSet;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

pub use expand::{Occurrences, expand_recurrence};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const fn default_interval() -> i32 {
    1
}

/// How a base event repeats.
///
/// `interval` is signed so that a zero or negative value coming off the wire
/// survives deserialization and is reported by [`RecurrenceRule::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    #[serde(default = "default_interval")]
    pub interval: i32,
    /// Last date a generated occurrence may fall on.
    #[serde(default, alias = "end_date", skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    /// Weekday indices, 0 = Sunday through 6 = Saturday. Weekly rules only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<BTreeSet<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_of_year: Option<u32>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exceptions: BTreeSet<NaiveDate>,
}

impl RecurrenceRule {
    #[must_use]
    pub const fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            until: None,
            count: None,
            days_of_week: None,
            day_of_month: None,
            month_of_year: None,
            exceptions: BTreeSet::new(),
        }
    }

    #[must_use]
    pub const fn daily() -> Self {
        Self::new(Frequency::Daily)
    }

    #[must_use]
    pub const fn weekly() -> Self {
        Self::new(Frequency::Weekly)
    }

    #[must_use]
    pub const fn monthly() -> Self {
        Self::new(Frequency::Monthly)
    }

    #[must_use]
    pub const fn yearly() -> Self {
        Self::new(Frequency::Yearly)
    }

    #[must_use]
    pub fn with_interval(mut self, interval: i32) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn ending_on(mut self, until: NaiveDate) -> Self {
        self.until = Some(until);
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn on_weekdays(mut self, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        self.days_of_week = Some(
            weekdays
                .into_iter()
                .map(|wd| u8::try_from(wd.num_days_from_sunday()).unwrap_or(u8::MAX))
                .collect(),
        );
        self
    }

    #[must_use]
    pub fn on_day_of_month(mut self, day: u32) -> Self {
        self.day_of_month = Some(day);
        self
    }

    #[must_use]
    pub fn in_month(mut self, month: u32) -> Self {
        self.month_of_year = Some(month);
        self
    }

    #[must_use]
    pub fn except(mut self, date: NaiveDate) -> Self {
        self.exceptions.insert(date);
        self
    }

    /// True when `until` or `count` ends the series on its own.
    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        self.until.is_some() || self.count.is_some()
    }

    /// The weekday filter as a Sunday-indexed mask. An empty set means no filter.
    #[must_use]
    pub fn weekday_mask(&self) -> Option<[bool; 7]> {
        let days = self.days_of_week.as_ref().filter(|days| !days.is_empty())?;
        let mut mask = [false; 7];
        for &day in days {
            if let Some(slot) = mask.get_mut(usize::from(day)) {
                *slot = true;
            }
        }
        Some(mask)
    }

    /// ## Summary
    /// Rejects rules that cannot be expanded or that mix fields from
    /// different frequencies.
    ///
    /// ## Errors
    /// Returns `InvalidRule` describing the first problem found.
    pub fn validate(&self) -> EngineResult<()> {
        self.check().map_err(|reason| {
            tracing::debug!(frequency = %self.frequency, %reason, "Rejected recurrence rule");
            EngineError::InvalidRule(reason)
        })
    }

    fn check(&self) -> Result<(), String> {
        if self.interval < 1 {
            return Err(format!("interval must be at least 1, got {}", self.interval));
        }
        if self.count == Some(0) {
            return Err("count must be at least 1".to_string());
        }

        if let Some(days) = self.days_of_week.as_ref().filter(|days| !days.is_empty()) {
            if self.frequency != Frequency::Weekly {
                return Err(format!(
                    "days_of_week only applies to weekly rules, not {}",
                    self.frequency
                ));
            }
            if let Some(bad) = days.iter().find(|&&day| day > 6) {
                return Err(format!("weekday index must be 0..=6, got {bad}"));
            }
        }

        if let Some(day) = self.day_of_month {
            if matches!(self.frequency, Frequency::Daily | Frequency::Weekly) {
                return Err(format!(
                    "day_of_month only applies to monthly and yearly rules, not {}",
                    self.frequency
                ));
            }
            if !(1..=31).contains(&day) {
                return Err(format!("day_of_month must be 1..=31, got {day}"));
            }
        }

        if let Some(month) = self.month_of_year {
            if self.frequency != Frequency::Yearly {
                return Err(format!(
                    "month_of_year only applies to yearly rules, not {}",
                    self.frequency
                ));
            }
            if !(1..=12).contains(&month) {
                return Err(format!("month_of_year must be 1..=12, got {month}"));
            }
        }

        Ok(())
    }
}
