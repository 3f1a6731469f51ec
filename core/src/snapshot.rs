//! Monthly resource snapshots and the calendar helpers they rely on.
//!
//! A snapshot is taken once per simulated month, dated the first day of
//! that month. Months with no real data are represented by gap fillers:
//! snapshots whose every value is `None`.

use crate::{
    resource::{Category, CATEGORY_COUNT},
    types::{DayOrdinal, ResourceCount},
};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Raw per-category totals handed over by the resource source.
pub type RawTotals = [ResourceCount; CATEGORY_COUNT];

/// Largest value that still fits the signed 32-bit wire field.
pub const MAX_RESOURCE_COUNT: ResourceCount = i32::MAX as ResourceCount;

/// Earliest date any snapshot may carry.
pub fn min_snapshot_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Latest month a snapshot may carry. Forward gap filling stops here.
pub fn max_snapshot_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 1).unwrap_or(NaiveDate::MAX)
}

/// Last calendar day the chart axis can represent.
pub fn max_calendar_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// True if `date` lies within years 1..=9999.
pub fn is_representable(date: NaiveDate) -> bool {
    date >= min_snapshot_date() && date <= max_calendar_date()
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// One month later, or None past the last snapshot month.
pub fn next_month(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(1))
        .filter(|d| *d <= max_snapshot_date())
}

/// One month earlier, or None before year 1.
pub fn prev_month(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_months(Months::new(1))
        .filter(|d| *d >= min_snapshot_date())
}

/// Every month from `start` through `end` inclusive, clamped to the
/// snapshot date range. Empty when `start > end`.
pub fn months_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let start = start.max(min_snapshot_date());
    let end = end.min(max_snapshot_date());
    let first = (start <= end).then_some(start);
    std::iter::successors(first, move |d| next_month(*d).filter(|n| *n <= end))
}

pub fn day_ordinal(date: NaiveDate) -> DayOrdinal {
    date.num_days_from_ce() as DayOrdinal
}

pub fn date_from_ordinal(ordinal: DayOrdinal) -> Option<NaiveDate> {
    i32::try_from(ordinal)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub date:   NaiveDate,
    /// One slot per category in `CATEGORIES` order. None = no data.
    pub values: [Option<ResourceCount>; CATEGORY_COUNT],
}

impl Snapshot {
    /// A measured snapshot. Values above the wire limit are capped.
    pub fn real(date: NaiveDate, totals: RawTotals) -> Self {
        Self {
            date,
            values: totals.map(|v| Some(v.min(MAX_RESOURCE_COUNT))),
        }
    }

    /// A gap filler: every category marked as no data.
    pub fn invalid(date: NaiveDate) -> Self {
        Self {
            date,
            values: [None; CATEGORY_COUNT],
        }
    }

    pub fn value(&self, category: Category) -> Option<ResourceCount> {
        category.index().and_then(|i| self.values[i])
    }

    pub fn is_gap_filler(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Overwrite values in place, keeping the date.
    pub fn overwrite(&mut self, other: &Snapshot) {
        self.values = other.values;
    }
}
