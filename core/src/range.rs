//! Axis range and scale calculation.
//!
//! Both axes use the same "nice number" rule: the increment is the power
//! of ten just below half the span, and the bounds are snapped outward to
//! multiples of it. Gridlines, labels, plotted points and hit testing must
//! all use the one range computed here so labels and curves line up.

use crate::{
    snapshot::{day_ordinal, max_calendar_date, min_snapshot_date},
    types::DayOrdinal,
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Horizontal axes never show more than this many year steps.
pub const MAX_YEAR_STEPS: f64 = 15.0;

/// Power of ten not above `0.5 * span`, never below 1.
fn nice_increment(span: f64) -> i64 {
    let exponent = (0.5 * span).log10().floor();
    if !exponent.is_finite() || exponent < 0.0 {
        return 1;
    }
    10i64.checked_pow(exponent as u32).unwrap_or(i64::MAX)
}

fn floor_to(value: i64, increment: i64) -> i64 {
    increment * value.div_euclid(increment)
}

fn ceil_to(value: i64, increment: i64) -> i64 {
    -floor_to(-value, increment)
}

/// Day ordinal of January 1 of `year`, clamped to years 1..=9999.
fn year_start_ordinal(year: i32) -> DayOrdinal {
    if year < 1 {
        return day_ordinal(min_snapshot_date());
    }
    match NaiveDate::from_ymd_opt(year, 1, 1) {
        Some(date) if year <= 9999 => day_ordinal(date),
        _ => day_ordinal(max_calendar_date()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearRange {
    pub start_year: i32,
    pub end_year:   i32,
    pub increment:  i32,
    pub start_day:  DayOrdinal,
    pub end_day:    DayOrdinal,
}

impl YearRange {
    /// Horizontal position of `ordinal` in [0, 1] across the plot.
    pub fn normalize_ordinal(&self, ordinal: DayOrdinal) -> f64 {
        let span = (self.end_day - self.start_day) as f64;
        (ordinal - self.start_day) as f64 / span
    }

    pub fn normalize(&self, date: NaiveDate) -> f64 {
        self.normalize_ordinal(day_ordinal(date))
    }

    /// One tick per year step, starting with the main axis.
    pub fn year_ticks(&self) -> Vec<AxisTick> {
        let step = usize::try_from(self.increment).unwrap_or(1).max(1);
        (self.start_year..=self.end_year)
            .step_by(step)
            .map(|year| AxisTick {
                value:    year as f64,
                position: self.normalize_ordinal(year_start_ordinal(year)),
                label:    year.to_string(),
                is_axis:  year == self.start_year,
            })
            .collect()
    }
}

/// Year bounds for the horizontal axis.
///
/// The end year is exclusive of any partial year: a `max_date` other than
/// January 1 rounds up to the next year. The span is always at least one
/// year, and the increment doubles if it would produce more than fifteen
/// steps.
pub fn year_range(min_date: NaiveDate, max_date: NaiveDate) -> YearRange {
    let min_year = min_date.year();
    let mut max_year = max_date.year();
    if !(max_date.month() == 1 && max_date.day() == 1) {
        max_year += 1;
    }
    if max_year <= min_year {
        max_year = min_year + 1;
    }

    let (min_year, max_year) = (min_year as i64, max_year as i64);
    let mut increment = nice_increment((max_year - min_year) as f64);
    let mut start = floor_to(min_year, increment);
    let mut end = ceil_to(max_year, increment);
    if (end - start) as f64 / increment as f64 > MAX_YEAR_STEPS {
        increment *= 2;
        start = floor_to(min_year, increment);
        end = ceil_to(max_year, increment);
    }

    let start_year = start as i32;
    let end_year = end as i32;
    YearRange {
        start_year,
        end_year,
        increment: increment as i32,
        start_day: year_start_ordinal(start_year),
        end_day: year_start_ordinal(end_year),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub start:     f64,
    pub end:       f64,
    pub increment: f64,
}

impl ValueRange {
    /// Vertical position of `value` in [0, 1] across the plot.
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.start) / (self.end - self.start)
    }

    /// One tick per increment, starting with the main axis.
    pub fn value_ticks(&self) -> Vec<AxisTick> {
        let steps = ((self.end - self.start) / self.increment).round() as i64;
        (0..=steps)
            .map(|i| {
                let value = self.start + self.increment * i as f64;
                AxisTick {
                    value,
                    position: self.normalize(value),
                    label:    format_count(value),
                    is_axis:  i == 0,
                }
            })
            .collect()
    }
}

/// Value bounds for the vertical axis.
///
/// A minimum below 30% of the maximum snaps to zero so the baseline stays
/// visible, and the span is always at least 1.
pub fn value_range(min_value: f64, max_value: f64) -> ValueRange {
    let mut min_value = min_value;
    let mut max_value = max_value;
    if min_value < 0.3 * max_value {
        min_value = 0.0;
    }
    if max_value - min_value < 1.0 {
        max_value = min_value + 1.0;
    }

    let increment = nice_increment(max_value - min_value) as f64;
    ValueRange {
        start: increment * (min_value / increment).floor(),
        end: increment * (max_value / increment).ceil(),
        increment,
    }
}

/// A gridline with its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub value:    f64,
    /// Normalized position along the axis, 0 = plot start, 1 = plot end.
    pub position: f64,
    pub label:    String,
    /// The first tick is drawn as the main axis, not a helper line.
    pub is_axis:  bool,
}

/// Whole number with thousands separators, e.g. `12,345`.
pub fn format_count(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
