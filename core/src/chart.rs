//! Chart model built from the snapshot history.
//!
//! The chart computes everything a renderer needs in normalized plot
//! coordinates: curve segments, gridlines with labels, and tooltip
//! lookup. It never touches pixels. One `YearRange` and one `ValueRange`
//! are computed per build and reused for every output.

use crate::{
    downsample::{self, Downsampled},
    hit_test::{self, Cursor, Hit, TOOLTIP_TOLERANCE},
    history::{SnapshotHistory, DEFAULT_MAX_POINTS},
    range::{self, AxisTick, ValueRange, YearRange},
    resource::{categories, Category, Direction, EnabledCategories},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const MONTHS_PER_YEAR: usize = 12;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoryWindow {
    #[default]
    All,
    Last10Years,
    Last25Years,
    Last50Years,
}

impl HistoryWindow {
    pub fn years(&self) -> Option<usize> {
        match self {
            Self::All         => None,
            Self::Last10Years => Some(10),
            Self::Last25Years => Some(25),
            Self::Last50Years => Some(50),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All         => "All History",
            Self::Last10Years => "Last 10 Years",
            Self::Last25Years => "Last 25 Years",
            Self::Last50Years => "Last 50 Years",
        }
    }

    /// Index of the first snapshot shown for a history of `count` months.
    pub fn first_index(&self, count: usize) -> usize {
        match self.years() {
            None => 0,
            Some(years) => count.saturating_sub(years * MONTHS_PER_YEAR),
        }
    }
}

/// Window choices worth offering for a history of `count` months.
/// Nothing is offered until there are ten years of history.
pub fn available_windows(count: usize) -> Vec<HistoryWindow> {
    let mut windows = Vec::new();
    if count >= 10 * MONTHS_PER_YEAR {
        windows.push(HistoryWindow::All);
        windows.push(HistoryWindow::Last10Years);
    }
    if count >= 25 * MONTHS_PER_YEAR {
        windows.push(HistoryWindow::Last25Years);
    }
    if count >= 50 * MONTHS_PER_YEAR {
        windows.push(HistoryWindow::Last50Years);
    }
    windows
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub direction:  Direction,
    pub window:     HistoryWindow,
    pub enabled:    EnabledCategories,
    pub max_points: usize,
}

impl Default for ChartRequest {
    fn default() -> Self {
        Self {
            direction:  Direction::Import,
            window:     HistoryWindow::All,
            enabled:    EnabledCategories::all(),
            max_points: DEFAULT_MAX_POINTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    pub category: Category,
    pub label:    String,
    pub values:   Vec<Option<f64>>,
}

/// A straight line between two plotted points, in plot coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: (f64, f64),
    pub to:   (f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gridlines {
    /// Horizontal lines, labelled with values, bottom to top.
    pub values: Vec<AxisTick>,
    /// Vertical lines, labelled with years, left to right.
    pub years:  Vec<AxisTick>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub hit:      Hit,
    pub category: Category,
    pub text:     String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryChart {
    pub heading:     &'static str,
    pub direction:   Direction,
    pub dates:       Vec<NaiveDate>,
    pub curves:      Vec<Curve>,
    pub min_value:   f64,
    pub max_value:   f64,
    pub year_range:  YearRange,
    pub value_range: ValueRange,
    /// Window options to offer for the full history length.
    pub windows:     Vec<HistoryWindow>,
}

impl HistoryChart {
    /// Build the chart for `request` from the current history.
    ///
    /// `today` positions the axis when there is no history yet.
    pub fn build(history: &SnapshotHistory, request: &ChartRequest, today: NaiveDate) -> Self {
        let (count, reduced) = history.with_snapshots(|snapshots| {
            let first = request.window.first_index(snapshots.len());
            (snapshots.len(), downsample::reduce(&snapshots[first..], request.max_points))
        });
        let mut chart = Self::from_downsampled(request.direction, &reduced, &request.enabled, today);
        chart.windows = available_windows(count);
        chart
    }

    /// Build from already reduced series. Dates must be strictly ascending.
    pub fn from_downsampled(
        direction: Direction,
        reduced: &Downsampled,
        enabled: &EnabledCategories,
        today: NaiveDate,
    ) -> Self {
        assert!(
            reduced.dates.windows(2).all(|w| w[0] < w[1]),
            "chart dates must be ascending with no duplicates"
        );

        let (start, end) = match (reduced.dates.first(), reduced.dates.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => (today, today),
        };

        let curves: Vec<Curve> = if reduced.is_empty() {
            Vec::new()
        } else {
            categories(direction)
                .filter(|(i, _)| enabled.is_enabled(*i))
                .map(|(i, category)| Curve {
                    category,
                    label: category.label().to_string(),
                    values: reduced.channels[i].clone(),
                })
                .collect()
        };

        let mut min_value: f64 = 0.0;
        let mut max_value: f64 = 0.0;
        for value in curves.iter().flat_map(|c| c.values.iter().flatten()) {
            min_value = min_value.min(*value);
            max_value = max_value.max(*value);
        }

        Self {
            heading: direction.label(),
            direction,
            dates: reduced.dates.clone(),
            curves,
            min_value,
            max_value,
            year_range: range::year_range(start, end),
            value_range: range::value_range(min_value, max_value),
            windows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    fn point(&self, date_index: usize, value: f64) -> (f64, f64) {
        (
            self.year_range.normalize(self.dates[date_index]),
            self.value_range.normalize(value),
        )
    }

    /// Line segments for one curve. Segments touching a month with no
    /// data are left out, so gaps show as breaks instead of straight lines.
    pub fn segments(&self, curve_index: usize) -> Vec<Segment> {
        let Some(curve) = self.curves.get(curve_index) else {
            return Vec::new();
        };
        curve
            .values
            .windows(2)
            .enumerate()
            .filter_map(|(i, pair)| match (pair[0], pair[1]) {
                (Some(a), Some(b)) => Some(Segment {
                    from: self.point(i, a),
                    to:   self.point(i + 1, b),
                }),
                _ => None,
            })
            .collect()
    }

    /// Gridlines and labels. None are drawn for an empty chart.
    pub fn gridlines(&self) -> Gridlines {
        if self.is_empty() {
            return Gridlines { values: Vec::new(), years: Vec::new() };
        }
        Gridlines {
            values: self.value_range.value_ticks(),
            years:  self.year_range.year_ticks(),
        }
    }

    /// The hovered point and its tooltip text, if any.
    pub fn tooltip(&self, cursor: Cursor) -> Option<Tooltip> {
        self.tooltip_within(cursor, TOOLTIP_TOLERANCE)
    }

    pub fn tooltip_within(&self, cursor: Cursor, tolerance: f64) -> Option<Tooltip> {
        let series: Vec<&[Option<f64>]> = self.curves.iter().map(|c| c.values.as_slice()).collect();
        let hit = hit_test::locate_within(
            cursor,
            &self.dates,
            &series,
            &self.year_range,
            &self.value_range,
            tolerance,
        )?;
        let curve = &self.curves[hit.curve_index];
        Some(Tooltip {
            hit,
            category: curve.category,
            text: hit_test::tooltip_text(&curve.label, hit.date, hit.value),
        })
    }
}
