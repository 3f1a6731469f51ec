//! Point-count reduction for long histories.
//!
//! Long histories are reduced by block-averaging consecutive months so a
//! chart never plots more than a fixed number of points per curve.
//! Invalid months are left out of the averages; a block with no valid
//! month for a channel stays invalid for that channel.

use crate::{
    resource::CATEGORY_COUNT,
    snapshot::{date_from_ordinal, day_ordinal, Snapshot},
};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Downsampled {
    /// Strictly ascending block dates (mean date of each block).
    pub dates:    Vec<NaiveDate>,
    /// One series per category, each `dates.len()` long. None = no data.
    pub channels: [Vec<Option<f64>>; CATEGORY_COUNT],
}

impl Downsampled {
    pub fn empty() -> Self {
        Self {
            dates:    Vec::new(),
            channels: std::array::from_fn(|_| Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// How many input rows go into each output row, and how many output rows
/// result, for `count` inputs and at most `max_points` outputs.
pub fn block_plan(count: usize, max_points: usize) -> (usize, usize) {
    if count == 0 {
        return (1, 0);
    }
    let max_points = max_points.max(1);
    let points_to_combine = count.div_ceil(max_points);
    (points_to_combine, count.div_ceil(points_to_combine))
}

#[derive(Default)]
struct Block {
    rows:        usize,
    ordinal_sum: i64,
    sums:        [u64; CATEGORY_COUNT],
    counts:      [usize; CATEGORY_COUNT],
}

impl Block {
    fn add(&mut self, snapshot: &Snapshot) {
        self.rows += 1;
        self.ordinal_sum += day_ordinal(snapshot.date);
        for (i, value) in snapshot.values.iter().enumerate() {
            if let Some(v) = value {
                self.sums[i] += u64::from(*v);
                self.counts[i] += 1;
            }
        }
    }

    fn emit(&mut self, out: &mut Downsampled, fallback: NaiveDate) {
        let mean_ordinal = self.ordinal_sum / self.rows as i64;
        out.dates.push(date_from_ordinal(mean_ordinal).unwrap_or(fallback));
        for (i, channel) in out.channels.iter_mut().enumerate() {
            channel.push(
                (self.counts[i] > 0).then(|| self.sums[i] as f64 / self.counts[i] as f64),
            );
        }
        *self = Block::default();
    }
}

/// Reduce a date-ordered run of snapshots to at most `max_points` rows.
pub fn reduce(snapshots: &[Snapshot], max_points: usize) -> Downsampled {
    let (points_to_combine, output_size) = block_plan(snapshots.len(), max_points);
    let mut out = Downsampled {
        dates:    Vec::with_capacity(output_size),
        channels: std::array::from_fn(|_| Vec::with_capacity(output_size)),
    };

    let mut block = Block::default();
    let last = snapshots.len().saturating_sub(1);
    for (i, snapshot) in snapshots.iter().enumerate() {
        block.add(snapshot);
        if block.rows == points_to_combine || i == last {
            block.emit(&mut out, snapshot.date);
        }
    }

    debug_assert_eq!(out.dates.len(), output_size);
    out
}
