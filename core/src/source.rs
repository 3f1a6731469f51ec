//! Resource data sources.
//!
//! The history reads raw totals only at the moment a real sample is
//! about to be recorded, so a source is consulted at most once per month.

use crate::{
    resource::CATEGORY_COUNT,
    rng::{CategoryRng, RngBank},
    snapshot::{RawTotals, MAX_RESOURCE_COUNT},
};
use chrono::NaiveDate;

/// Supplies current-month running totals per category.
pub trait ResourceSource: Send {
    /// Totals for the month starting at `month`.
    fn current_totals(&mut self, month: NaiveDate) -> RawTotals;
}

impl<F> ResourceSource for F
where
    F: FnMut(NaiveDate) -> RawTotals + Send,
{
    fn current_totals(&mut self, month: NaiveDate) -> RawTotals {
        self(month)
    }
}

/// A source that always reports the same totals.
#[derive(Debug, Clone)]
pub struct FixedSource(pub RawTotals);

impl ResourceSource for FixedSource {
    fn current_totals(&mut self, _month: NaiveDate) -> RawTotals {
        self.0
    }
}

/// Per-category random walk, reproducible from a seed.
///
/// Levels drift by a few percent each month; occasionally a category
/// drops to zero for a month (a closed outside connection).
pub struct SyntheticSource {
    levels: [f64; CATEGORY_COUNT],
    rngs:   Vec<CategoryRng>,
}

impl SyntheticSource {
    pub fn new(seed: u64) -> Self {
        let bank = RngBank::new(seed);
        let mut rngs: Vec<CategoryRng> = (0..CATEGORY_COUNT).map(|i| bank.for_category(i)).collect();
        let mut levels = [0.0; CATEGORY_COUNT];
        for (level, rng) in levels.iter_mut().zip(rngs.iter_mut()) {
            *level = f64::from(rng.level(50, 1_000));
        }
        Self { levels, rngs }
    }
}

impl ResourceSource for SyntheticSource {
    fn current_totals(&mut self, _month: NaiveDate) -> RawTotals {
        let mut totals = [0; CATEGORY_COUNT];
        for ((total, level), rng) in totals.iter_mut().zip(self.levels.iter_mut()).zip(self.rngs.iter_mut()) {
            *level = (*level * rng.growth(-0.08, 0.10)).clamp(1.0, MAX_RESOURCE_COUNT as f64);
            *total = if rng.chance(0.02) { 0 } else { level.round() as u32 };
        }
        totals
    }
}
