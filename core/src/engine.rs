//! The history engine: drives the game clock and feeds the history.
//!
//! RULES:
//!   - One `record_sample` call per simulated day, in date order,
//!     except after an explicit `jump_to`.
//!   - The engine never reads the history back; charts do that through
//!     their own `Arc` handle.
//!   - All randomness lives in the source.

use crate::{
    clock::GameClock,
    event::HistoryEvent,
    history::SnapshotHistory,
    source::ResourceSource,
};
use chrono::NaiveDate;
use std::sync::Arc;

pub struct HistoryEngine {
    pub clock: GameClock,
    history:   Arc<SnapshotHistory>,
    source:    Box<dyn ResourceSource>,
}

impl HistoryEngine {
    pub fn new(
        start: NaiveDate,
        history: Arc<SnapshotHistory>,
        source: Box<dyn ResourceSource>,
    ) -> Self {
        Self {
            clock: GameClock::new(start),
            history,
            source,
        }
    }

    pub fn history(&self) -> &Arc<SnapshotHistory> {
        &self.history
    }

    pub fn date(&self) -> NaiveDate {
        self.clock.date
    }

    /// Sample the current date without moving the clock.
    pub fn sample_now(&mut self) -> Vec<HistoryEvent> {
        self.history.record_sample(self.clock.date, self.source.as_mut())
    }

    /// Advance one day and sample the new date.
    pub fn tick(&mut self) -> Vec<HistoryEvent> {
        assert!(!self.clock.paused, "tick() called on paused engine");
        let date = self.clock.advance();
        self.history.record_sample(date, self.source.as_mut())
    }

    /// Run n days in a loop. Used for testing and fast-forward.
    pub fn run_ticks(&mut self, n: u64) -> Vec<HistoryEvent> {
        self.clock.resume();
        let mut events = Vec::new();
        for _ in 0..n {
            events.extend(self.tick());
        }
        self.clock.pause();
        log::debug!("ran {n} days to {}; {} history events", self.clock.date, events.len());
        events
    }

    /// Move the clock straight to `date`, forward or backward, and sample it.
    pub fn jump_to(&mut self, date: NaiveDate) -> Vec<HistoryEvent> {
        log::info!("clock jump {} -> {date}", self.clock.date);
        self.clock.set_date(date);
        self.sample_now()
    }
}
