//! The snapshot history: the one store shared by the simulation tick
//! and the chart.
//!
//! RULES:
//!   - One mutex guards everything. Every public method holds it for its
//!     full duration, including multi-step gap fills, so readers never
//!     observe a half-filled gap.
//!   - Snapshots stay sorted ascending by date with no duplicate dates.
//!   - Until a load has completed (`loaded == true`) no real samples are
//!     accepted, so a partial or corrupt history never grows.

use crate::{
    codec,
    downsample::{self, Downsampled},
    error::HistoryResult,
    event::HistoryEvent,
    snapshot::{self, first_of_month, max_snapshot_date, Snapshot},
    source::ResourceSource,
};
use chrono::{Datelike, NaiveDate};
use std::sync::{
    mpsc::{self, Receiver, Sender},
    Mutex, MutexGuard,
};

/// Default cap on plotted points per curve.
pub const DEFAULT_MAX_POINTS: usize = 300;

struct HistoryState {
    snapshots:      Vec<Snapshot>,
    loaded:         bool,
    /// Date of the last real sample; `NaiveDate::MIN` after a reset.
    last_processed: NaiveDate,
    subscribers:    Vec<Sender<HistoryEvent>>,
}

impl HistoryState {
    fn new() -> Self {
        Self {
            snapshots:      Vec::new(),
            loaded:         false,
            last_processed: NaiveDate::MIN,
            subscribers:    Vec::new(),
        }
    }

    fn reset(&mut self) {
        self.snapshots.clear();
        self.loaded = false;
        self.last_processed = NaiveDate::MIN;
    }

    fn publish(&mut self, events: &[HistoryEvent]) {
        if events.is_empty() {
            return;
        }
        self.subscribers
            .retain(|tx| events.iter().all(|e| tx.send(e.clone()).is_ok()));
    }

    fn assert_sorted(&self) {
        debug_assert!(
            self.snapshots.windows(2).all(|w| w[0].date < w[1].date),
            "snapshot history is not strictly ascending"
        );
    }

    /// Prepend one gap filler per month from the first month at/after
    /// `date` up to (not including) the first stored month.
    fn fill_backward(&mut self, date: NaiveDate) -> Option<HistoryEvent> {
        let first = self.snapshots.first()?.date;
        if date >= first {
            return None;
        }
        let mut start = first_of_month(date);
        if date.day() != 1 {
            start = snapshot::next_month(start)?;
        }
        let end = snapshot::prev_month(first)?;
        let fillers: Vec<Snapshot> = snapshot::months_inclusive(start, end)
            .map(Snapshot::invalid)
            .collect();
        let count = fillers.len();
        if count == 0 {
            return None;
        }
        let from = fillers[0].date;
        let to = fillers[count - 1].date;
        assert!(to < first, "backward gap fill would overlap existing history");
        self.snapshots.splice(0..0, fillers);
        Some(HistoryEvent::GapFilledBackward { from, to, count })
    }

    /// Append one gap filler per month after the last stored month
    /// through the month containing `date`.
    fn fill_forward(&mut self, date: NaiveDate) -> Option<HistoryEvent> {
        let last = self.snapshots.last()?.date;
        if date <= last || last >= max_snapshot_date() {
            return None;
        }
        let start = snapshot::next_month(last)?;
        let end = first_of_month(date);
        let before = self.snapshots.len();
        self.snapshots
            .extend(snapshot::months_inclusive(start, end).map(Snapshot::invalid));
        let count = self.snapshots.len() - before;
        if count == 0 {
            return None;
        }
        let to = self.snapshots[self.snapshots.len() - 1].date;
        Some(HistoryEvent::GapFilledForward { from: start, to, count })
    }

    fn record_real(&mut self, date: NaiveDate, source: &mut dyn ResourceSource) -> HistoryEvent {
        let sample = Snapshot::real(date, source.current_totals(date));
        let replaced = match self.snapshots.binary_search_by_key(&date, |s| s.date) {
            Ok(i) => {
                self.snapshots[i].overwrite(&sample);
                true
            }
            Err(i) => {
                // Gap filling covers every month past either end, but a
                // loaded history may still have holes inside it.
                self.snapshots.insert(i, sample);
                false
            }
        };
        self.last_processed = date;
        HistoryEvent::SampleRecorded { date, replaced }
    }
}

/// Lock-guarded monthly snapshot store.
///
/// Construct one per game session and share it with `Arc`.
pub struct SnapshotHistory {
    state: Mutex<HistoryState>,
}

impl SnapshotHistory {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HistoryState::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HistoryState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            log::error!("snapshot history lock was poisoned; continuing with last consistent state");
            poisoned.into_inner()
        })
    }

    /// Reset for a new session. Must run before anything else.
    pub fn initialize(&self) {
        let mut state = self.lock();
        state.reset();
        state.publish(&[HistoryEvent::Initialized]);
    }

    /// Release all snapshots at session end.
    pub fn deinitialize(&self) {
        let mut state = self.lock();
        state.snapshots.clear();
        state.snapshots.shrink_to_fit();
        state.publish(&[HistoryEvent::Deinitialized]);
    }

    /// Receive an event for every structural change from now on.
    pub fn subscribe(&self) -> Receiver<HistoryEvent> {
        let (tx, rx) = mpsc::channel();
        self.lock().subscribers.push(tx);
        rx
    }

    /// Called once per simulated day with the current game date.
    ///
    /// Fills any gap between the stored history and `date` with invalid
    /// months, then on day 1 of a month records a real sample read from
    /// `source`. Returns the events produced; empty means no change.
    pub fn record_sample(
        &self,
        date: NaiveDate,
        source: &mut dyn ResourceSource,
    ) -> Vec<HistoryEvent> {
        let mut state = self.lock();
        if !state.loaded {
            return Vec::new();
        }
        if !snapshot::is_representable(date) {
            log::warn!("ignoring sample date {date} outside the supported calendar");
            return Vec::new();
        }

        let mut events = Vec::new();
        events.extend(state.fill_backward(date));
        events.extend(state.fill_forward(date));

        if date.day() == 1 && date != state.last_processed {
            events.push(state.record_real(date, source));
        }
        state.assert_sorted();

        for event in &events {
            log::debug!("history {}: {:?}", event.type_name(), event);
        }
        state.publish(&events);
        events
    }

    pub fn is_loaded(&self) -> bool {
        self.lock().loaded
    }

    pub fn len(&self) -> usize {
        self.lock().snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().snapshots.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.lock().snapshots.first().map(|s| s.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.lock().snapshots.last().map(|s| s.date)
    }

    /// A copy of the full history.
    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.lock().snapshots.clone()
    }

    /// Run `f` over the history while holding the lock.
    pub fn with_snapshots<R>(&self, f: impl FnOnce(&[Snapshot]) -> R) -> R {
        let state = self.lock();
        f(&state.snapshots)
    }

    /// Serialize the full history into a save blob.
    pub fn encode(&self) -> Vec<u8> {
        codec::encode(&self.lock().snapshots)
    }

    /// Replace the history with the contents of a save blob.
    ///
    /// `None` means nothing was ever saved: the history becomes an empty,
    /// loaded history. On any error the history is left empty and not
    /// loaded, so it will refuse new samples for this session.
    pub fn load_blob(&self, blob: Option<&[u8]>) -> HistoryResult<usize> {
        let mut state = self.lock();
        state.reset();
        let decoded = match blob {
            None => Vec::new(),
            Some(bytes) => codec::decode(bytes)?,
        };
        let count = decoded.len();
        state.snapshots = decoded;
        state.loaded = true;
        state.publish(&[HistoryEvent::Loaded { snapshot_count: count }]);
        Ok(count)
    }

    /// Block-average the snapshots from `first_index` to the end.
    pub fn downsample(&self, first_index: usize, max_points: usize) -> Downsampled {
        let state = self.lock();
        let first = first_index.min(state.snapshots.len());
        downsample::reduce(&state.snapshots[first..], max_points)
    }
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new()
    }
}
