//! History change notifications.
//!
//! RULE: Every structural change to the snapshot history produces at
//! least one event. Consumers (a visible chart) refresh on any event;
//! they never poll the history for changes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Variants are appended only, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryEvent {
    // ── Lifecycle ──────────────────────────────────
    Initialized,
    Loaded {
        snapshot_count: usize,
    },
    Deinitialized,

    // ── Gap filling ────────────────────────────────
    GapFilledBackward {
        from:  NaiveDate,
        to:    NaiveDate,
        count: usize,
    },
    GapFilledForward {
        from:  NaiveDate,
        to:    NaiveDate,
        count: usize,
    },

    // ── Real samples ───────────────────────────────
    SampleRecorded {
        date:     NaiveDate,
        /// False when the month had no existing entry and was inserted.
        replaced: bool,
    },
}

impl HistoryEvent {
    /// Stable name for logs and the runner's IPC output.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Initialized             => "initialized",
            Self::Loaded { .. }           => "loaded",
            Self::Deinitialized           => "deinitialized",
            Self::GapFilledBackward { .. } => "gap_filled_backward",
            Self::GapFilledForward { .. }  => "gap_filled_forward",
            Self::SampleRecorded { .. }   => "sample_recorded",
        }
    }
}
