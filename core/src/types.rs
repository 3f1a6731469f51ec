//! Shared primitive types used across the history and chart code.

/// Days since 0001-01-01 (CE day numbering, 0001-01-01 = 1).
/// The horizontal chart axis is interpolated in this unit.
pub type DayOrdinal = i64;

/// One measured resource quantity for a single month.
pub type ResourceCount = u32;

/// A unique identifier for a save game in the save store.
pub type SaveId = String;
