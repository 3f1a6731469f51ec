//! Versioned binary save format for the snapshot history.
//!
//! Layout (all fields little-endian i32):
//!
//! ```text
//! version
//! record[count] = year, month, day, value[0..CATEGORY_COUNT]
//! ```
//!
//! Values are in `CATEGORIES` order; `-1` marks a month with no data.
//! The body must be an exact multiple of the record width.

use crate::{
    error::{HistoryError, HistoryResult},
    resource::CATEGORY_COUNT,
    snapshot::Snapshot,
};
use chrono::{Datelike, NaiveDate};

pub const CURRENT_VERSION: i32 = 1;

/// Wire value for "no data".
pub const INVALID_VALUE: i32 = -1;

const FIELD_BYTES: usize = 4;
const VERSION_BYTES: usize = FIELD_BYTES;

/// Bytes per snapshot record: year, month, day + one field per category.
pub const RECORD_BYTES: usize = FIELD_BYTES * (3 + CATEGORY_COUNT);

pub fn encode(snapshots: &[Snapshot]) -> Vec<u8> {
    let mut out = Vec::with_capacity(VERSION_BYTES + snapshots.len() * RECORD_BYTES);
    out.extend_from_slice(&CURRENT_VERSION.to_le_bytes());
    for snapshot in snapshots {
        let date = snapshot.date;
        out.extend_from_slice(&date.year().to_le_bytes());
        out.extend_from_slice(&(date.month() as i32).to_le_bytes());
        out.extend_from_slice(&(date.day() as i32).to_le_bytes());
        for value in &snapshot.values {
            let field = value
                .map(|v| i32::try_from(v).unwrap_or(i32::MAX))
                .unwrap_or(INVALID_VALUE);
            out.extend_from_slice(&field.to_le_bytes());
        }
    }
    out
}

pub fn decode(bytes: &[u8]) -> HistoryResult<Vec<Snapshot>> {
    if bytes.len() < VERSION_BYTES {
        return Err(HistoryError::MissingVersion { len: bytes.len() });
    }
    let (header, body) = bytes.split_at(VERSION_BYTES);
    match read_i32(header) {
        1 => decode_v1(body),
        version => Err(HistoryError::UnsupportedVersion { version }),
    }
}

fn decode_v1(body: &[u8]) -> HistoryResult<Vec<Snapshot>> {
    if body.len() % RECORD_BYTES != 0 {
        return Err(HistoryError::CorruptLength {
            body:   body.len(),
            record: RECORD_BYTES,
        });
    }

    let mut snapshots: Vec<Snapshot> = Vec::with_capacity(body.len() / RECORD_BYTES);
    for (index, record) in body.chunks_exact(RECORD_BYTES).enumerate() {
        let mut fields = record.chunks_exact(FIELD_BYTES).map(read_i32);
        let year = fields.next().unwrap_or_default();
        let month = fields.next().unwrap_or_default();
        let day = fields.next().unwrap_or_default();
        let date = to_date(year, month, day)
            .ok_or(HistoryError::InvalidDate { year, month, day })?;

        if snapshots.last().is_some_and(|prev| prev.date >= date) {
            return Err(HistoryError::UnsortedRecords { index });
        }

        let mut snapshot = Snapshot::invalid(date);
        for (slot, field) in snapshot.values.iter_mut().zip(fields) {
            *slot = u32::try_from(field).ok();
        }
        snapshots.push(snapshot);
    }
    Ok(snapshots)
}

fn to_date(year: i32, month: i32, day: i32) -> Option<NaiveDate> {
    if !(1..=9999).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

fn read_i32(field: &[u8]) -> i32 {
    let mut buf = [0u8; FIELD_BYTES];
    buf.copy_from_slice(&field[..FIELD_BYTES]);
    i32::from_le_bytes(buf)
}
