//! Glue between the snapshot history and the save-game store.
//!
//! RULE: Failures stop here. A broken save must never take the game
//! down with it, so both directions log and report success as a bool.

use crate::{
    error::{HistoryError, HistoryResult},
    history::SnapshotHistory,
    store::SaveStore,
};

/// Key the history blob is stored under in every save.
pub const SAVE_DATA_KEY: &str = "TradeHistorySnapshots";

/// Initialize `history` and load it from `save_id`.
///
/// A save without trade history starts an empty, loaded history. On any
/// failure the history stays empty and not loaded for the session.
pub fn load_history(history: &SnapshotHistory, store: &SaveStore, save_id: &str) -> bool {
    history.initialize();
    match try_load(history, store, save_id) {
        Ok(count) => {
            log::info!("loaded {count} trade history snapshots from save {save_id}");
            true
        }
        Err(e) if e.is_corruption() => {
            log::error!("trade history in save {save_id} is corrupt: {e}");
            false
        }
        Err(e) => {
            log::error!("failed to load trade history from save {save_id}: {e}");
            false
        }
    }
}

fn try_load(history: &SnapshotHistory, store: &SaveStore, save_id: &str) -> HistoryResult<usize> {
    let blob = store.load_data(save_id, SAVE_DATA_KEY)?;
    if blob.is_none() {
        log::info!("save {save_id} has no trade history; starting fresh");
    }
    history.load_blob(blob.as_deref())
}

/// Write `history` into `save_id`. Refuses to overwrite a save with a
/// history that never finished loading.
pub fn save_history(history: &SnapshotHistory, store: &SaveStore, save_id: &str) -> bool {
    match try_save(history, store, save_id) {
        Ok(bytes) => {
            log::info!("saved trade history to save {save_id} ({bytes} bytes)");
            true
        }
        Err(e) => {
            log::error!("failed to save trade history to save {save_id}: {e}");
            false
        }
    }
}

fn try_save(history: &SnapshotHistory, store: &SaveStore, save_id: &str) -> HistoryResult<usize> {
    if !history.is_loaded() {
        return Err(HistoryError::NotLoaded);
    }
    let blob = history.encode();
    store.save_data(save_id, SAVE_DATA_KEY, &blob)?;
    Ok(blob.len())
}
