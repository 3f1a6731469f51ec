//! SQLite save-game store.
//!
//! RULE: Only store.rs talks to the database.
//! Everything else hands it opaque byte blobs under a string key, the
//! way a game host's save system stores mod data alongside a save.

use crate::{error::HistoryResult, types::SaveId};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

pub struct SaveStore {
    conn: Connection,
}

impl SaveStore {
    /// Open (or create) the save database at `path`.
    pub fn open(path: &str) -> HistoryResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> HistoryResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> HistoryResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_save_data.sql"))?;
        Ok(())
    }

    // ── Save games ─────────────────────────────────────────────

    /// Register a new save game and return its id.
    pub fn create_save(&self, name: &str) -> HistoryResult<SaveId> {
        let save_id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO save_game (save_id, name) VALUES (?1, ?2)",
            params![save_id, name],
        )?;
        Ok(save_id)
    }

    /// Record the in-game date a save was written at.
    pub fn set_game_date(&self, save_id: &str, date: NaiveDate) -> HistoryResult<()> {
        self.conn.execute(
            "UPDATE save_game SET game_date = ?2 WHERE save_id = ?1",
            params![save_id, date.to_string()],
        )?;
        Ok(())
    }

    pub fn game_date(&self, save_id: &str) -> HistoryResult<Option<NaiveDate>> {
        let text: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT game_date FROM save_game WHERE save_id = ?1",
                params![save_id],
                |row| row.get(0),
            )
            .optional()?;
        match text.flatten() {
            None => Ok(None),
            Some(t) => Ok(Some(t.parse::<NaiveDate>().map_err(anyhow::Error::from)?)),
        }
    }

    /// Every save id, oldest first.
    pub fn saves(&self) -> HistoryResult<Vec<(SaveId, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT save_id, name FROM save_game ORDER BY rowid ASC")?;
        let saves = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(saves)
    }

    // ── Save data blobs ────────────────────────────────────────

    /// The blob stored under `key`, or None if nothing was ever saved.
    pub fn load_data(&self, save_id: &str, key: &str) -> HistoryResult<Option<Vec<u8>>> {
        let data = self
            .conn
            .query_row(
                "SELECT payload FROM save_data WHERE save_id = ?1 AND data_key = ?2",
                params![save_id, key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(data)
    }

    /// Store `data` under `key`, replacing any previous blob.
    pub fn save_data(&self, save_id: &str, key: &str, data: &[u8]) -> HistoryResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO save_data (save_id, data_key, payload) VALUES (?1, ?2, ?3)",
            params![save_id, key, data],
        )?;
        Ok(())
    }

    pub fn delete_data(&self, save_id: &str, key: &str) -> HistoryResult<bool> {
        let removed = self.conn.execute(
            "DELETE FROM save_data WHERE save_id = ?1 AND data_key = ?2",
            params![save_id, key],
        )?;
        Ok(removed > 0)
    }

    /// Keys with data stored for a save.
    pub fn keys(&self, save_id: &str) -> HistoryResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT data_key FROM save_data WHERE save_id = ?1 ORDER BY data_key ASC",
        )?;
        let keys = stmt
            .query_map(params![save_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}
